//! The context switching behaviour the demo is built around.

use tracing::debug;

use ticktree::behaviour::{Behaviour, BehaviourMeta};
use ticktree::Status;

/// Sets *and* resets a context. Use in parallel with a subtree that does the
/// work while in this context.
///
/// Simply placing a set-context and a reset-context behaviour on either end
/// of a work sequence does not suffice: if the sequence is pre-empted
/// midstream, the reset never runs. Acquiring in `initialise` and releasing
/// in `terminate` makes the engine's lifecycle guarantee do the work instead.
pub struct ContextSwitch {
    meta: BehaviourMeta,
}

impl ContextSwitch {
    pub fn new(name: impl Into<String>) -> Self {
        let mut meta = BehaviourMeta::new(name);
        meta.set_feedback_message("old context");
        Self { meta }
    }
}

impl Behaviour for ContextSwitch {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    /// Backup and set a new context.
    fn initialise(&mut self) {
        debug!(name = self.meta.name(), "switch context");
        self.meta.set_feedback_message("new context");
    }

    /// Just returns RUNNING while it waits for other activities to finish.
    fn update(&mut self) -> Status {
        debug!(
            name = self.meta.name(),
            feedback = self.meta.feedback_message(),
            "update"
        );
        Status::Running
    }

    /// Restore the previously backed up context.
    fn terminate(&mut self, new_status: Status) {
        debug!(
            name = self.meta.name(),
            from = %self.meta.status(),
            to = %new_status,
            "restore context"
        );
        self.meta.set_feedback_message("old context");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticktree::TickPass;

    #[test]
    fn feedback_tracks_the_context_lifecycle() {
        let mut node = ContextSwitch::new("Context");
        assert_eq!(node.meta().feedback_message(), "old context");

        node.tick(&mut TickPass::default());
        assert_eq!(node.meta().feedback_message(), "new context");

        node.stop(Status::Invalid);
        assert_eq!(node.meta().feedback_message(), "old context");
    }
}
