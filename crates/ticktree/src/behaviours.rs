//! Stock leaf behaviours for composition, demos, and tests.

use tracing::debug;

use crate::behaviour::{Behaviour, BehaviourMeta};
use crate::Status;

/// Counts its updates and walks through failure, running, and success phases.
///
/// Each `update` increments an internal counter and reports, in order:
/// `Failure` while `count <= fail_until`, `Running` while
/// `count <= running_until`, `Success` while `count <= success_until`, and
/// `Failure` afterwards. The counter survives natural conclusions (so a
/// re-entered counter keeps progressing through its phases) but resets when
/// the node is invalidated by pre-emption, as interrupted work starts over.
pub struct Count {
    meta: BehaviourMeta,
    count: u64,
    fail_until: u64,
    running_until: u64,
    success_until: u64,
}

impl Count {
    pub fn new(
        name: impl Into<String>,
        fail_until: u64,
        running_until: u64,
        success_until: u64,
    ) -> Self {
        Self {
            meta: BehaviourMeta::new(name),
            count: 0,
            fail_until,
            running_until,
            success_until,
        }
    }

    /// Number of updates seen since construction or the last invalidation.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Behaviour for Count {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    fn update(&mut self) -> Status {
        self.count += 1;
        let (status, feedback) = if self.count <= self.fail_until {
            (Status::Failure, "failing")
        } else if self.count <= self.running_until {
            (Status::Running, "running")
        } else if self.count <= self.success_until {
            (Status::Success, "success")
        } else {
            (Status::Failure, "count expired")
        };
        self.meta.set_feedback_message(feedback);
        debug!(name = self.meta.name(), count = self.count, %status, "update");
        status
    }

    fn terminate(&mut self, new_status: Status) {
        // Interrupted work starts over; concluded work keeps its progress.
        if new_status == Status::Invalid {
            self.count = 0;
        }
    }
}

/// Always returns `Success`.
pub struct AlwaysSuccess {
    meta: BehaviourMeta,
}

impl AlwaysSuccess {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: BehaviourMeta::new(name),
        }
    }
}

impl Behaviour for AlwaysSuccess {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    fn update(&mut self) -> Status {
        Status::Success
    }
}

/// Always returns `Failure`.
pub struct AlwaysFailure {
    meta: BehaviourMeta,
}

impl AlwaysFailure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: BehaviourMeta::new(name),
        }
    }
}

impl Behaviour for AlwaysFailure {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    fn update(&mut self) -> Status {
        Status::Failure
    }
}

/// Always returns `Running`; concludes only when pre-empted.
pub struct AlwaysRunning {
    meta: BehaviourMeta,
}

impl AlwaysRunning {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: BehaviourMeta::new(name),
        }
    }
}

impl Behaviour for AlwaysRunning {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    fn update(&mut self) -> Status {
        Status::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TickPass;

    #[test]
    fn count_walks_through_its_phases() {
        let mut count = Count::new("counter", 1, 3, 5);
        let mut pass = TickPass::default();

        assert_eq!(count.tick(&mut pass), Status::Failure); // count 1
        assert_eq!(count.tick(&mut pass), Status::Running); // count 2
        assert_eq!(count.tick(&mut pass), Status::Running); // count 3
        assert_eq!(count.tick(&mut pass), Status::Success); // count 4
        assert_eq!(count.tick(&mut pass), Status::Success); // count 5
        assert_eq!(count.tick(&mut pass), Status::Failure); // count 6, expired
        assert_eq!(count.meta().feedback_message(), "count expired");
    }

    #[test]
    fn count_resets_only_on_invalidation() {
        let mut count = Count::new("counter", 0, 1, 10);
        let mut pass = TickPass::default();

        assert_eq!(count.tick(&mut pass), Status::Running); // count 1
        assert_eq!(count.tick(&mut pass), Status::Success); // count 2
        assert_eq!(count.count(), 2); // natural conclusion keeps progress

        count.stop(Status::Invalid);
        assert_eq!(count.count(), 0);
        assert_eq!(count.tick(&mut pass), Status::Running); // starts over
    }
}
