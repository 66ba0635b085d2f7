//! Core behaviour trait and per-node bookkeeping.
//!
//! This module defines the [`Behaviour`] trait, the fundamental abstraction
//! for all tree nodes. A behaviour is a small state machine: `initialise`
//! runs on every fresh entry (the side-effect acquisition point), `update`
//! produces this tick's status, and `terminate` releases whatever
//! `initialise` acquired, on natural conclusion *and* on pre-emption.
//!
//! The provided [`tick`](Behaviour::tick) and [`stop`](Behaviour::stop)
//! methods implement the lifecycle protocol once; leaves only implement
//! `update` (plus optional hooks), while composites override `tick` to drive
//! their children.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::Status;
use crate::tree::TickPass;

/// Errors a node's one-time [`setup`](Behaviour::setup) hook may surface.
pub type SetupResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Unique identity of a node within a process.
///
/// The engine tracks its "previously running" set as ids rather than peeking
/// at node statuses, so the invalidation pass is independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BehaviourId(u64);

impl BehaviourId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Node kind, consumed by the display and render collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Sequence,
    Selector,
    Parallel,
    Leaf,
}

impl NodeKind {
    /// Returns `true` for the composite kinds.
    #[inline]
    pub fn is_composite(self) -> bool {
        !matches!(self, NodeKind::Leaf)
    }
}

/// Bookkeeping every node embeds: identity, current status, and the
/// human-readable feedback message (diagnostic only, never control flow).
#[derive(Debug)]
pub struct BehaviourMeta {
    id: BehaviourId,
    name: String,
    status: Status,
    feedback_message: String,
}

impl BehaviourMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BehaviourId::next(),
            name: name.into(),
            status: Status::Invalid,
            feedback_message: String::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> BehaviourId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    #[inline]
    pub fn feedback_message(&self) -> &str {
        &self.feedback_message
    }

    pub fn set_feedback_message(&mut self, message: impl Into<String>) {
        self.feedback_message = message.into();
    }
}

/// A boxed tree node; parents exclusively own their children.
pub type Node = Box<dyn Behaviour>;

/// A behaviour tree node.
///
/// Leaves implement [`update`](Behaviour::update) and optionally the
/// lifecycle hooks. Composites additionally override
/// [`tick`](Behaviour::tick), [`stop`](Behaviour::stop), and the children
/// accessors. Everything the engine and the display collaborators need is
/// reachable through this one capability surface.
pub trait Behaviour: Send {
    /// Shared bookkeeping (identity, status, feedback message).
    fn meta(&self) -> &BehaviourMeta;
    fn meta_mut(&mut self) -> &mut BehaviourMeta;

    /// One-time setup hook, run by [`BehaviourTree::setup`] before the first
    /// tick. Delays and failures here are surfaced to the caller, never
    /// swallowed.
    ///
    /// [`BehaviourTree::setup`]: crate::BehaviourTree::setup
    fn setup(&mut self) -> SetupResult {
        Ok(())
    }

    /// Called on every fresh entry, before `update`. This is the side-effect
    /// acquisition point; whatever is established here must be released by
    /// [`terminate`](Behaviour::terminate).
    fn initialise(&mut self) {}

    /// Produce this tick's status. Must return `Running`, `Success`, or
    /// `Failure` and must not block; long-running work is expressed by
    /// returning `Running` across successive ticks.
    fn update(&mut self) -> Status;

    /// Release hook, invoked exactly once per transition out of a live
    /// state: on natural conclusion (`new_status` is `Success`/`Failure`)
    /// and on pre-emption (`new_status` is `Invalid`).
    fn terminate(&mut self, _new_status: Status) {}

    /// Children in priority order. Leaves keep the default empty slice.
    fn children(&self) -> &[Node] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Node] {
        &mut []
    }

    /// Kind tag for display/render collaborators.
    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    /// Drive one evaluation of this node.
    ///
    /// The default body is the leaf protocol: initialise on fresh entry,
    /// update, then either store `Running` or route the conclusion through
    /// [`stop`](Behaviour::stop) so `terminate` fires. Composites override
    /// this to tick children per their policy, but must uphold the same
    /// contract and record themselves in `pass`.
    fn tick(&mut self, pass: &mut TickPass) -> Status {
        if !self.meta().status().is_running() {
            debug!(name = self.meta().name(), "initialise");
            self.initialise();
        }
        let new_status = self.update();
        assert!(
            new_status != Status::Invalid,
            "behaviour '{}' returned INVALID from update",
            self.meta().name()
        );
        if new_status.is_running() {
            self.meta_mut().set_status(Status::Running);
        } else {
            self.stop(new_status);
        }
        pass.record(self.meta());
        new_status
    }

    /// Conclude or pre-empt this node: run `terminate`, then record
    /// `new_status`.
    ///
    /// Callers only stop nodes whose status is a live state, which keeps
    /// `terminate` at most once per transition. Composites override this to
    /// also release their live subtree when invalidated.
    fn stop(&mut self, new_status: Status) {
        debug!(
            name = self.meta().name(),
            from = %self.meta().status(),
            to = %new_status,
            "stop"
        );
        self.terminate(new_status);
        self.meta_mut().set_status(new_status);
    }
}
