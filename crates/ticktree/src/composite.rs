//! Composite behaviour nodes.
//!
//! Composites own an ordered list of children and decide, per tick, which
//! children run and how their statuses combine: [`Sequence`] (AND with
//! progress memory), [`Selector`] (prioritised OR), and [`Parallel`]
//! (tick-everything, combine via [`ParallelPolicy`]).
//!
//! Division of labour for cleanup: a `Parallel` that concludes invalidates
//! its own still-running children in the same tick, because it ticked all of
//! them and directly observes who needs releasing. `Sequence` and `Selector`
//! skip children, so descendants they strand while RUNNING are the engine's
//! responsibility (see [`BehaviourTree::tick_once`]). All composites release
//! their live subtree when they are themselves invalidated.
//!
//! [`BehaviourTree::tick_once`]: crate::BehaviourTree::tick_once

use tracing::debug;

use crate::behaviour::{Behaviour, BehaviourMeta, Node, NodeKind};
use crate::tree::TickPass;
use crate::Status;

/// Combination rule for a [`Parallel`] composite.
///
/// Policies are pure functions over the vector of child statuses collected
/// this tick, so the combination rules stay auditable in isolation from tree
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelPolicy {
    /// Succeed as soon as any one child succeeds; fail only when all fail.
    SucceedOnOne,

    /// Succeed only when every child has succeeded; fail as soon as any fails.
    SucceedOnAll,
}

impl ParallelPolicy {
    /// Combine one tick's child statuses into the parallel's own status.
    ///
    /// Inputs are what `update` contracts allow (`Running`/`Success`/
    /// `Failure`); the result is never `Invalid`.
    pub fn combine(self, statuses: &[Status]) -> Status {
        match self {
            ParallelPolicy::SucceedOnOne => {
                if statuses.contains(&Status::Success) {
                    Status::Success
                } else if statuses.iter().all(|s| *s == Status::Failure) {
                    Status::Failure
                } else {
                    Status::Running
                }
            }
            ParallelPolicy::SucceedOnAll => {
                if statuses.contains(&Status::Failure) {
                    Status::Failure
                } else if statuses.iter().all(|s| *s == Status::Success) {
                    Status::Success
                } else {
                    Status::Running
                }
            }
        }
    }
}

/// Stop every child still in a live state, releasing its side effects.
///
/// Recursion happens through each child's own `stop`: a composite child
/// forwards the invalidation to its subtree.
fn invalidate_children(children: &mut [Node]) {
    for child in children {
        if child.meta().status() != Status::Invalid {
            child.stop(Status::Invalid);
        }
    }
}

/// Executes children in order until one runs or fails, remembering progress.
///
/// # Semantics
///
/// On a fresh entry the sequence starts from its first child; while RUNNING
/// it resumes from the first non-SUCCESS child of the previous tick, so a
/// child that succeeded is never re-ticked until the whole sequence concludes
/// and restarts.
///
/// - A child returning `Running` makes the sequence `Running` immediately;
///   later children are not ticked this pass.
/// - A child returning `Failure` makes the sequence `Failure` immediately.
///   Descendants stranded RUNNING beyond that child are invalidated by the
///   engine, not by the sequence, which has already moved past them.
/// - All children `Success` in order makes the sequence `Success`.
pub struct Sequence {
    meta: BehaviourMeta,
    children: Vec<Node>,
    current: usize,
}

impl Sequence {
    /// Creates a sequence with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty; a childless composite is a
    /// construction-time defect.
    pub fn new(name: impl Into<String>, children: Vec<Node>) -> Self {
        assert!(!children.is_empty(), "Sequence must have at least one child");
        Self {
            meta: BehaviourMeta::new(name),
            children,
            current: 0,
        }
    }
}

impl Behaviour for Sequence {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    fn initialise(&mut self) {
        self.current = 0;
    }

    // Never consulted; `tick` drives the children directly.
    fn update(&mut self) -> Status {
        self.meta.status()
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn tick(&mut self, pass: &mut TickPass) -> Status {
        if !self.meta.status().is_running() {
            debug!(name = self.meta.name(), "initialise");
            self.initialise();
        }

        let mut status = Status::Success;
        while self.current < self.children.len() {
            match self.children[self.current].tick(pass) {
                Status::Success => self.current += 1,
                child_status => {
                    // RUNNING or FAILURE short-circuits the pass.
                    status = child_status;
                    break;
                }
            }
        }

        if status.is_running() {
            self.meta.set_status(Status::Running);
        } else {
            self.stop(status);
        }
        pass.record(&self.meta);
        status
    }

    fn stop(&mut self, new_status: Status) {
        debug!(
            name = self.meta.name(),
            from = %self.meta.status(),
            to = %new_status,
            "stop"
        );
        if new_status == Status::Invalid {
            invalidate_children(&mut self.children);
        }
        self.terminate(new_status);
        self.meta.set_status(new_status);
    }
}

/// Executes children in priority order until one runs or succeeds.
///
/// # Semantics
///
/// Every tick restarts the scan from the highest-priority child:
///
/// - The first child returning `Running` or `Success` decides the selector's
///   status; lower-priority children are not ticked this pass.
/// - If every child returns `Failure`, the selector fails.
///
/// A lower-priority child left RUNNING when a higher-priority sibling takes
/// over is not reached this pass; the engine invalidates it at the end of the
/// tick.
pub struct Selector {
    meta: BehaviourMeta,
    children: Vec<Node>,
}

impl Selector {
    /// Creates a selector with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(name: impl Into<String>, children: Vec<Node>) -> Self {
        assert!(!children.is_empty(), "Selector must have at least one child");
        Self {
            meta: BehaviourMeta::new(name),
            children,
        }
    }
}

impl Behaviour for Selector {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    // Never consulted; `tick` drives the children directly.
    fn update(&mut self) -> Status {
        self.meta.status()
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Selector
    }

    fn tick(&mut self, pass: &mut TickPass) -> Status {
        if !self.meta.status().is_running() {
            debug!(name = self.meta.name(), "initialise");
            self.initialise();
        }

        let mut status = Status::Failure;
        for child in &mut self.children {
            match child.tick(pass) {
                Status::Failure => continue,
                child_status => {
                    status = child_status;
                    break;
                }
            }
        }

        if status.is_running() {
            self.meta.set_status(Status::Running);
        } else {
            self.stop(status);
        }
        pass.record(&self.meta);
        status
    }

    fn stop(&mut self, new_status: Status) {
        debug!(
            name = self.meta.name(),
            from = %self.meta.status(),
            to = %new_status,
            "stop"
        );
        if new_status == Status::Invalid {
            invalidate_children(&mut self.children);
        }
        self.terminate(new_status);
        self.meta.set_status(new_status);
    }
}

/// Ticks every child every pass and combines statuses via [`ParallelPolicy`].
///
/// "Parallel" names a composition policy, not concurrent execution: children
/// are ticked in order within the same synchronous pass, with no
/// short-circuit skipping. That is what distinguishes it from `Sequence` and
/// `Selector`, and why a concluding parallel can release its own
/// still-running children in the same tick.
pub struct Parallel {
    meta: BehaviourMeta,
    policy: ParallelPolicy,
    children: Vec<Node>,
}

impl Parallel {
    /// Creates a parallel with the given policy and children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(name: impl Into<String>, policy: ParallelPolicy, children: Vec<Node>) -> Self {
        assert!(!children.is_empty(), "Parallel must have at least one child");
        Self {
            meta: BehaviourMeta::new(name),
            policy,
            children,
        }
    }

    /// The configured combination policy.
    pub fn policy(&self) -> ParallelPolicy {
        self.policy
    }
}

impl Behaviour for Parallel {
    fn meta(&self) -> &BehaviourMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut BehaviourMeta {
        &mut self.meta
    }

    // Never consulted; `tick` drives the children directly.
    fn update(&mut self) -> Status {
        self.meta.status()
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Parallel
    }

    fn tick(&mut self, pass: &mut TickPass) -> Status {
        if !self.meta.status().is_running() {
            debug!(name = self.meta.name(), "initialise");
            self.initialise();
        }

        let statuses: Vec<Status> = self
            .children
            .iter_mut()
            .map(|child| child.tick(pass))
            .collect();
        let status = self.policy.combine(&statuses);

        if status.is_running() {
            self.meta.set_status(Status::Running);
        } else {
            // Conclusion pre-empts whichever children are still running;
            // they must be released within this same tick.
            for child in &mut self.children {
                if child.meta().status().is_running() {
                    child.stop(Status::Invalid);
                }
            }
            self.stop(status);
        }
        pass.record(&self.meta);
        status
    }

    fn stop(&mut self, new_status: Status) {
        debug!(
            name = self.meta.name(),
            from = %self.meta.status(),
            to = %new_status,
            "stop"
        );
        if new_status == Status::Invalid {
            invalidate_children(&mut self.children);
        }
        self.terminate(new_status);
        self.meta.set_status(new_status);
    }
}
