//! Tick-and-invalidate driver for a behaviour tree.
//!
//! [`BehaviourTree`] owns the root node and the bookkeeping the lifecycle
//! guarantee depends on: the set of nodes that were RUNNING after the
//! previous tick. Each [`tick_once`](BehaviourTree::tick_once) runs one
//! depth-first pass and then invalidates every node that was running last
//! tick but was not reached this tick, so a node that acquires a side effect
//! while RUNNING always receives exactly one matching `terminate` call,
//! regardless of which branch pre-empted it.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span};

use crate::behaviour::{Behaviour, BehaviourId, BehaviourMeta, Node, NodeKind};
use crate::error::{Result, TreeError};
use crate::Status;

/// Per-pass bookkeeping threaded through `tick`.
///
/// Every node records itself after evaluation; the pass keeps the ids that
/// ended the pass RUNNING. This is the engine's explicit "currently active
/// set", kept separate from node statuses so the invalidation step can be
/// tested on its own.
#[derive(Debug, Default)]
pub struct TickPass {
    running: HashSet<BehaviourId>,
}

impl TickPass {
    /// Record a node's post-evaluation state.
    pub fn record(&mut self, meta: &BehaviourMeta) {
        if meta.status().is_running() {
            self.running.insert(meta.id());
        }
    }
}

/// One row of a read-only tree snapshot, in depth-first order.
///
/// Display and render collaborators consume these rows and never touch the
/// tree itself.
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub depth: usize,
    pub name: String,
    pub kind: NodeKind,
    pub status: Status,
    pub feedback_message: String,
}

/// The root behaviour plus engine-managed bookkeeping.
pub struct BehaviourTree {
    root: Node,
    previously_running: HashSet<BehaviourId>,
    tick_count: u64,
    is_setup: bool,
}

impl BehaviourTree {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            previously_running: HashSet::new(),
            tick_count: 0,
            is_setup: false,
        }
    }

    /// Read-only access to the root node.
    pub fn root(&self) -> &dyn Behaviour {
        self.root.as_ref()
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// One-time initialisation pass over the whole tree, depth-first.
    ///
    /// The budget is shared by all nodes and checked before each hook runs;
    /// hooks are synchronous, so a hook that overruns is only detected before
    /// the next one. The first failure or budget exhaustion aborts the
    /// remaining walk and leaves the tree not set up.
    pub fn setup(&mut self, timeout: Duration) -> Result<()> {
        fn walk(node: &mut dyn Behaviour, started: Instant, budget: Duration) -> Result<()> {
            let elapsed = started.elapsed();
            if elapsed > budget {
                return Err(TreeError::SetupTimeout {
                    name: node.meta().name().to_string(),
                    elapsed,
                    budget,
                });
            }
            node.setup().map_err(|source| TreeError::SetupFailed {
                name: node.meta().name().to_string(),
                source,
            })?;
            for child in node.children_mut() {
                walk(child.as_mut(), started, budget)?;
            }
            Ok(())
        }

        walk(self.root.as_mut(), Instant::now(), timeout)?;
        self.is_setup = true;
        debug!("tree setup complete");
        Ok(())
    }

    /// Drive exactly one full pass over the tree.
    ///
    /// 1. Depth-first tick of the root; the pass records the current active
    ///    set (everything RUNNING after this pass).
    /// 2. Nodes running last tick but absent from the current set (skipped
    ///    by a sequence or selector, or concluded) are found.
    /// 3. Those still RUNNING (i.e. not already terminated by themselves or
    ///    an owning composite this pass) are stopped with INVALID, exactly
    ///    once.
    /// 4. The current set becomes the previous set for the next tick.
    ///
    /// # Panics
    ///
    /// Panics if called before a successful [`setup`](Self::setup); ticking
    /// an un-setup tree is a contract violation.
    pub fn tick_once(&mut self) -> Status {
        assert!(self.is_setup, "tick_once called before setup()");

        self.tick_count += 1;
        let span = debug_span!("tick", count = self.tick_count);
        let _guard = span.enter();

        let mut pass = TickPass::default();
        let status = self.root.tick(&mut pass);

        let stale: HashSet<BehaviourId> = self
            .previously_running
            .difference(&pass.running)
            .copied()
            .collect();
        if !stale.is_empty() {
            invalidate_stale(self.root.as_mut(), &stale);
        }
        self.previously_running = pass.running;

        debug!(%status, "tick complete");
        status
    }

    /// Read-only snapshot of the tree in depth-first order.
    pub fn snapshot(&self) -> Vec<SnapshotRow> {
        fn walk(node: &dyn Behaviour, depth: usize, rows: &mut Vec<SnapshotRow>) {
            let meta = node.meta();
            rows.push(SnapshotRow {
                depth,
                name: meta.name().to_string(),
                kind: node.kind(),
                status: meta.status(),
                feedback_message: meta.feedback_message().to_string(),
            });
            for child in node.children() {
                walk(child.as_ref(), depth + 1, rows);
            }
        }

        let mut rows = Vec::new();
        walk(self.root.as_ref(), 0, &mut rows);
        rows
    }
}

/// Stop every stale node that is still RUNNING.
///
/// A stale node already terminated this pass (for example by a concluding
/// parallel) is no longer RUNNING and is skipped, which is what keeps the
/// terminate call exactly-once. Stopping a composite releases its whole live
/// subtree, so recursion ends there.
fn invalidate_stale(node: &mut dyn Behaviour, stale: &HashSet<BehaviourId>) {
    if stale.contains(&node.meta().id()) && node.meta().status().is_running() {
        node.stop(Status::Invalid);
        return;
    }
    for child in node.children_mut() {
        invalidate_stale(child.as_mut(), stale);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::behaviours::{AlwaysFailure, Count};
    use crate::composite::{Selector, Sequence};

    /// Runs forever, counting its lifecycle transitions.
    struct Probe {
        meta: BehaviourMeta,
        initialised: Arc<AtomicUsize>,
        invalidated: Arc<AtomicUsize>,
    }

    impl Probe {
        fn new(
            name: &str,
            initialised: Arc<AtomicUsize>,
            invalidated: Arc<AtomicUsize>,
        ) -> Self {
            Self {
                meta: BehaviourMeta::new(name),
                initialised,
                invalidated,
            }
        }
    }

    impl Behaviour for Probe {
        fn meta(&self) -> &BehaviourMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut BehaviourMeta {
            &mut self.meta
        }

        fn initialise(&mut self) {
            self.initialised.fetch_add(1, Ordering::SeqCst);
        }

        fn update(&mut self) -> Status {
            Status::Running
        }

        fn terminate(&mut self, new_status: Status) {
            if new_status == Status::Invalid {
                self.invalidated.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    #[should_panic(expected = "before setup")]
    fn ticking_an_unset_up_tree_is_a_defect() {
        let mut tree = BehaviourTree::new(Box::new(AlwaysFailure::new("leaf")));
        tree.tick_once();
    }

    #[test]
    fn setup_failure_is_surfaced_with_the_node_name() {
        struct BrokenSetup {
            meta: BehaviourMeta,
        }
        impl Behaviour for BrokenSetup {
            fn meta(&self) -> &BehaviourMeta {
                &self.meta
            }
            fn meta_mut(&mut self) -> &mut BehaviourMeta {
                &mut self.meta
            }
            fn setup(&mut self) -> crate::behaviour::SetupResult {
                Err("hardware not present".into())
            }
            fn update(&mut self) -> Status {
                Status::Success
            }
        }

        let mut tree = BehaviourTree::new(Box::new(BrokenSetup {
            meta: BehaviourMeta::new("camera"),
        }));
        match tree.setup(Duration::from_secs(1)) {
            Err(TreeError::SetupFailed { name, .. }) => assert_eq!(name, "camera"),
            other => panic!("expected SetupFailed, got {other:?}"),
        }
    }

    #[test]
    fn setup_timeout_is_surfaced_with_the_unreached_node() {
        struct SlowSetup {
            meta: BehaviourMeta,
        }
        impl Behaviour for SlowSetup {
            fn meta(&self) -> &BehaviourMeta {
                &self.meta
            }
            fn meta_mut(&mut self) -> &mut BehaviourMeta {
                &mut self.meta
            }
            fn setup(&mut self) -> crate::behaviour::SetupResult {
                std::thread::sleep(Duration::from_millis(20));
                Ok(())
            }
            fn update(&mut self) -> Status {
                Status::Success
            }
        }

        let root = Sequence::new(
            "root",
            vec![
                Box::new(SlowSetup {
                    meta: BehaviourMeta::new("slow"),
                }),
                Box::new(SlowSetup {
                    meta: BehaviourMeta::new("late"),
                }),
            ],
        );
        let mut tree = BehaviourTree::new(Box::new(root));
        match tree.setup(Duration::from_millis(5)) {
            Err(TreeError::SetupTimeout { name, .. }) => assert_eq!(name, "late"),
            other => panic!("expected SetupTimeout, got {other:?}"),
        }
    }

    #[test]
    fn engine_invalidates_nodes_stranded_by_priority_switching() {
        // Tick 1: the count fails, the probe runs -> selector RUNNING.
        // Tick 2: the count succeeds; the probe is never reached, so only
        // the engine can release it, exactly once.
        let initialised = Arc::new(AtomicUsize::new(0));
        let invalidated = Arc::new(AtomicUsize::new(0));

        let root = Selector::new(
            "root",
            vec![
                Box::new(Count::new("flaky", 1, 1, 10)),
                Box::new(Probe::new(
                    "fallback",
                    initialised.clone(),
                    invalidated.clone(),
                )),
            ],
        );
        let mut tree = BehaviourTree::new(Box::new(root));
        tree.setup(Duration::from_secs(1)).unwrap();

        assert_eq!(tree.tick_once(), Status::Running);
        assert_eq!(initialised.load(Ordering::SeqCst), 1);
        assert_eq!(invalidated.load(Ordering::SeqCst), 0);

        assert_eq!(tree.tick_once(), Status::Success);
        assert_eq!(invalidated.load(Ordering::SeqCst), 1);

        // Further ticks must not re-terminate the already-invalid node.
        assert_eq!(tree.tick_once(), Status::Success);
        assert_eq!(invalidated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stranded_subtree_is_released_through_its_composite() {
        // A whole RUNNING sequence is stranded when the higher-priority
        // child recovers; invalidating the sequence must reach its leaf.
        let initialised = Arc::new(AtomicUsize::new(0));
        let invalidated = Arc::new(AtomicUsize::new(0));

        let stranded = Sequence::new(
            "stranded",
            vec![Box::new(Probe::new(
                "worker",
                initialised.clone(),
                invalidated.clone(),
            ))],
        );
        let root = Selector::new(
            "root",
            vec![
                Box::new(Count::new("flaky", 1, 1, 10)),
                Box::new(stranded),
            ],
        );
        let mut tree = BehaviourTree::new(Box::new(root));
        tree.setup(Duration::from_secs(1)).unwrap();

        assert_eq!(tree.tick_once(), Status::Running);
        assert_eq!(tree.tick_once(), Status::Success);
        assert_eq!(invalidated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reticking_a_concluded_tree_is_a_fresh_entry() {
        let root = Sequence::new("root", vec![Box::new(Count::new("step", 0, 0, 10))]);
        let mut tree = BehaviourTree::new(Box::new(root));
        tree.setup(Duration::from_secs(1)).unwrap();

        assert_eq!(tree.tick_once(), Status::Success);
        assert_eq!(tree.tick_once(), Status::Success);
        assert_eq!(tree.tick_count(), 2);
    }

    #[test]
    fn snapshot_is_depth_first_with_statuses() {
        let root = Sequence::new(
            "root",
            vec![
                Box::new(Count::new("a", 0, 1, 10)),
                Box::new(Count::new("b", 0, 1, 10)),
            ],
        );
        let mut tree = BehaviourTree::new(Box::new(root));
        tree.setup(Duration::from_secs(1)).unwrap();
        tree.tick_once();

        let rows = tree.snapshot();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "root");
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[0].kind, NodeKind::Sequence);
        assert_eq!(rows[1].status, Status::Running);
        // b has not been reached yet.
        assert_eq!(rows[2].status, Status::Invalid);
    }
}
