//! Tick-driven behaviour tree engine with lifecycle-safe pre-emption.
//!
//! A [`BehaviourTree`] repeatedly "ticks" a hierarchy of stateful nodes,
//! propagating RUNNING/SUCCESS/FAILURE outcomes upward and invalidation
//! downward. The engine guarantees that every node which establishes a side
//! effect while RUNNING receives exactly one matching `terminate` call when
//! it concludes or is pre-empted by a higher-priority branch, even though
//! the tree's evaluation order changes every tick.
//!
//! Evaluation is single-threaded, cooperative, and synchronous: one tick is
//! one complete depth-first pass, and "parallel" names a composition policy,
//! not concurrent execution.
//!
//! # Architecture
//!
//! - [`Behaviour`]: lifecycle trait all nodes implement
//! - [`Status`]: the four-valued per-tick outcome
//! - Composites: [`Sequence`], [`Selector`], [`Parallel`] with
//!   [`ParallelPolicy`]
//! - [`BehaviourTree`]: the tick-and-invalidate driver
//! - [`display`]: text and Graphviz renderings of read-only snapshots

pub mod behaviour;
pub mod behaviours;
pub mod builder;
pub mod composite;
pub mod display;
pub mod error;
pub mod status;
pub mod tree;

// Re-export core types for ergonomic API
pub use behaviour::{Behaviour, BehaviourId, BehaviourMeta, Node, NodeKind, SetupResult};
pub use composite::{Parallel, ParallelPolicy, Selector, Sequence};
pub use error::TreeError;
pub use status::Status;
pub use tree::{BehaviourTree, SnapshotRow, TickPass};
