//! Errors surfaced by the tree driver.
//!
//! Only the one-time setup pass produces recoverable errors. Contract
//! violations (an `update` returning INVALID, an empty composite, ticking a
//! tree that was never set up) are defects and panic instead.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Error)]
pub enum TreeError {
    /// A node's setup hook returned an error; the remaining walk is aborted.
    #[error("setup of behaviour '{name}' failed")]
    SetupFailed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The setup budget ran out before this node's hook was reached.
    #[error("setup budget exhausted before behaviour '{name}' ({elapsed:?} of {budget:?})")]
    SetupTimeout {
        name: String,
        elapsed: Duration,
        budget: Duration,
    },
}
