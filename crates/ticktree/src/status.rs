//! Status returned by behaviour nodes.

use strum::Display;

/// The result of evaluating a behaviour node on a given tick.
///
/// `Invalid` is the rest state: a node carries it before its first tick and
/// after the engine (or an owning composite) invalidates it. [`update`]
/// implementations must never return it; doing so is a contract violation.
///
/// [`update`]: crate::Behaviour::update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
    /// Not ticked yet, or invalidated after pre-emption.
    #[default]
    Invalid,

    /// Still working; expects to be ticked again.
    Running,

    /// The behaviour completed successfully.
    Success,

    /// The behaviour concluded without achieving its goal.
    ///
    /// Failure is a first-class tree outcome, not an error.
    Failure,
}

impl Status {
    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` for the natural conclusions, `Success` and `Failure`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }
}
