//! Status returned by behavior nodes.

use std::fmt;

/// The outcome of ticking a node once.
///
/// `Success`, `Failure` and `Error` close the node's current activation.
/// `Running` keeps the activation open across ticks until a later tick
/// reports one of the terminal variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The behavior completed successfully.
    Success,

    /// The behavior completed but did not achieve its goal.
    Failure,

    /// The behavior has not finished yet and keeps its activation open.
    Running,

    /// The behavior could not proceed. Always accompanied by a
    /// [`NodeError`](crate::NodeError) in the tick result.
    Error,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` for every status that closes an activation.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Swaps `Success` and `Failure`. `Running` and `Error` are returned as-is.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        }
    }

    /// Static name of the status, used as a structured log field.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::Failure => "Failure",
            Status::Running => "Running",
            Status::Error => "Error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
