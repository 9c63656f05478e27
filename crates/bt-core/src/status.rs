use serde::{Deserialize, Serialize};

/// Result of ticking a node.
///
/// `Running` means "tick me again next frame"; the node resumes from its saved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Success,
    Failure,
    Running,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// `true` for `Success` and `Failure`.
    pub fn is_done(self) -> bool {
        !self.is_running()
    }

    /// Swaps `Success` and `Failure`; `Running` passes through.
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::Running => Status::Running,
        }
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
