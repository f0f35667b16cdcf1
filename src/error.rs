//! Error types.
//!
//! [`SessionFailure`] is the closed set of failures shown to the user; its
//! `Display` text is the dialog body. [`InstanceError`] covers boot and
//! configuration problems the host has to handle itself.

use crate::state::mode::Mode;
use crate::state::provider::JoinResult;

/// Why joining a session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JoinFailure {
    #[error("Game is full.")]
    Full,
    #[error("Game no longer exists.")]
    NotFound,
    #[error("Join failed.")]
    Other,
}

impl JoinFailure {
    /// Map a provider join result; `None` on success.
    pub fn from_result(result: JoinResult) -> Option<Self> {
        match result {
            JoinResult::Success => None,
            JoinResult::SessionIsFull => Some(Self::Full),
            JoinResult::SessionDoesNotExist => Some(Self::NotFound),
            _ => Some(Self::Other),
        }
    }
}

/// Why travelling to a joined session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TravelFailure {
    #[error("Invalid Player Controller")]
    NoController,
    #[error("OSS missing")]
    NoSubsystem,
    #[error("Travel to Session failed.")]
    NoSession,
}

/// User-visible session failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionFailure {
    #[error(transparent)]
    JoinFailed(#[from] JoinFailure),
    #[error("Failed to create session.")]
    CreateFailed,
    #[error(transparent)]
    TravelFailed(#[from] TravelFailure),
}

/// Errors the host must act on.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    /// The front-end map could not be loaded. Unrecoverable.
    #[error("failed to enter {map}: {reason}")]
    FrontEndMapLoad { map: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("initial mode must be WelcomeScreen or MainMenu, got {0}")]
    InvalidInitialMode(Mode),
}

pub type Result<T> = std::result::Result<T, InstanceError>;
