//! Session provider contract.
//!
//! The provider performs hosting, discovery and joining over the network.
//! Every request returns an accepted/rejected verdict immediately; results
//! arrive later as a [`SessionCompletion`] tagged with the handle that was
//! registered for it.

use serde::{Deserialize, Serialize};

use super::handles::{CompletionHandle, OperationKind};
use super::player::UserId;

/// Lifecycle of a named session as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NoSession,
    Creating,
    Pending,
    Starting,
    InProgress,
    Ending,
    Ended,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSession => "no_session",
            Self::Creating => "creating",
            Self::Pending => "pending",
            Self::Starting => "starting",
            Self::InProgress => "in_progress",
            Self::Ending => "ending",
            Self::Ended => "ended",
        }
    }
}

/// Result of joining a session or registering a player into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinResult {
    Success,
    SessionIsFull,
    SessionDoesNotExist,
    CouldNotRetrieveAddress,
    AlreadyInSession,
    UnknownError,
}

impl JoinResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Advertised settings for a hosted session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    pub game_mode: String,
    pub map_name: String,
    pub is_lan: bool,
    pub uses_presence: bool,
    pub public_connections: u32,
}

/// A session found by a search or carried by an invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub session_id: String,
    pub owning_user: Option<UserId>,
    pub settings: SessionSettings,
}

impl SearchResult {
    /// Check if `user` owns this session.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owning_user.as_ref() == Some(user)
    }
}

/// What to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinTarget {
    /// Index into the provider's latest search results
    SearchIndex(usize),
    Result(SearchResult),
}

/// Address resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("no session named {0}")]
    NoSession(String),
    #[error("session {0} has no resolvable address")]
    Unresolved(String),
}

/// Asynchronous result of a provider operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCompletion {
    JoinSession { result: JoinResult },
    CreatePresenceSession { session: String, succeeded: bool },
    FindSessions { succeeded: bool },
    StartSession { session: String, succeeded: bool },
    EndSession { session: String, succeeded: bool },
    DestroySession { session: String, succeeded: bool },
    RegisterLocalPlayer { player: UserId, result: JoinResult },
    ActivityActivation {
        player: UserId,
        activity_id: String,
        session: Option<SearchResult>,
    },
}

impl SessionCompletion {
    /// The operation kind whose handle this completion is delivered on.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::JoinSession { .. } => OperationKind::Join,
            Self::CreatePresenceSession { .. } => OperationKind::Create,
            Self::FindSessions { .. } => OperationKind::Search,
            Self::StartSession { .. } => OperationKind::Start,
            Self::EndSession { .. } => OperationKind::End,
            Self::DestroySession { .. } => OperationKind::Destroy,
            Self::RegisterLocalPlayer { .. } => OperationKind::RegisterLocalPlayer,
            Self::ActivityActivation { .. } => OperationKind::ActivityRequest,
        }
    }
}

/// Network session service.
pub trait SessionProvider {
    /// Register interest in completions of `kind`.
    fn subscribe(&mut self, kind: OperationKind) -> CompletionHandle;

    /// Drop a registration. Completions for it must no longer be delivered.
    fn unsubscribe(&mut self, handle: CompletionHandle);

    fn host_session(&mut self, user: &UserId, session: &str, settings: &SessionSettings) -> bool;

    fn join_session(&mut self, user: &UserId, session: &str, target: &JoinTarget) -> bool;

    fn find_sessions(&mut self, user: &UserId, session: &str, lan: bool, presence: bool) -> bool;

    fn end_session(&mut self, session: &str) -> bool;

    fn destroy_session(&mut self, session: &str) -> bool;

    /// Add another local player to `session`.
    fn register_local_player(&mut self, user: &UserId, session: &str) -> bool;

    fn session_state(&self, session: &str) -> SessionState;

    fn resolved_connect_string(&self, session: &str) -> Result<String, ConnectError>;
}
