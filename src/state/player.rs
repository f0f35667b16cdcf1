//! Local players and their sign-in status.
//!
//! The first slot is the primary player and is never removed; extra slots
//! are split-screen players and are removed from the tail.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of local player slots tracked for login status.
pub const MAX_LOCAL_PLAYERS: usize = 4;

/// Controller id meaning "no controller assigned".
pub const INVALID_CONTROLLER_ID: i32 = -1;

/// Platform identity token for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform login status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoginStatus {
    #[default]
    NotLoggedIn,
    /// Signed in locally, no online service
    UsingLocalProfile,
    LoggedIn,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "not_logged_in",
            Self::UsingLocalProfile => "using_local_profile",
            Self::LoggedIn => "logged_in",
        }
    }
}

/// A player sharing this process.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPlayer {
    /// Input controller driving this player
    pub controller_id: i32,

    /// Identity cached when the player signed in
    pub cached_user_id: Option<UserId>,
}

impl LocalPlayer {
    pub fn new(controller_id: i32) -> Self {
        Self {
            controller_id,
            cached_user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.cached_user_id = Some(user_id);
        self
    }

    /// Identity used for online calls.
    pub fn preferred_user_id(&self) -> Option<&UserId> {
        self.cached_user_id.as_ref()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "controller_id": self.controller_id,
            "user_id": self.cached_user_id.as_ref().map(UserId::as_str)
        })
    }
}

/// Ordered local player list. Index 0 is the primary player.
#[derive(Debug, Clone, Default)]
pub struct LocalPlayers {
    players: Vec<LocalPlayer>,
}

impl LocalPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list holding only the primary player.
    pub fn with_primary(player: LocalPlayer) -> Self {
        Self {
            players: vec![player],
        }
    }

    pub fn add(&mut self, player: LocalPlayer) -> usize {
        self.players.push(player);
        self.players.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&LocalPlayer> {
        self.players.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut LocalPlayer> {
        self.players.get_mut(index)
    }

    pub fn first(&self) -> Option<&LocalPlayer> {
        self.players.first()
    }

    pub fn first_mut(&mut self) -> Option<&mut LocalPlayer> {
        self.players.first_mut()
    }

    pub fn remove(&mut self, index: usize) -> Option<LocalPlayer> {
        if index < self.players.len() {
            Some(self.players.remove(index))
        } else {
            None
        }
    }

    /// Find the slot holding `user_id`.
    pub fn find_by_user(&self, user_id: &UserId) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.cached_user_id.as_ref() == Some(user_id))
    }

    /// Find the slot driven by `controller_id`.
    pub fn find_by_controller(&self, controller_id: i32) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.controller_id == controller_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalPlayer> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Check if split-screen players are present.
    pub fn has_split_screen(&self) -> bool {
        self.players.len() > 1
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.players.iter().map(LocalPlayer::to_json).collect())
    }
}

/// Last-known login status for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPlayerStatus {
    pub status: LoginStatus,
    pub changed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Default for LocalPlayerStatus {
    fn default() -> Self {
        Self {
            status: LoginStatus::NotLoggedIn,
            changed_at: None,
        }
    }
}

/// Per-slot login status, used to spot sign-outs across suspend/resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginStatusTable {
    slots: Vec<LocalPlayerStatus>,
}

impl LoginStatusTable {
    pub fn new(slots: usize) -> Self {
        Self {
            slots: vec![LocalPlayerStatus::default(); slots],
        }
    }

    /// Record a status change. Out-of-range slots are ignored.
    pub fn record(&mut self, slot: usize, status: LoginStatus) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                entry.status = status;
                entry.changed_at = Some(chrono::Utc::now());
                true
            }
            None => false,
        }
    }

    pub fn status(&self, slot: usize) -> LoginStatus {
        self.slots
            .get(slot)
            .map(|s| s.status)
            .unwrap_or_default()
    }

    pub fn get(&self, slot: usize) -> Option<&LocalPlayerStatus> {
        self.slots.get(slot)
    }
}

impl Default for LoginStatusTable {
    fn default() -> Self {
        Self::new(MAX_LOCAL_PLAYERS)
    }
}
