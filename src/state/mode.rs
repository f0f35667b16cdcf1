//! Application mode state machine.
//!
//! Tracks which top-level mode the client is in and queues at most one
//! transition between two commits.
//!
//! # State Diagram
//!
//! ```text
//!                  ┌───────────────┐
//!      invite ────▶│ PendingInvite │──── map load failed ─────┐
//!                  └───────┬───────┘                          │
//!                          │ host / join                      ▼
//! ┌──────────┐       ┌─────┴─────┐     failure      ┌───────────────┐
//! │ MainMenu │──────▶│  Playing  │─────────────────▶│  MessageMenu  │
//! └──────────┘ host  └───────────┘                  └───────┬───────┘
//!      ▲       join        │                                │ dismiss
//!      │                   │ disconnect                     │
//!      └───────────────────┴────────────────────────────────┘
//!
//!                  ┌───────────────┐
//!   sign-out ─────▶│ WelcomeScreen │  (never preempted by a message)
//!                  └───────────────┘
//! ```
//!
//! Requests ([`ModeMachine::goto`]) only record the target. The commit
//! happens once per tick, so a request made inside a completion callback
//! never mutates the current mode re-entrantly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level lifecycle mode of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// No mode. As a pending value it means "no transition queued".
    #[default]
    None,
    /// Resolving a platform invite
    PendingInvite,
    /// Press-start / sign-in screen
    WelcomeScreen,
    /// Front-end menus
    MainMenu,
    /// Modal message, then on to another mode
    MessageMenu,
    /// In a match
    Playing,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PendingInvite => "pending_invite",
            Self::WelcomeScreen => "welcome_screen",
            Self::MainMenu => "main_menu",
            Self::MessageMenu => "message_menu",
            Self::Playing => "playing",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::PendingInvite => write!(f, "PendingInvite"),
            Self::WelcomeScreen => write!(f, "WelcomeScreen"),
            Self::MainMenu => write!(f, "MainMenu"),
            Self::MessageMenu => write!(f, "MessageMenu"),
            Self::Playing => write!(f, "Playing"),
        }
    }
}

/// Whether network session calls are made at all, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnlineMode {
    Offline,
    Lan,
    /// Default until a front-end mode forces offline.
    #[default]
    Online,
}

impl OnlineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Lan => "lan",
            Self::Online => "online",
        }
    }
}

/// A transition taken out of the machine for commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

/// Current/pending mode pair.
///
/// Exactly one current mode and at most one pending mode exist at any time.
#[derive(Debug, Clone, Default)]
pub struct ModeMachine {
    current: Mode,
    pending: Mode,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a machine already in `mode` (for restoring state).
    pub fn at(mode: Mode) -> Self {
        Self {
            current: mode,
            pending: Mode::None,
        }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn pending(&self) -> Mode {
        self.pending
    }

    /// Queue a transition. The last request before a commit wins.
    pub fn goto(&mut self, mode: Mode) {
        self.pending = mode;
    }

    /// Check if the machine is in `mode` or has it queued.
    pub fn is_at_or_heading_to(&self, mode: Mode) -> bool {
        self.current == mode || self.pending == mode
    }

    /// Check if a transition other than "stay where we are" is queued.
    pub fn has_queued_change(&self) -> bool {
        self.pending != self.current && self.pending != Mode::None
    }

    /// Take the queued transition, if any, clearing `pending`.
    ///
    /// The current mode reads `None` until [`ModeMachine::complete`] is
    /// called, which mirrors exit actions running before enter actions.
    pub fn begin_commit(&mut self) -> Option<Transition> {
        if !self.has_queued_change() {
            return None;
        }
        let transition = Transition {
            from: self.current,
            to: self.pending,
        };
        self.pending = Mode::None;
        self.current = Mode::None;
        Some(transition)
    }

    /// Finish a commit started by [`ModeMachine::begin_commit`].
    pub fn complete(&mut self, transition: Transition) {
        self.current = transition.to;
    }
}
