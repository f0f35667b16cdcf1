//! Queued "show a message, then go somewhere" requests.
//!
//! The gate decides whether a new message may replace whatever is already
//! queued or on screen. The checks run in a fixed order; the first one that
//! matches rejects the request.

use std::fmt;

use super::mode::{Mode, ModeMachine};

/// Default label for the confirm button.
pub const OK_LABEL: &str = "OK";

/// A message waiting to be shown by the message menu.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMessage {
    /// Main message body
    pub display_text: String,

    /// Confirm button text
    pub ok_label: String,

    /// Cancel button text (empty means no cancel button)
    pub cancel_label: String,

    /// Mode to enter once the message is dismissed
    pub next_mode: Mode,

    /// Local player slot that owns the dialog focus
    pub owner: Option<usize>,

    /// When the message was accepted by the gate
    pub queued_at: chrono::DateTime<chrono::Utc>,
}

impl PendingMessage {
    pub fn new(display_text: impl Into<String>, next_mode: Mode) -> Self {
        Self {
            display_text: display_text.into(),
            ok_label: OK_LABEL.to_string(),
            cancel_label: String::new(),
            next_mode,
            owner: None,
            queued_at: chrono::Utc::now(),
        }
    }

    pub fn with_labels(mut self, ok_label: impl Into<String>, cancel_label: impl Into<String>) -> Self {
        self.ok_label = ok_label.into();
        self.cancel_label = cancel_label.into();
        self
    }

    pub fn with_owner(mut self, owner: Option<usize>) -> Self {
        self.owner = owner;
        self
    }

    pub fn has_cancel(&self) -> bool {
        !self.cancel_label.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "display_text": self.display_text,
            "ok_label": self.ok_label,
            "cancel_label": self.cancel_label,
            "next_mode": self.next_mode.as_str(),
            "owner": self.owner,
            "queued_at": self.queued_at.to_rfc3339()
        })
    }
}

/// Why the gate turned a message away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// At or heading to the welcome screen
    WelcomeScreenPriority,
    /// A message for the same destination is already queued
    SameDestinationQueued,
    /// A queued message already leads to the welcome screen
    WelcomeScreenQueued,
    /// Already at or heading to the destination
    AlreadyAtDestination,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WelcomeScreenPriority => write!(f, "at welcome screen"),
            Self::SameDestinationQueued => write!(f, "same destination already queued"),
            Self::WelcomeScreenQueued => write!(f, "queued message leads to welcome screen"),
            Self::AlreadyAtDestination => write!(f, "already at destination"),
        }
    }
}

/// Outcome of offering a message to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Rejected(Rejection),
    /// Stored; queue a transition to the message menu.
    Queue,
    /// Stored; the message menu is current and must be re-entered now.
    RefreshInPlace,
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Message queue gate.
///
/// `next_mode` outlives the message itself: once the message menu consumes
/// the text, the destination is still remembered for the ordering checks
/// and for dismissal.
#[derive(Debug, Default)]
pub struct MessageGate {
    queued: Option<PendingMessage>,
    next_mode: Mode,
}

impl MessageGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a message; store it unless one of the checks rejects it.
    pub fn offer(
        &mut self,
        modes: &ModeMachine,
        message: PendingMessage,
        override_existing: bool,
    ) -> GateDecision {
        // 1. The welcome screen is never preempted
        if modes.is_at_or_heading_to(Mode::WelcomeScreen) {
            return GateDecision::Rejected(Rejection::WelcomeScreenPriority);
        }

        let at_message_menu = modes.is_at_or_heading_to(Mode::MessageMenu);

        // 2. Same destination already queued
        if at_message_menu && self.next_mode == message.next_mode && !override_existing {
            return GateDecision::Rejected(Rejection::SameDestinationQueued);
        }

        // 3. A queued message heading to the welcome screen wins
        if at_message_menu && self.next_mode == Mode::WelcomeScreen {
            return GateDecision::Rejected(Rejection::WelcomeScreenQueued);
        }

        // 4. Already there
        if modes.is_at_or_heading_to(message.next_mode) && !override_existing {
            return GateDecision::Rejected(Rejection::AlreadyAtDestination);
        }

        self.next_mode = message.next_mode;
        self.queued = Some(message);

        if modes.current() == Mode::MessageMenu {
            GateDecision::RefreshInPlace
        } else {
            GateDecision::Queue
        }
    }

    /// Check if a message with non-empty text is waiting.
    pub fn has_displayable(&self) -> bool {
        self.queued
            .as_ref()
            .is_some_and(|m| !m.display_text.is_empty())
    }

    /// Take the queued message for display. One-shot.
    pub fn take(&mut self) -> Option<PendingMessage> {
        self.queued.take().filter(|m| !m.display_text.is_empty())
    }

    pub fn queued(&self) -> Option<&PendingMessage> {
        self.queued.as_ref()
    }

    /// Destination of the most recently accepted message.
    pub fn next_mode(&self) -> Mode {
        self.next_mode
    }
}
