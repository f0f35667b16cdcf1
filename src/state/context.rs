//! Collaborators the instance drives, passed in per call.
//!
//! Nothing here is owned by the instance. The host builds a [`Context`]
//! from its viewport, world, platform services and (optionally) session
//! provider and hands it to every operation.

use super::invite::Privilege;
use super::message::PendingMessage;
use super::player::{LoginStatus, UserId};
use super::provider::SessionProvider;

/// Key under which the presence value is published.
pub const DEFAULT_PRESENCE_KEY: &str = "RichPresence";

/// Rich presence published for a local player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceStatus {
    /// Human readable status
    pub status: String,
    /// Property the value is published under
    pub key: String,
    /// Machine readable value
    pub value: String,
}

impl PresenceStatus {
    /// Presence published under [`DEFAULT_PRESENCE_KEY`].
    pub fn new(status: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            key: DEFAULT_PRESENCE_KEY.to_string(),
            value: value.into(),
        }
    }

    pub fn in_game() -> Self {
        Self::new("In Game", "InGame")
    }

    pub fn in_menu() -> Self {
        Self::new("In Menu", "OnMenu")
    }
}

/// Game view and front-end UI.
pub trait Viewport {
    /// Server-only instances have no front end to drive.
    fn is_dedicated_server(&self) -> bool;

    /// Whether this instance owns the foreground view.
    fn is_active_view(&self) -> bool;

    fn hide_loading_screen(&mut self);

    fn set_force_disable_splitscreen(&mut self, disabled: bool);

    fn focus_game_view(&mut self);

    fn show_message(&mut self, message: &PendingMessage);
}

/// The loaded world and its gameplay objects.
pub trait World {
    fn current_map(&self) -> Option<String>;

    /// Load `map` as the persistent level.
    fn browse(&mut self, map: &str) -> Result<(), String>;

    fn server_travel(&mut self, url: &str);

    /// Travel the first local player controller to `url`.
    fn client_travel(&mut self, url: &str);

    fn has_player_controller(&self) -> bool;

    fn has_game_state(&self) -> bool;

    fn send_round_end_event(&mut self, player: usize, won: bool);

    /// Let the game state wind the match down and return to the menu.
    fn request_finish_and_exit_to_main_menu(&mut self);

    fn kill_player(&mut self, player: usize);

    fn label_quitter(&mut self, player: usize);

    /// Whether any controller is paused or already shows its game menu.
    fn is_paused_or_menu_visible(&self) -> bool;

    fn show_in_game_menu(&mut self);

    fn play_replay(&mut self, name: &str);
}

/// Identity, presence and licensing services.
pub trait Platform {
    fn login_status(&self, user: &UserId) -> LoginStatus;

    fn unique_id_for_controller(&self, controller_id: i32) -> Option<UserId>;

    fn license_valid(&self) -> bool;

    fn set_using_multiplayer_features(&mut self, user: &UserId, enabled: bool);

    fn set_presence(&mut self, user: &UserId, presence: &PresenceStatus);

    /// Start an asynchronous privilege check; the result is reported back
    /// through `GameInstance::on_user_can_play_invite`.
    fn start_privilege_check(&mut self, user: &UserId, privilege: Privilege);

    fn cancel_privilege_check(&mut self);
}

/// Everything an operation may touch, for the duration of one call.
pub struct Context<'a> {
    pub viewport: &'a mut dyn Viewport,
    pub world: &'a mut dyn World,
    pub platform: &'a mut dyn Platform,
    /// Absent when no session subsystem is available.
    pub sessions: Option<&'a mut dyn SessionProvider>,
}

impl<'a> Context<'a> {
    pub fn new(
        viewport: &'a mut dyn Viewport,
        world: &'a mut dyn World,
        platform: &'a mut dyn Platform,
    ) -> Self {
        Self {
            viewport,
            world,
            platform,
            sessions: None,
        }
    }

    pub fn with_sessions(mut self, sessions: &'a mut dyn SessionProvider) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn sessions(&mut self) -> Option<&mut (dyn SessionProvider + 'a)> {
        self.sessions.as_deref_mut()
    }
}
