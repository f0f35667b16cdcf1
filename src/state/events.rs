//! Platform and engine events delivered to the instance.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::context::Context;
use super::instance::GameInstance;
use super::invite::{PendingInvite, PrivilegeResult};
use super::message::PendingMessage;
use super::mode::{Mode, OnlineMode};
use super::player::{LoginStatus, UserId, INVALID_CONTROLLER_ID};
use super::travel::EncryptionKeyResponse;

/// Connection to the online service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Connected,
    NotConnected,
    ConnectionDropped,
    NoNetworkConnection,
    ServiceUnavailable,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::NotConnected => "not_connected",
            Self::ConnectionDropped => "connection_dropped",
            Self::NoNetworkConnection => "no_network_connection",
            Self::ServiceUnavailable => "service_unavailable",
        }
    }
}

/// Console commands that move the instance between modes when they succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Open,
    Travel,
    Disconnect,
}

impl ConsoleCommand {
    /// Mode entered after the command ran successfully.
    pub fn target_mode(&self) -> Mode {
        match self {
            Self::Open | Self::Travel => Mode::Playing,
            Self::Disconnect => Mode::MainMenu,
        }
    }
}

impl GameInstance {
    // Invites

    /// An invite was accepted through the platform UI.
    pub fn handle_invite_accepted(&mut self, invite: PendingInvite) {
        info!(controller_id = invite.controller_id, "invite accepted");
        self.set_pending_invite(invite);
        self.goto_state(Mode::PendingInvite);
    }

    /// Result of the privilege check started on entering `PendingInvite`.
    pub fn on_user_can_play_invite(&mut self, user: &UserId, result: PrivilegeResult) {
        if result.is_allowed() {
            if self.invite.user_id.as_ref() == Some(user) {
                self.invite.privileges_checked = true;
            }
        } else {
            warn!(user = %user, result = ?result, "invited user may not play online");
            self.goto_state(Mode::WelcomeScreen);
        }
    }

    // Sign-in

    /// The primary user signed out: back to the initial state.
    fn handle_sign_in_change_messaging(&mut self) {
        if self.modes.current() != self.initial_state() {
            self.goto_initial_state();
        }
    }

    pub fn handle_user_login_changed(
        &mut self,
        ctx: &mut Context<'_>,
        slot: usize,
        previous: LoginStatus,
        status: LoginStatus,
        user: &UserId,
    ) {
        let downgraded = match self.online_mode {
            OnlineMode::Offline => status == LoginStatus::NotLoggedIn,
            _ => status != LoginStatus::LoggedIn,
        };

        info!(
            slot,
            previous = previous.as_str(),
            status = status.as_str(),
            downgraded,
            "user login changed"
        );

        self.is_licensed = ctx.platform.license_valid();
        self.login_status.record(slot, status);

        let Some(player) = self.players.find_by_user(user) else {
            return;
        };
        if !downgraded {
            return;
        }

        info!(user = %user, "player logged out");
        self.label_player_as_quitter(ctx, player);

        if player == 0 || self.online_mode != OnlineMode::Offline {
            self.handle_sign_in_change_messaging();
        } else {
            // Offline split-screen player: just drop them
            self.remove_existing_local_player(ctx, player);
        }
    }

    // Application lifecycle

    /// Pause the match before the app loses focus.
    pub fn handle_app_will_deactivate(&mut self, ctx: &mut Context<'_>) {
        if self.modes.current() != Mode::Playing {
            return;
        }
        // A second menu must not open on top of an existing one
        if !ctx.world.is_paused_or_menu_visible() {
            ctx.world.show_in_game_menu();
        }
    }

    /// The app may exit before resuming, so report round ends now.
    pub fn handle_app_suspend(&mut self, ctx: &mut Context<'_>) {
        warn!("app suspending");

        let current = self.modes.current();
        if current == Mode::None || current == self.initial_state() {
            return;
        }
        if !ctx.world.has_game_state() {
            return;
        }

        warn!("sending round end events for local players");
        for player in 0..self.players.len() {
            ctx.world.send_round_end_event(player, false);
        }
    }

    /// Detect players that signed out while suspended.
    pub fn handle_app_resume(&mut self, ctx: &mut Context<'_>) {
        info!("app resumed");

        let current = self.modes.current();
        if current == Mode::None || current == self.initial_state() {
            return;
        }

        let ctx: &Context<'_> = ctx;
        let signed_out = (0..self.players.len()).any(|player| {
            self.is_local_player_signed_in(player)
                && self.login_status.status(player) == LoginStatus::LoggedIn
                && !self.is_local_player_online(ctx, player)
        });

        if signed_out {
            info!("signed out during resume");
            self.handle_sign_in_change_messaging();
        }
    }

    pub fn handle_app_license_update(&mut self, ctx: &mut Context<'_>) {
        self.is_licensed = ctx.platform.license_valid();
    }

    // Controllers

    pub fn handle_controller_connection_change(&mut self, is_connection: bool, controller_id: i32) {
        info!(is_connection, controller_id, "controller connection change");

        if is_connection {
            return;
        }
        if let Some(player) = self
            .players
            .find_by_controller(controller_id)
            .and_then(|index| self.players.get_mut(index))
        {
            player.controller_id = INVALID_CONTROLLER_ID;
        }
    }

    pub fn handle_controller_pairing_changed(
        &mut self,
        controller_id: i32,
        previous: Option<&UserId>,
        new: Option<&UserId>,
    ) {
        info!(
            controller_id,
            previous = previous.map(UserId::as_str),
            new = new.map(UserId::as_str),
            "controller pairing changed"
        );

        if self.modes.current() == Mode::WelcomeScreen {
            return;
        }
        if self.ignore_pairing_change_for == Some(controller_id) {
            debug!(controller_id, "ignoring pairing change");
            self.ignore_pairing_change_for = None;
        }
    }

    /// Ignore the next pairing change on `controller_id`. Negative clears.
    pub fn set_ignore_pairing_change_for_controller_id(&mut self, controller_id: i32) {
        self.ignore_pairing_change_for = (controller_id >= 0).then_some(controller_id);
    }

    // Online service

    pub fn handle_network_connection_status_changed(
        &mut self,
        service: &str,
        previous: ConnectionStatus,
        status: ConnectionStatus,
    ) {
        info!(
            service,
            previous = previous.as_str(),
            status = status.as_str(),
            "network connection status changed"
        );
        self.connection_status = status;
    }

    pub fn handle_session_failure(&mut self, user: &UserId, reason: &str) {
        warn!(user = %user, reason, "session failure");
    }

    // Map loading

    pub fn on_pre_load_map(&mut self, ctx: &mut Context<'_>, map: &str) {
        debug!(map, "pre load map");
        if self.pending_enable_splitscreen {
            ctx.viewport.set_force_disable_splitscreen(false);
            self.pending_enable_splitscreen = false;
        }
    }

    pub fn on_post_load_map(&mut self, ctx: &mut Context<'_>) {
        ctx.viewport.hide_loading_screen();
    }

    // Console commands

    /// Follow up a console command the engine has run. Returns `succeeded`.
    pub fn handle_console_command(&mut self, command: ConsoleCommand, succeeded: bool) -> bool {
        if succeeded {
            self.goto_state(command.target_mode());
        }
        succeeded
    }

    // Replays

    pub fn play_demo(&mut self, ctx: &mut Context<'_>, player: usize, name: &str) -> bool {
        info!(player, name, "playing demo");
        ctx.world.play_replay(name);
        true
    }

    pub fn on_post_demo_play(&mut self) {
        self.goto_state(Mode::Playing);
    }

    /// Demo playback failed. Editor play worlds only log it.
    pub fn handle_demo_playback_failure(&mut self, ctx: &mut Context<'_>, error: &str, in_editor: bool) {
        if in_editor {
            warn!(error, "demo failed to play back correctly");
            return;
        }

        let message = PendingMessage::new(format!("Demo playback failed: {}", error), Mode::MainMenu);
        self.show_message_then_goto_state(ctx, message, true);
    }

    // Connection encryption

    /// Server side: key for a client's encryption token.
    pub fn received_network_encryption_token(&self, token: &str) -> EncryptionKeyResponse {
        let response = EncryptionKeyResponse::for_token(token);
        if !response.is_success() {
            warn!("rejected empty encryption token");
        }
        response
    }

    /// Client side: the server acknowledged encryption.
    pub fn received_network_encryption_ack(&self) -> EncryptionKeyResponse {
        EncryptionKeyResponse::for_ack()
    }
}
