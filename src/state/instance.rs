//! The game instance.
//!
//! Owns the mode machine, the message gate, the local player list and the
//! outstanding completion handles. Collaborators are borrowed per call
//! through a [`Context`].
//!
//! Session operations live in `session.rs`, the per-tick driver in
//! `driver.rs` and platform event handlers in `events.rs`; they are all
//! `impl GameInstance` blocks over the state declared here.

use tracing::{debug, error, info, warn};

use super::context::{Context, PresenceStatus};
use super::events::ConnectionStatus;
use super::handles::HandleTable;
use super::invite::{PendingInvite, Privilege};
use super::message::{GateDecision, MessageGate, PendingMessage};
use super::mode::{Mode, ModeMachine, OnlineMode};
use super::player::{LocalPlayer, LocalPlayers, LoginStatus, LoginStatusTable, UserId};
use super::session::SessionFlow;
use crate::config::InstanceConfig;
use crate::error::{InstanceError, SessionFailure};

/// Front-end lifecycle and session orchestration for one client process.
#[derive(Debug)]
pub struct GameInstance {
    pub(crate) config: InstanceConfig,
    pub(crate) modes: ModeMachine,
    pub(crate) messages: MessageGate,
    pub(crate) invite: PendingInvite,
    pub(crate) handles: HandleTable,
    pub(crate) players: LocalPlayers,
    pub(crate) login_status: LoginStatusTable,
    pub(crate) online_mode: OnlineMode,

    /// URL to travel to once pending session work completes
    pub(crate) travel_url: String,

    /// Enable split-screen when the next map starts loading
    pub(crate) pending_enable_splitscreen: bool,

    pub(crate) is_licensed: bool,

    /// Controller whose pairing changes are ignored (external profile UI)
    pub(crate) ignore_pairing_change_for: Option<i32>,

    /// Last reported online service connection status
    pub(crate) connection_status: ConnectionStatus,

    /// Travel failures are reported to the user while armed
    pub(crate) network_failure_handlers: bool,

    /// Which flow an outstanding local-player registration belongs to
    pub(crate) registering: Option<SessionFlow>,

    /// Unrecoverable error raised during a commit, reported by the next tick
    pub(crate) fatal: Option<InstanceError>,
}

impl GameInstance {
    /// Create an instance with a single primary local player.
    pub fn new(config: InstanceConfig) -> Self {
        let login_status = LoginStatusTable::new(config.max_local_players);
        Self {
            config,
            modes: ModeMachine::new(),
            messages: MessageGate::new(),
            invite: PendingInvite::default(),
            handles: HandleTable::new(),
            players: LocalPlayers::with_primary(LocalPlayer::new(0)),
            login_status,
            online_mode: OnlineMode::default(),
            travel_url: String::new(),
            pending_enable_splitscreen: false,
            is_licensed: true,
            ignore_pairing_change_for: None,
            connection_status: ConnectionStatus::Connected,
            network_failure_handlers: false,
            registering: None,
            fatal: None,
        }
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    pub fn current_mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn pending_mode(&self) -> Mode {
        self.modes.pending()
    }

    pub fn online_mode(&self) -> OnlineMode {
        self.online_mode
    }

    pub fn players(&self) -> &LocalPlayers {
        &self.players
    }

    pub fn pending_message(&self) -> Option<&PendingMessage> {
        self.messages.queued()
    }

    pub fn pending_invite(&self) -> &PendingInvite {
        &self.invite
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    pub fn travel_url(&self) -> &str {
        &self.travel_url
    }

    pub fn has_license(&self) -> bool {
        self.is_licensed
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    pub fn network_failure_handlers_armed(&self) -> bool {
        self.network_failure_handlers
    }

    pub fn is_splitscreen_pending(&self) -> bool {
        self.pending_enable_splitscreen
    }

    // Mode machine

    /// Mode the instance boots into and returns to on sign-out.
    pub fn initial_state(&self) -> Mode {
        self.config.initial_mode
    }

    /// Queue a mode change. Committed by the next tick.
    pub fn goto_state(&mut self, mode: Mode) {
        info!(mode = %mode, "goto state");
        self.modes.goto(mode);
    }

    pub fn goto_initial_state(&mut self) {
        self.goto_state(self.initial_state());
    }

    /// Boot: head for the initial state.
    pub fn start(&mut self) {
        self.goto_initial_state();
    }

    /// Commit the queued mode change, if any.
    pub fn maybe_change_state(&mut self, ctx: &mut Context<'_>) {
        let Some(mut transition) = self.modes.begin_commit() else {
            return;
        };

        if transition.to == Mode::MessageMenu && !self.messages.has_displayable() {
            warn!("message menu requested without a message, going to initial state");
            transition.to = self.initial_state();
            if transition.to == transition.from {
                self.modes.complete(transition);
                return;
            }
        }

        info!(from = %transition.from, to = %transition.to, "changing mode");
        self.end_mode(ctx, transition.from);
        self.begin_mode(ctx, transition.to, transition.from);
        self.modes.complete(transition);
    }

    fn end_mode(&mut self, ctx: &mut Context<'_>, mode: Mode) {
        match mode {
            Mode::PendingInvite => self.end_pending_invite(ctx),
            Mode::Playing => self.end_playing(ctx),
            // Menu teardown belongs to the UI
            Mode::WelcomeScreen | Mode::MainMenu | Mode::MessageMenu | Mode::None => {}
        }
    }

    fn begin_mode(&mut self, ctx: &mut Context<'_>, mode: Mode, previous: Mode) {
        debug!(mode = %mode, previous = %previous, "entering mode");
        match mode {
            Mode::PendingInvite => self.begin_pending_invite(ctx),
            Mode::WelcomeScreen => self.begin_welcome_screen(ctx),
            Mode::MainMenu => self.begin_main_menu(ctx),
            Mode::MessageMenu => self.begin_message_menu(ctx),
            Mode::Playing => self.begin_playing(ctx),
            Mode::None => {}
        }
    }

    fn begin_pending_invite(&mut self, ctx: &mut Context<'_>) {
        let map = self.config.main_menu_map.clone();
        if let Err(err) = self.load_front_end_map(ctx, &map) {
            warn!(error = %err, "cannot handle invite, front end did not load");
            self.goto_state(Mode::WelcomeScreen);
            return;
        }

        match self.invite.user_id.clone() {
            Some(user) => ctx
                .platform
                .start_privilege_check(&user, Privilege::CanPlayOnline),
            None => {
                warn!("pending invite has no user");
                self.invite = PendingInvite::default();
                self.goto_state(Mode::WelcomeScreen);
            }
        }
    }

    fn end_pending_invite(&mut self, ctx: &mut Context<'_>) {
        // The mode may change before the privilege check reports back
        ctx.platform.cancel_privilege_check();
    }

    fn begin_welcome_screen(&mut self, ctx: &mut Context<'_>) {
        // Before split-screen removal, so every player stops using online features
        self.set_online_mode(ctx, OnlineMode::Offline);
        self.remove_split_screen_players(ctx);
        self.abandon_session_requests(ctx);

        let map = self.config.welcome_screen_map.clone();
        self.load_front_end_map_or_fail(ctx, &map);

        if let Some(player) = self.players.first_mut() {
            player.cached_user_id = None;
        }

        ctx.viewport.set_force_disable_splitscreen(true);
    }

    fn begin_main_menu(&mut self, ctx: &mut Context<'_>) {
        ctx.viewport.hide_loading_screen();
        self.set_online_mode(ctx, OnlineMode::Offline);
        ctx.viewport.set_force_disable_splitscreen(true);
        self.remove_split_screen_players(ctx);
        self.abandon_session_requests(ctx);

        let map = self.config.main_menu_map.clone();
        self.load_front_end_map_or_fail(ctx, &map);

        // Player 0 owns the menus
        if let Some(player) = self.players.first_mut() {
            player.controller_id = 0;
            player.cached_user_id = ctx.platform.unique_id_for_controller(0);
        }

        self.remove_network_failure_handlers();
    }

    fn begin_message_menu(&mut self, ctx: &mut Context<'_>) {
        let Some(message) = self.messages.take() else {
            warn!("message menu entered with empty text");
            self.goto_initial_state();
            return;
        };

        ctx.viewport.hide_loading_screen();
        ctx.viewport.show_message(&message);
    }

    fn begin_playing(&mut self, ctx: &mut Context<'_>) {
        self.pending_enable_splitscreen = true;
        self.set_presence_for_local_players(ctx, &PresenceStatus::in_game());
        ctx.viewport.focus_game_view();
    }

    fn end_playing(&mut self, ctx: &mut Context<'_>) {
        ctx.viewport.set_force_disable_splitscreen(true);
        self.set_presence_for_local_players(ctx, &PresenceStatus::in_menu());

        if ctx.world.has_game_state() {
            // Quitting early never counts as a win
            for player in 0..self.players.len() {
                ctx.world.send_round_end_event(player, false);
            }
            ctx.world.request_finish_and_exit_to_main_menu();
        } else {
            self.cleanup_session_on_return_to_menu(ctx);
        }
    }

    /// Load a front-end map unless it is already the current one.
    pub(crate) fn load_front_end_map(
        &mut self,
        ctx: &mut Context<'_>,
        map: &str,
    ) -> Result<(), InstanceError> {
        if ctx.world.current_map().as_deref() == Some(map) {
            return Ok(());
        }

        ctx.world
            .browse(map)
            .map_err(|reason| InstanceError::FrontEndMapLoad {
                map: map.to_string(),
                reason,
            })
    }

    fn load_front_end_map_or_fail(&mut self, ctx: &mut Context<'_>, map: &str) {
        if let Err(err) = self.load_front_end_map(ctx, map) {
            error!(error = %err, "front end map failed to load");
            if self.fatal.is_none() {
                self.fatal = Some(err);
            }
        }
    }

    // Messages

    /// Show `message`, then go to its `next_mode` once dismissed.
    ///
    /// Rejected if a higher priority message is already queued or shown.
    pub fn show_message_then_goto_state(
        &mut self,
        ctx: &mut Context<'_>,
        message: PendingMessage,
        override_existing: bool,
    ) {
        info!(
            message = %message.display_text,
            next_mode = %message.next_mode,
            "show message then goto state"
        );

        match self.messages.offer(&self.modes, message, override_existing) {
            GateDecision::Rejected(reason) => {
                info!(reason = %reason, "ignoring message, higher priority message in queue");
            }
            GateDecision::Queue => self.goto_state(Mode::MessageMenu),
            GateDecision::RefreshInPlace => {
                info!("forcing new message");
                self.end_mode(ctx, Mode::MessageMenu);
                self.begin_message_menu(ctx);
            }
        }
    }

    /// Show `text` with an OK button, then return to the main menu.
    pub fn show_message_then_go_main(&mut self, ctx: &mut Context<'_>, text: impl Into<String>) {
        self.show_message_then_goto_state(ctx, PendingMessage::new(text, Mode::MainMenu), true);
    }

    pub(crate) fn show_failure(&mut self, ctx: &mut Context<'_>, failure: SessionFailure) {
        warn!(failure = %failure, "session failure");
        self.show_message_then_go_main(ctx, failure.to_string());
    }

    /// The user dismissed the message: go where it said.
    pub fn dismiss_message(&mut self) {
        let next = self.messages.next_mode();
        if next != Mode::None {
            self.goto_state(next);
        }
    }

    // Online mode and presence

    pub fn set_online_mode(&mut self, ctx: &mut Context<'_>, mode: OnlineMode) {
        self.online_mode = mode;
        self.update_using_multiplayer_features(ctx, mode == OnlineMode::Online);
    }

    pub fn update_using_multiplayer_features(&mut self, ctx: &mut Context<'_>, enabled: bool) {
        for player in self.players.iter() {
            if let Some(user) = player.preferred_user_id() {
                ctx.platform.set_using_multiplayer_features(user, enabled);
            }
        }
    }

    pub fn set_presence_for_local_players(&mut self, ctx: &mut Context<'_>, presence: &PresenceStatus) {
        for player in 0..self.players.len() {
            self.set_presence_for_local_player(ctx, player, presence);
        }
    }

    pub fn set_presence_for_local_player(
        &mut self,
        ctx: &mut Context<'_>,
        player: usize,
        presence: &PresenceStatus,
    ) {
        if let Some(user) = self.players.get(player).and_then(LocalPlayer::preferred_user_id) {
            ctx.platform.set_presence(user, presence);
        }
    }

    // Local players

    /// Add a split-screen player. `None` when every slot is taken.
    pub fn add_local_player(&mut self, player: LocalPlayer) -> Option<usize> {
        if self.players.len() >= self.config.max_local_players {
            return None;
        }
        Some(self.players.add(player))
    }

    /// Kill the player's pawn and drop the player.
    pub fn remove_existing_local_player(&mut self, ctx: &mut Context<'_>, player: usize) {
        if self.players.get(player).is_none() {
            return;
        }
        ctx.world.kill_player(player);
        self.players.remove(player);
    }

    /// Drop every player but the first, back to front.
    pub fn remove_split_screen_players(&mut self, ctx: &mut Context<'_>) {
        while self.players.len() > 1 {
            let last = self.players.len() - 1;
            self.remove_existing_local_player(ctx, last);
        }
    }

    pub fn unique_id_for_controller(&self, ctx: &Context<'_>, controller_id: i32) -> Option<UserId> {
        ctx.platform.unique_id_for_controller(controller_id)
    }

    pub fn is_local_player_online(&self, ctx: &Context<'_>, player: usize) -> bool {
        self.players
            .get(player)
            .and_then(LocalPlayer::preferred_user_id)
            .is_some_and(|user| ctx.platform.login_status(user) == LoginStatus::LoggedIn)
    }

    pub fn is_local_player_signed_in(&self, player: usize) -> bool {
        self.players
            .get(player)
            .and_then(LocalPlayer::preferred_user_id)
            .is_some()
    }

    /// Check the player can play online.
    pub fn validate_player_for_online_play(&self, ctx: &Context<'_>, player: usize) -> bool {
        if !self.is_local_player_online(ctx, player) {
            info!(player, "player must be signed in to play online");
            return false;
        }
        true
    }

    pub fn validate_player_is_signed_in(&self, player: usize) -> bool {
        if !self.is_local_player_signed_in(player) {
            info!(player, "player must be signed in");
            return false;
        }
        true
    }

    /// Flag the player as having quit the match.
    pub fn label_player_as_quitter(&self, ctx: &mut Context<'_>, player: usize) {
        if self.players.get(player).is_some() {
            ctx.world.label_quitter(player);
        }
    }

    pub fn set_pending_invite(&mut self, invite: PendingInvite) {
        self.invite = invite;
    }

    /// Diagnostic snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "current_mode": self.modes.current().as_str(),
            "pending_mode": self.modes.pending().as_str(),
            "online_mode": self.online_mode.as_str(),
            "pending_message": self.messages.queued().map(PendingMessage::to_json),
            "pending_invite": (!self.invite.is_empty()).then(|| self.invite.to_json()),
            "players": self.players.to_json(),
            "login_status": serde_json::to_value(&self.login_status).unwrap_or_default(),
            "handles": self.handles.to_json(),
            "travel_url": self.travel_url,
            "connection_status": self.connection_status.as_str(),
            "is_licensed": self.is_licensed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{Call, Harness};
    use pretty_assertions::assert_eq;

    fn instance_at(mode: Mode, harness: &mut Harness) -> GameInstance {
        let mut instance = GameInstance::new(InstanceConfig::default());
        instance.goto_state(mode);
        instance.maybe_change_state(&mut harness.ctx());
        harness.clear_calls();
        instance
    }

    #[test]
    fn test_goto_is_deferred() {
        let mut harness = Harness::new();
        let mut instance = GameInstance::new(InstanceConfig::default());

        instance.goto_state(Mode::Playing);
        instance.goto_state(Mode::MainMenu);
        assert_eq!(instance.current_mode(), Mode::None);
        assert_eq!(instance.pending_mode(), Mode::MainMenu);

        instance.maybe_change_state(&mut harness.ctx());
        assert_eq!(instance.current_mode(), Mode::MainMenu);
        assert_eq!(instance.pending_mode(), Mode::None);

        // Idempotent once nothing is pending
        harness.clear_calls();
        instance.maybe_change_state(&mut harness.ctx());
        assert!(harness.calls().is_empty());
    }

    #[test]
    fn test_playing_to_main_menu_order() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::Playing, &mut harness);
        instance.online_mode = OnlineMode::Online;
        instance.players.first_mut().unwrap().cached_user_id = Some(UserId::new("user-0"));

        instance.goto_state(Mode::MainMenu);
        instance.maybe_change_state(&mut harness.ctx());

        let calls = harness.calls();
        let exit = calls
            .iter()
            .position(|c| {
                *c == Call::SetPresence("user-0".into(), "RichPresence".into(), "OnMenu".into())
            })
            .unwrap();
        let enter = calls.iter().position(|c| *c == Call::HideLoadingScreen).unwrap();
        assert!(exit < enter);
        assert_eq!(instance.online_mode(), OnlineMode::Offline);
        assert_eq!(instance.current_mode(), Mode::MainMenu);
    }

    #[test]
    fn test_empty_message_redirects_to_initial_state() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::Playing, &mut harness);

        instance.goto_state(Mode::MessageMenu);
        instance.maybe_change_state(&mut harness.ctx());

        assert_eq!(instance.current_mode(), Mode::MainMenu);
        assert!(!harness.calls().iter().any(|c| matches!(c, Call::ShowMessage(_))));
    }

    #[test]
    fn test_message_is_shown_once() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::Playing, &mut harness);

        instance.show_message_then_go_main(&mut harness.ctx(), "Join failed.");
        assert_eq!(instance.pending_mode(), Mode::MessageMenu);

        instance.maybe_change_state(&mut harness.ctx());
        assert_eq!(instance.current_mode(), Mode::MessageMenu);
        assert_eq!(
            harness.shown_messages(),
            vec!["Join failed.".to_string()]
        );
        assert!(instance.pending_message().is_none());

        instance.dismiss_message();
        instance.maybe_change_state(&mut harness.ctx());
        assert_eq!(instance.current_mode(), Mode::MainMenu);
    }

    #[test]
    fn test_message_at_welcome_screen_is_ignored() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::WelcomeScreen, &mut harness);

        instance.show_message_then_goto_state(
            &mut harness.ctx(),
            PendingMessage::new("Signed out", Mode::MainMenu),
            true,
        );

        assert!(instance.pending_message().is_none());
        assert_eq!(instance.pending_mode(), Mode::None);
        assert_eq!(instance.current_mode(), Mode::WelcomeScreen);
    }

    #[test]
    fn test_second_message_without_override_keeps_first() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::Playing, &mut harness);

        instance.show_message_then_goto_state(
            &mut harness.ctx(),
            PendingMessage::new("A", Mode::MainMenu),
            true,
        );
        instance.show_message_then_goto_state(
            &mut harness.ctx(),
            PendingMessage::new("B", Mode::MainMenu),
            false,
        );

        assert_eq!(instance.pending_message().unwrap().display_text, "A");
    }

    #[test]
    fn test_message_refreshes_in_place() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::Playing, &mut harness);

        instance.show_message_then_go_main(&mut harness.ctx(), "first");
        instance.maybe_change_state(&mut harness.ctx());

        instance.show_message_then_goto_state(
            &mut harness.ctx(),
            PendingMessage::new("second", Mode::Playing),
            true,
        );

        assert_eq!(instance.current_mode(), Mode::MessageMenu);
        assert_eq!(instance.pending_mode(), Mode::None);
        assert_eq!(
            harness.shown_messages(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_welcome_screen_resets_players() {
        let mut harness = Harness::new();
        let mut instance = GameInstance::new(InstanceConfig::default());
        instance.players.first_mut().unwrap().cached_user_id = Some(UserId::new("user-0"));
        instance.add_local_player(LocalPlayer::new(1)).unwrap();
        instance.add_local_player(LocalPlayer::new(2)).unwrap();

        instance.goto_state(Mode::WelcomeScreen);
        instance.maybe_change_state(&mut harness.ctx());

        assert_eq!(instance.players().len(), 1);
        assert!(instance.players().first().unwrap().cached_user_id.is_none());
        assert_eq!(instance.online_mode(), OnlineMode::Offline);

        // Removed from the tail
        let kills: Vec<_> = harness
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::KillPlayer(_)))
            .collect();
        assert_eq!(kills, vec![Call::KillPlayer(2), Call::KillPlayer(1)]);
        assert!(harness.calls().contains(&Call::ForceDisableSplitscreen(true)));
    }

    #[test]
    fn test_main_menu_assigns_first_player() {
        let mut harness = Harness::new();
        harness.platform.controller_ids.insert(0, UserId::new("alice"));
        let instance = instance_at(Mode::MainMenu, &mut harness);

        let first = instance.players().first().unwrap();
        assert_eq!(first.controller_id, 0);
        assert_eq!(first.cached_user_id, Some(UserId::new("alice")));
        assert!(!instance.network_failure_handlers_armed());
    }

    #[test]
    fn test_front_end_map_failure_is_fatal() {
        let mut harness = Harness::new();
        harness.world.fail_browse = true;
        let mut instance = GameInstance::new(InstanceConfig::default());

        instance.goto_state(Mode::MainMenu);
        instance.maybe_change_state(&mut harness.ctx());

        assert!(matches!(
            instance.fatal,
            Some(InstanceError::FrontEndMapLoad { .. })
        ));
    }

    #[test]
    fn test_pending_invite_map_failure_goes_to_welcome() {
        let mut harness = Harness::new();
        harness.world.fail_browse = true;
        let mut instance = GameInstance::new(InstanceConfig::default());

        instance.goto_state(Mode::PendingInvite);
        instance.maybe_change_state(&mut harness.ctx());

        assert_eq!(instance.current_mode(), Mode::PendingInvite);
        assert_eq!(instance.pending_mode(), Mode::WelcomeScreen);
        assert!(instance.fatal.is_none());
    }

    #[test]
    fn test_invite_without_user_goes_to_welcome() {
        let mut harness = Harness::new();
        let mut instance = GameInstance::new(InstanceConfig::default());
        instance.handle_invite_accepted(PendingInvite::default());

        instance.tick(&mut harness.ctx()).unwrap();
        assert_eq!(instance.current_mode(), Mode::PendingInvite);
        assert_eq!(instance.pending_mode(), Mode::WelcomeScreen);
        assert!(!harness
            .calls()
            .iter()
            .any(|c| matches!(c, Call::StartPrivilegeCheck(_))));

        instance.tick(&mut harness.ctx()).unwrap();
        assert_eq!(instance.current_mode(), Mode::WelcomeScreen);
        assert!(instance.pending_invite().is_empty());
    }

    #[test]
    fn test_playing_enter_and_exit_without_game_state() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::Playing, &mut harness);
        assert!(instance.is_splitscreen_pending());

        harness.sessions.state = crate::state::provider::SessionState::InProgress;
        instance.goto_state(Mode::MainMenu);
        instance.maybe_change_state(&mut harness.ctx());

        assert!(harness.calls().contains(&Call::EndSession("GameSession".into())));
    }

    #[test]
    fn test_playing_exit_with_game_state() {
        let mut harness = Harness::new();
        let mut instance = instance_at(Mode::Playing, &mut harness);
        instance.add_local_player(LocalPlayer::new(1)).unwrap();
        harness.world.has_game_state = true;

        instance.goto_state(Mode::MainMenu);
        instance.maybe_change_state(&mut harness.ctx());

        let calls = harness.calls();
        assert!(calls.contains(&Call::RoundEnd(0, false)));
        assert!(calls.contains(&Call::RoundEnd(1, false)));
        assert!(calls.contains(&Call::FinishAndExit));
        assert!(!calls.iter().any(|c| matches!(c, Call::EndSession(_))));
    }

    #[test]
    fn test_add_local_player_limit() {
        let mut instance = GameInstance::new(InstanceConfig::default());
        for i in 1..instance.config().max_local_players {
            assert!(instance.add_local_player(LocalPlayer::new(i as i32)).is_some());
        }
        assert!(instance.add_local_player(LocalPlayer::new(9)).is_none());
    }

    #[test]
    fn test_online_checks() {
        let mut harness = Harness::new();
        let mut instance = GameInstance::new(InstanceConfig::default());
        assert!(!instance.validate_player_is_signed_in(0));

        instance.players.first_mut().unwrap().cached_user_id = Some(UserId::new("alice"));
        assert!(instance.validate_player_is_signed_in(0));
        assert!(!instance.validate_player_for_online_play(&harness.ctx(), 0));

        harness
            .platform
            .login
            .insert(UserId::new("alice"), LoginStatus::LoggedIn);
        assert!(instance.is_local_player_online(&harness.ctx(), 0));
        assert!(!instance.is_local_player_online(&harness.ctx(), 3));
    }

    #[test]
    fn test_snapshot() {
        let mut harness = Harness::new();
        let instance = instance_at(Mode::MainMenu, &mut harness);
        let snapshot = instance.to_json();
        assert_eq!(snapshot["current_mode"], "main_menu");
        assert_eq!(snapshot["online_mode"], "offline");
        assert!(snapshot["pending_invite"].is_null());
    }
}
