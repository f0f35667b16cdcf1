//! Session orchestration: hosting, joining, searching, travel and teardown.
//!
//! Every provider request follows the same shape. A completion handle is
//! registered first, then the request is issued. A rejected request
//! releases the handle and is reported through the message gate; an
//! accepted one moves to `Playing` unless another transition is already
//! queued. Completions come back through [`GameInstance::handle_completion`],
//! which drops any completion whose handle is no longer registered.

use tracing::{debug, info, warn};

use super::context::Context;
use super::handles::{CompletionHandle, OperationKind};
use super::instance::GameInstance;
use super::mode::{Mode, OnlineMode};
use super::player::{LocalPlayer, UserId};
use super::provider::{JoinResult, JoinTarget, SearchResult, SessionCompletion, SessionSettings, SessionState};
use super::travel;
use crate::error::{JoinFailure, SessionFailure, TravelFailure};

/// Flow that asked for the split-screen player to be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFlow {
    Hosting,
    Joining,
}

impl GameInstance {
    /// Register the persistent activity-request handle.
    pub fn init(&mut self, ctx: &mut Context<'_>) {
        if !self.track(ctx, OperationKind::ActivityRequest) {
            debug!("no session subsystem, activity requests disabled");
        }
    }

    /// Release every outstanding handle.
    pub fn shutdown(&mut self, ctx: &mut Context<'_>) {
        for kind in OperationKind::ALL {
            self.untrack(ctx, kind);
        }
        self.registering = None;
    }

    /// Subscribe a fresh handle for `kind`, replacing any previous one.
    fn track(&mut self, ctx: &mut Context<'_>, kind: OperationKind) -> bool {
        let Some(sessions) = ctx.sessions() else {
            return false;
        };
        let handle = sessions.subscribe(kind);
        if let Some(displaced) = self.handles.register(kind, handle) {
            sessions.unsubscribe(displaced);
        }
        true
    }

    fn untrack(&mut self, ctx: &mut Context<'_>, kind: OperationKind) {
        if let Some(handle) = self.handles.release(kind) {
            if let Some(sessions) = ctx.sessions() {
                sessions.unsubscribe(handle);
            }
        }
    }

    /// Forget requests the user walked away from.
    pub(crate) fn abandon_session_requests(&mut self, ctx: &mut Context<'_>) {
        for kind in [
            OperationKind::Join,
            OperationKind::Create,
            OperationKind::RegisterLocalPlayer,
        ] {
            self.untrack(ctx, kind);
        }
        self.registering = None;
    }

    fn player_user(&self, player: usize) -> Option<UserId> {
        self.players
            .get(player)
            .and_then(LocalPlayer::preferred_user_id)
            .cloned()
    }

    pub(crate) fn add_network_failure_handlers(&mut self) {
        self.network_failure_handlers = true;
    }

    pub(crate) fn remove_network_failure_handlers(&mut self) {
        self.network_failure_handlers = false;
    }

    // Hosting

    /// Host a match at `travel_url`.
    ///
    /// Offline games skip the provider and travel straight to the map.
    pub fn host_game(
        &mut self,
        ctx: &mut Context<'_>,
        player: usize,
        game_type: &str,
        travel_url: &str,
    ) -> bool {
        if self.online_mode == OnlineMode::Offline {
            info!(url = travel_url, "hosting offline game");
            self.goto_state(Mode::Playing);
            self.travel_url = travel_url.to_string();
            ctx.world.server_travel(&self.travel_url);
            return true;
        }

        let Some(user) = self.player_user(player) else {
            warn!(player, "cannot host without a signed in player");
            return false;
        };

        self.travel_url = travel_url.to_string();
        let settings = SessionSettings {
            game_mode: game_type.to_string(),
            map_name: travel::map_name(travel_url).to_string(),
            is_lan: travel::is_lan_match(travel_url),
            uses_presence: true,
            public_connections: self.config.default_num_players,
        };

        self.request_host(ctx, &user, &settings)
    }

    /// Create a session from invite settings and host a quick match in it.
    pub fn host_quick_session(
        &mut self,
        ctx: &mut Context<'_>,
        player: usize,
        settings: &SessionSettings,
    ) -> bool {
        let Some(user) = self.player_user(player) else {
            warn!(player, "cannot host quick session without a signed in player");
            return false;
        };

        self.travel_url = self.config.quick_match_url.clone();
        let settings = SessionSettings {
            game_mode: travel::parse_option(&self.travel_url, "game")
                .unwrap_or_default()
                .to_string(),
            map_name: travel::map_name(&self.travel_url).to_string(),
            public_connections: self.config.quick_match_public_connections,
            ..settings.clone()
        };

        self.request_host(ctx, &user, &settings)
    }

    fn request_host(&mut self, ctx: &mut Context<'_>, user: &UserId, settings: &SessionSettings) -> bool {
        if !self.track(ctx, OperationKind::Create) {
            warn!("no session subsystem, cannot host");
            return false;
        }

        let session = self.config.session_name.clone();
        let accepted = ctx
            .sessions()
            .is_some_and(|sessions| sessions.host_session(user, &session, settings));

        if !accepted {
            self.untrack(ctx, OperationKind::Create);
            self.show_failure(ctx, SessionFailure::CreateFailed);
            return false;
        }

        self.enter_playing_unless_redirected()
    }

    /// Move to `Playing` unless something else was queued meanwhile.
    fn enter_playing_unless_redirected(&mut self) -> bool {
        if self.modes.has_queued_change() {
            info!(pending = %self.modes.pending(), "request accepted but another transition is queued");
            return false;
        }
        self.goto_state(Mode::Playing);
        true
    }

    pub fn quick_match_url(&self) -> &str {
        &self.config.quick_match_url
    }

    /// Host a quick match in an existing session.
    pub fn begin_hosting_quick_match(&mut self, ctx: &mut Context<'_>) {
        self.goto_state(Mode::Playing);
        ctx.world.server_travel(&self.config.quick_match_url);
    }

    fn on_create_presence_session_complete(&mut self, ctx: &mut Context<'_>, session: &str, succeeded: bool) {
        info!(session, succeeded, "create presence session complete");

        if succeeded
            && self.players.has_split_screen()
            && self.register_split_screen_player(ctx, SessionFlow::Hosting)
        {
            return;
        }

        let result = if succeeded {
            JoinResult::Success
        } else {
            JoinResult::UnknownError
        };
        self.finish_session_creation(ctx, result);
    }

    fn finish_session_creation(&mut self, ctx: &mut Context<'_>, result: JoinResult) {
        if result.is_success() {
            ctx.world.server_travel(&self.travel_url);
        } else {
            self.show_failure(ctx, SessionFailure::CreateFailed);
        }
    }

    // Joining

    /// Join a session from the latest search or an invite.
    pub fn join_session(&mut self, ctx: &mut Context<'_>, player: usize, target: JoinTarget) -> bool {
        let Some(user) = self.player_user(player) else {
            warn!(player, "cannot join without a signed in player");
            return false;
        };

        if !self.track(ctx, OperationKind::Join) {
            warn!("no session subsystem, cannot join");
            return false;
        }
        self.add_network_failure_handlers();

        let session = self.config.session_name.clone();
        let accepted = ctx
            .sessions()
            .is_some_and(|sessions| sessions.join_session(&user, &session, &target));

        if !accepted {
            self.untrack(ctx, OperationKind::Join);
            self.remove_network_failure_handlers();
            self.show_failure(ctx, JoinFailure::Other.into());
            return false;
        }

        self.enter_playing_unless_redirected()
    }

    /// Join the session carried by an invite.
    pub fn join_invited_session(&mut self, ctx: &mut Context<'_>, player: usize, result: SearchResult) -> bool {
        self.join_session(ctx, player, JoinTarget::Result(result))
    }

    fn on_join_session_complete(&mut self, ctx: &mut Context<'_>, result: JoinResult) {
        info!(result = ?result, "join session complete");

        if result.is_success()
            && self.players.has_split_screen()
            && self.register_split_screen_player(ctx, SessionFlow::Joining)
        {
            return;
        }

        self.finish_join_session(ctx, result);
    }

    fn finish_join_session(&mut self, ctx: &mut Context<'_>, result: JoinResult) {
        if let Some(failure) = JoinFailure::from_result(result) {
            self.remove_network_failure_handlers();
            self.show_failure(ctx, failure.into());
            return;
        }

        let session = self.config.session_name.clone();
        self.internal_travel_to_session(ctx, &session);
    }

    /// Register the second local player with the session.
    ///
    /// False when there is nothing to register or the provider refused, in
    /// which case the caller finishes its flow straight away.
    fn register_split_screen_player(&mut self, ctx: &mut Context<'_>, flow: SessionFlow) -> bool {
        let Some(user) = self.player_user(1) else {
            debug!("split-screen player has no identity, skipping registration");
            return false;
        };

        if !self.track(ctx, OperationKind::RegisterLocalPlayer) {
            return false;
        }

        let session = self.config.session_name.clone();
        let accepted = ctx
            .sessions()
            .is_some_and(|sessions| sessions.register_local_player(&user, &session));

        if !accepted {
            warn!(user = %user, "split-screen player registration rejected");
            self.untrack(ctx, OperationKind::RegisterLocalPlayer);
            return false;
        }

        self.registering = Some(flow);
        true
    }

    fn on_register_local_player_complete(&mut self, ctx: &mut Context<'_>, player: &UserId, result: JoinResult) {
        info!(player = %player, result = ?result, "register local player complete");

        match self.registering.take() {
            Some(SessionFlow::Joining) => self.finish_join_session(ctx, result),
            Some(SessionFlow::Hosting) => self.finish_session_creation(ctx, result),
            None => debug!("registration completed outside a join or host"),
        }
    }

    // Searching

    /// Start a session search. At most one search is in flight.
    pub fn find_sessions(
        &mut self,
        ctx: &mut Context<'_>,
        player: usize,
        is_dedicated_server: bool,
        find_lan: bool,
    ) -> bool {
        let Some(user) = self.player_user(player) else {
            warn!(player, "cannot search without a signed in player");
            return false;
        };

        self.untrack(ctx, OperationKind::Search);
        if !self.track(ctx, OperationKind::Search) {
            return false;
        }

        let session = self.config.session_name.clone();
        let accepted = ctx.sessions().is_some_and(|sessions| {
            sessions.find_sessions(&user, &session, find_lan, !is_dedicated_server)
        });

        if !accepted {
            warn!("session search rejected");
            self.untrack(ctx, OperationKind::Search);
        }
        accepted
    }

    fn on_search_sessions_complete(&mut self, succeeded: bool) {
        info!(succeeded, "search sessions complete");
    }

    // Travel

    /// Travel to a session joined outside the normal join flow.
    pub fn travel_to_session(&mut self, ctx: &mut Context<'_>, session: &str) {
        self.add_network_failure_handlers();
        self.goto_state(Mode::Playing);
        self.internal_travel_to_session(ctx, session);
    }

    pub(crate) fn internal_travel_to_session(&mut self, ctx: &mut Context<'_>, session: &str) {
        if !ctx.world.has_player_controller() {
            self.remove_network_failure_handlers();
            self.show_failure(ctx, TravelFailure::NoController.into());
            return;
        }

        let resolved = ctx
            .sessions()
            .map(|sessions| sessions.resolved_connect_string(session));

        let url = match resolved {
            None => {
                self.remove_network_failure_handlers();
                self.show_failure(ctx, TravelFailure::NoSubsystem.into());
                return;
            }
            Some(Err(err)) => {
                warn!(error = %err, "failed to travel to session upon joining it");
                self.show_failure(ctx, TravelFailure::NoSession.into());
                return;
            }
            Some(Ok(url)) => url,
        };

        let url = if self.config.test_encryption {
            travel::with_encryption_token(&url)
        } else {
            url
        };

        info!(url = %url, "travelling to session");
        ctx.world.client_travel(&url);
    }

    /// Network travel failed. Reported only while failure handlers are armed.
    pub fn handle_travel_failure(&mut self, ctx: &mut Context<'_>, reason: &str) {
        if !self.network_failure_handlers || !ctx.world.has_player_controller() {
            debug!(reason, "ignoring travel failure");
            return;
        }

        let text = if reason.is_empty() {
            "Join Session failed.".to_string()
        } else {
            format!("Join Session failed. {}", reason)
        };
        self.show_message_then_go_main(ctx, text);
    }

    // Teardown

    /// Wind down the game session after leaving a match.
    pub fn cleanup_session_on_return_to_menu(&mut self, ctx: &mut Context<'_>) {
        let session = self.config.session_name.clone();
        let Some(state) = ctx.sessions().map(|sessions| sessions.session_state(&session)) else {
            return;
        };

        info!(session = %session, state = state.as_str(), "cleaning up session");

        match state {
            SessionState::InProgress => {
                info!(session = %session, "ending session on return to main menu");
                if self.track(ctx, OperationKind::End) {
                    let accepted = ctx
                        .sessions()
                        .is_some_and(|sessions| sessions.end_session(&session));
                    if !accepted {
                        warn!(session = %session, "end session rejected");
                        self.untrack(ctx, OperationKind::End);
                    }
                }
            }
            SessionState::Ending => {
                info!(session = %session, "waiting for session to end");
                self.track(ctx, OperationKind::End);
            }
            SessionState::Ended | SessionState::Pending => {
                info!(session = %session, "destroying session on return to main menu");
                if self.track(ctx, OperationKind::Destroy) {
                    let accepted = ctx
                        .sessions()
                        .is_some_and(|sessions| sessions.destroy_session(&session));
                    if !accepted {
                        warn!(session = %session, "destroy session rejected");
                        self.untrack(ctx, OperationKind::Destroy);
                    }
                }
            }
            SessionState::Starting | SessionState::Creating => {
                info!(session = %session, "waiting for session to start before ending it");
                self.track(ctx, OperationKind::Start);
            }
            SessionState::NoSession => {}
        }
    }

    fn on_end_session_complete(&mut self, ctx: &mut Context<'_>, session: &str, succeeded: bool) {
        info!(session, succeeded, "session teardown step complete");

        for kind in [OperationKind::Start, OperationKind::End, OperationKind::Destroy] {
            self.untrack(ctx, kind);
        }

        self.cleanup_session_on_return_to_menu(ctx);
    }

    // Completion dispatch

    /// Deliver a provider completion registered under `handle`.
    ///
    /// One-shot handles are released before the completion is routed, so a
    /// duplicate or late delivery is dropped here.
    pub fn handle_completion(
        &mut self,
        ctx: &mut Context<'_>,
        handle: CompletionHandle,
        completion: SessionCompletion,
    ) {
        let kind = completion.kind();

        if kind.is_persistent() {
            if !self.handles.is_current(kind, handle) {
                debug!(kind = kind.as_str(), handle = %handle, "ignoring stale completion");
                return;
            }
        } else if self.handles.release_if(kind, handle) {
            if let Some(sessions) = ctx.sessions() {
                sessions.unsubscribe(handle);
            }
        } else {
            debug!(kind = kind.as_str(), handle = %handle, "ignoring stale completion");
            return;
        }

        match completion {
            SessionCompletion::JoinSession { result } => self.on_join_session_complete(ctx, result),
            SessionCompletion::CreatePresenceSession { session, succeeded } => {
                self.on_create_presence_session_complete(ctx, &session, succeeded)
            }
            SessionCompletion::FindSessions { succeeded } => self.on_search_sessions_complete(succeeded),
            SessionCompletion::StartSession { session, succeeded }
            | SessionCompletion::EndSession { session, succeeded }
            | SessionCompletion::DestroySession { session, succeeded } => {
                self.on_end_session_complete(ctx, &session, succeeded)
            }
            SessionCompletion::RegisterLocalPlayer { player, result } => {
                self.on_register_local_player_complete(ctx, &player, result)
            }
            SessionCompletion::ActivityActivation {
                player,
                activity_id,
                session,
            } => {
                info!(
                    player = %player,
                    activity_id = %activity_id,
                    has_session = session.is_some(),
                    "activity activation requested"
                );
            }
        }
    }
}
