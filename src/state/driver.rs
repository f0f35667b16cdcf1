//! Per-frame driver.
//!
//! The host calls [`GameInstance::tick`] once per frame. Mode changes
//! requested since the last tick are committed here, then a ready invite
//! is acted on.

use tracing::{debug, info};

use super::context::Context;
use super::instance::GameInstance;
use super::invite::PendingInvite;
use super::mode::{Mode, OnlineMode};
use super::provider::SessionState;
use crate::error::InstanceError;

impl GameInstance {
    /// Advance the instance by one frame.
    ///
    /// Returns the unrecoverable error raised while committing, once.
    pub fn tick(&mut self, ctx: &mut Context<'_>) -> Result<(), InstanceError> {
        if ctx.viewport.is_dedicated_server() {
            return Ok(());
        }
        if !ctx.viewport.is_active_view() {
            return Ok(());
        }

        self.maybe_change_state(ctx);
        self.maybe_accept_invite(ctx);

        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Host or join the invited session once the old session is gone.
    fn maybe_accept_invite(&mut self, ctx: &mut Context<'_>) {
        if !self.invite.is_ready() || self.modes.current() != Mode::PendingInvite {
            return;
        }

        let session = self.config.session_name.clone();
        let Some(state) = ctx.sessions().map(|sessions| sessions.session_state(&session)) else {
            return;
        };
        if state != SessionState::NoSession {
            debug!(state = state.as_str(), "waiting for session to shut down before accepting invite");
            return;
        }

        // Consumed whatever happens next
        let invite = std::mem::take(&mut self.invite);
        let is_host = invite.is_host();
        let PendingInvite {
            controller_id,
            user_id,
            search_result,
            ..
        } = invite;

        let Some(player) = self.players.first_mut() else {
            return;
        };
        player.controller_id = controller_id;
        player.cached_user_id = user_id;
        self.set_online_mode(ctx, OnlineMode::Online);

        let Some(result) = search_result else {
            info!("invite carries no session");
            return;
        };

        info!(session_id = %result.session_id, is_host, "accepting invite");
        if is_host {
            self.host_quick_session(ctx, 0, &result.settings);
        } else {
            self.join_invited_session(ctx, 0, result);
        }
    }
}
