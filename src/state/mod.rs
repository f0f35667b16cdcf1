//! Game instance state.
//!
//! - `mode` - Top-level mode machine (where is the client?)
//! - `message` - Message gate deciding which dialog wins
//! - `handles` - Outstanding completion handles, one per operation kind
//! - `player` - Local players and sign-in status
//! - `invite` - Accepted platform invites
//! - `provider` - Session provider contract
//! - `context` - Collaborators passed into every operation
//! - `travel` - Travel URL helpers and debug encryption
//! - `instance` - The game instance itself
//! - `session` - Hosting, joining, searching and teardown
//! - `events` - Platform and engine event handlers
//! - `driver` - Per-frame tick
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                           GameInstance                                │
//! │                                                                       │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                 │
//! │  │ ModeMachine  │  │ MessageGate  │  │ HandleTable  │                 │
//! │  │              │  │              │  │              │                 │
//! │  │ current      │  │ queued msg   │  │ kind →       │                 │
//! │  │ pending      │  │ next_mode    │  │   handle     │                 │
//! │  └──────────────┘  └──────────────┘  └──────────────┘                 │
//! │                                                                       │
//! │  ┌──────────────┐  ┌──────────────┐                                   │
//! │  │ LocalPlayers │  │PendingInvite │                                   │
//! │  └──────────────┘  └──────────────┘                                   │
//! └──────────────────────────────┬────────────────────────────────────────┘
//!                                │ Context (per call)
//!        ┌───────────────┬───────┴───────┬──────────────────┐
//!        ▼               ▼               ▼                  ▼
//!    Viewport          World          Platform      SessionProvider?
//! ```
//!
//! Requests never change the mode directly. They queue a transition that
//! the next [`GameInstance::tick`] commits, running the old mode's exit
//! action before the new mode's enter action.
//!
//! # Usage
//!
//! ```rust,ignore
//! use game_instance_state::{Context, GameInstance, InstanceConfig};
//!
//! let mut instance = GameInstance::new(InstanceConfig::default());
//! instance.start();
//!
//! // Every frame
//! let mut ctx = Context::new(&mut viewport, &mut world, &mut platform)
//!     .with_sessions(&mut sessions);
//! instance.tick(&mut ctx)?;
//!
//! // When the provider reports back
//! instance.handle_completion(&mut ctx, handle, completion);
//! ```

pub mod context;
pub mod driver;
pub mod events;
pub mod handles;
pub mod instance;
pub mod invite;
pub mod message;
pub mod mode;
pub mod player;
pub mod provider;
pub mod session;
pub mod travel;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use crate::config::InstanceConfig;
pub use context::{Context, Platform, PresenceStatus, Viewport, World};
pub use events::{ConnectionStatus, ConsoleCommand};
pub use handles::{CompletionHandle, HandleTable, OperationKind};
pub use instance::GameInstance;
pub use invite::{PendingInvite, Privilege, PrivilegeResult};
pub use message::{GateDecision, MessageGate, PendingMessage, Rejection};
pub use mode::{Mode, ModeMachine, OnlineMode, Transition};
pub use player::{LocalPlayer, LocalPlayers, LoginStatus, UserId};
pub use provider::{
    ConnectError, JoinResult, JoinTarget, SearchResult, SessionCompletion, SessionProvider,
    SessionSettings, SessionState,
};
pub use session::SessionFlow;
pub use travel::EncryptionKeyResponse;
