//! Game Instance State Library
//!
//! Front-end lifecycle and multiplayer session orchestration for a game
//! client.
//!
//! # Overview
//!
//! - **Mode Machine** - Tracks which top-level mode the client is in
//!   (welcome screen, main menu, message, playing, pending invite). Changes
//!   are queued and committed once per tick.
//!
//! - **Message Gate** - Decides whether a new user-facing message may replace
//!   the one already queued or shown.
//!
//! - **Pending Operations** - One completion handle per kind of provider
//!   request, so late and duplicate completions are dropped.
//!
//! - **Session Orchestration** - Hosting, joining, searching, travel and
//!   session teardown over a pluggable session provider.
//!
//! # Design Principles
//!
//! 1. **Deferred transitions** - Nothing changes mode mid-callback; the tick
//!    commits.
//!
//! 2. **Context passing** - Viewport, world, platform and session provider
//!    are traits borrowed per call, never owned or global.
//!
//! 3. **No networking** - The crate orchestrates; the provider talks to the
//!    network.
//!
//! 4. **Serialization-ready** - State snapshots convert to JSON for
//!    diagnostics.
//!
//! # Example
//!
//! ```rust
//! use game_instance_state::{GameInstance, InstanceConfig, Mode};
//!
//! let config = InstanceConfig::from_json(r#"{"initial_mode": "WelcomeScreen"}"#).unwrap();
//! let mut instance = GameInstance::new(config);
//!
//! instance.start();
//! assert_eq!(instance.current_mode(), Mode::None);
//! assert_eq!(instance.pending_mode(), Mode::WelcomeScreen);
//! ```

pub mod config;
pub mod error;
pub mod state;

// Re-export everything from state module at crate root
pub use error::{InstanceError, JoinFailure, SessionFailure, TravelFailure};
pub use state::*;
