//! Instance configuration loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{InstanceError, Result};
use crate::state::mode::Mode;
use crate::state::player::MAX_LOCAL_PLAYERS;

/// Name of the session every orchestrated operation works on.
pub const DEFAULT_SESSION_NAME: &str = "GameSession";

/// Map loaded for both the welcome screen and the main menu.
pub const DEFAULT_FRONT_END_MAP: &str = "/Game/Maps/ShooterEntry";

/// Listen-server URL for quick matches.
pub const DEFAULT_QUICK_MATCH_URL: &str = "/Game/Maps/Highrise?game=TDM?listen";

/// Players per hosted session.
pub const DEFAULT_NUM_PLAYERS: u32 = 8;

/// Public connections advertised by a quick-match session.
pub const QUICK_MATCH_PUBLIC_CONNECTIONS: u32 = 16;

/// Instance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub welcome_screen_map: String,
    pub main_menu_map: String,
    pub quick_match_url: String,
    pub session_name: String,
    /// Mode the instance starts in and returns to on sign-out.
    pub initial_mode: Mode,
    /// Append a debug encryption token to client travel URLs. Not secure.
    pub test_encryption: bool,
    pub max_local_players: usize,
    pub default_num_players: u32,
    pub quick_match_public_connections: u32,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            welcome_screen_map: DEFAULT_FRONT_END_MAP.to_string(),
            main_menu_map: DEFAULT_FRONT_END_MAP.to_string(),
            quick_match_url: DEFAULT_QUICK_MATCH_URL.to_string(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            initial_mode: Mode::MainMenu,
            test_encryption: false,
            max_local_players: MAX_LOCAL_PLAYERS,
            default_num_players: DEFAULT_NUM_PLAYERS,
            quick_match_public_connections: QUICK_MATCH_PUBLIC_CONNECTIONS,
        }
    }
}

impl InstanceConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.initial_mode {
            Mode::WelcomeScreen | Mode::MainMenu => Ok(()),
            other => Err(InstanceError::InvalidInitialMode(other)),
        }
    }
}
