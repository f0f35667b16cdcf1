//! Travel URL helpers and the debug connection-encryption handshake.
//!
//! Travel URLs look like `/Game/Maps/Highrise?game=TDM?listen`: a map path
//! followed by `?`-separated options.

/// Prefix stripped from a travel URL to get the map name.
pub const MAP_PATH_PREFIX: &str = "/Game/Maps/";

/// Option marking a LAN match.
pub const LAN_MATCH_OPTION: &str = "?bIsLanMatch";

/// Option appended to client travel when debug encryption is on.
pub const ENCRYPTION_TOKEN_OPTION: &str = "?EncryptionToken=1";

/// Length of the debug AES-256 key.
pub const DEBUG_KEY_LEN: usize = 32;

/// Map name from a travel URL: the text after [`MAP_PATH_PREFIX`], up to
/// the first option.
pub fn map_name(url: &str) -> &str {
    let rest = url.strip_prefix(MAP_PATH_PREFIX).unwrap_or(url);
    let end = rest.find('?').unwrap_or(rest.len());
    &rest[..end]
}

/// Value of a `?key=value` option. Keys compare case-insensitively.
pub fn parse_option<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    url.split('?').skip(1).find_map(|option| {
        let (name, value) = option.split_once('=').unwrap_or((option, ""));
        name.eq_ignore_ascii_case(key).then_some(value)
    })
}

pub fn is_lan_match(url: &str) -> bool {
    url.contains(LAN_MATCH_OPTION)
}

pub fn with_encryption_token(url: &str) -> String {
    format!("{}{}", url, ENCRYPTION_TOKEN_OPTION)
}

/// Fixed debug key: bytes 0..32. Not secure; demonstration only.
pub fn debug_encryption_key() -> Vec<u8> {
    (0..DEBUG_KEY_LEN as u8).collect()
}

/// Reply to a client's encryption token or acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionKeyResponse {
    Success { key: Vec<u8> },
    InvalidToken { reason: String },
}

impl EncryptionKeyResponse {
    /// Server side: answer a token sent with a join request.
    pub fn for_token(token: &str) -> Self {
        if token.is_empty() {
            Self::InvalidToken {
                reason: "Encryption token is empty.".to_string(),
            }
        } else {
            Self::Success {
                key: debug_encryption_key(),
            }
        }
    }

    /// Client side: the server acknowledged encryption.
    pub fn for_ack() -> Self {
        Self::Success {
            key: debug_encryption_key(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
