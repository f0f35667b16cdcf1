//! Platform invites waiting to be accepted.

use super::player::UserId;
use super::provider::SearchResult;

/// Platform privilege checked before acting on an invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    CanPlayOnline,
}

/// Outcome of a privilege check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeResult {
    NoFailures,
    AgeRestricted,
    AccountTypeFailure,
    UserNotFound,
    UserNotLoggedIn,
    GenericFailure,
}

impl PrivilegeResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::NoFailures)
    }
}

/// An accepted invite.
///
/// Filled in by the platform invite event and consumed at most once by the
/// tick driver; an invite without `user_id` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingInvite {
    pub controller_id: i32,
    pub user_id: Option<UserId>,
    pub search_result: Option<SearchResult>,
    pub privileges_checked: bool,
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl PendingInvite {
    pub fn new(controller_id: i32, user_id: UserId, search_result: SearchResult) -> Self {
        Self {
            controller_id,
            user_id: Some(user_id),
            search_result: Some(search_result),
            privileges_checked: false,
            received_at: chrono::Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
    }

    /// Check if the invite can be acted on.
    pub fn is_ready(&self) -> bool {
        self.user_id.is_some() && self.privileges_checked
    }

    /// Check if the invited user owns the invited session.
    pub fn is_host(&self) -> bool {
        match (&self.user_id, &self.search_result) {
            (Some(user), Some(result)) => result.is_owned_by(user),
            _ => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "controller_id": self.controller_id,
            "user_id": self.user_id.as_ref().map(UserId::as_str),
            "session_id": self.search_result.as_ref().map(|r| r.session_id.as_str()),
            "privileges_checked": self.privileges_checked,
            "received_at": self.received_at.to_rfc3339()
        })
    }
}

impl Default for PendingInvite {
    fn default() -> Self {
        Self {
            controller_id: -1,
            user_id: None,
            search_result: None,
            privileges_checked: false,
            received_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::provider::SessionSettings;

    fn make_result(owner: &str) -> SearchResult {
        SearchResult {
            session_id: "session-1".to_string(),
            owning_user: Some(UserId::new(owner)),
            settings: SessionSettings::default(),
        }
    }

    #[test]
    fn test_default_is_empty() {
        let invite = PendingInvite::default();
        assert!(invite.is_empty());
        assert!(!invite.is_ready());
        assert!(!invite.is_host());
    }

    #[test]
    fn test_ready_after_privileges() {
        let mut invite = PendingInvite::new(0, UserId::new("alice"), make_result("bob"));
        assert!(!invite.is_ready());

        invite.privileges_checked = true;
        assert!(invite.is_ready());
        assert!(!invite.is_host());
    }

    #[test]
    fn test_host_detection() {
        let invite = PendingInvite::new(0, UserId::new("alice"), make_result("alice"));
        assert!(invite.is_host());
    }
}
