//! Pending operation tracking.
//!
//! Holds at most one outstanding completion handle per operation kind so a
//! late or duplicated completion can be recognised and dropped.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of asynchronous provider operations the instance waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Join,
    Create,
    Search,
    Start,
    End,
    Destroy,
    RegisterLocalPlayer,
    ActivityRequest,
}

impl OperationKind {
    pub const ALL: [OperationKind; 8] = [
        Self::Join,
        Self::Create,
        Self::Search,
        Self::Start,
        Self::End,
        Self::Destroy,
        Self::RegisterLocalPlayer,
        Self::ActivityRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Create => "create",
            Self::Search => "search",
            Self::Start => "start",
            Self::End => "end",
            Self::Destroy => "destroy",
            Self::RegisterLocalPlayer => "register_local_player",
            Self::ActivityRequest => "activity_request",
        }
    }

    /// Persistent registrations fire many times and stay registered.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::ActivityRequest)
    }
}

/// Opaque token for one callback registration with the session provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionHandle(pub u64);

impl fmt::Display for CompletionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One optional handle per operation kind.
///
/// The table owns each handle from registration until it is released,
/// either because its completion fired or because a newer request
/// superseded it. Released handles are returned to the caller, who must
/// unsubscribe them from the provider.
#[derive(Debug, Default)]
pub struct HandleTable {
    handles: HashMap<OperationKind, CompletionHandle>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, returning the one it displaced (if any).
    #[must_use]
    pub fn register(
        &mut self,
        kind: OperationKind,
        handle: CompletionHandle,
    ) -> Option<CompletionHandle> {
        self.handles.insert(kind, handle)
    }

    /// Release whatever handle is registered for `kind`.
    #[must_use]
    pub fn release(&mut self, kind: OperationKind) -> Option<CompletionHandle> {
        self.handles.remove(&kind)
    }

    /// Release the registration for `kind` only if it is `handle`.
    ///
    /// Returns false for stale or duplicate completions, which leaves the
    /// table untouched.
    pub fn release_if(&mut self, kind: OperationKind, handle: CompletionHandle) -> bool {
        if self.handles.get(&kind) == Some(&handle) {
            self.handles.remove(&kind);
            true
        } else {
            false
        }
    }

    /// Check whether `handle` is the live registration for `kind`.
    pub fn is_current(&self, kind: OperationKind, handle: CompletionHandle) -> bool {
        self.handles.get(&kind) == Some(&handle)
    }

    pub fn get(&self, kind: OperationKind) -> Option<CompletionHandle> {
        self.handles.get(&kind).copied()
    }

    pub fn is_registered(&self, kind: OperationKind) -> bool {
        self.handles.contains_key(&kind)
    }

    /// Count outstanding registrations.
    pub fn count(&self) -> usize {
        self.handles.len()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        for kind in OperationKind::ALL {
            if let Some(handle) = self.handles.get(&kind) {
                obj.insert(kind.as_str().to_string(), serde_json::json!(handle.0));
            }
        }
        serde_json::Value::Object(obj)
    }
}
