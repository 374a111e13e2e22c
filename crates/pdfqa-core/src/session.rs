//! Client-side session state.
//!
//! The backend scopes every question to the document uploaded in a session.
//! The client only remembers the identifier it was handed last.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session token returned by `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Slot holding the session of the most recent successful upload.
///
/// Empty at startup, overwritten by every successful upload, never cleared.
#[derive(Debug, Clone, Default)]
pub struct SessionSlot {
    current: Option<SessionId>,
}

impl SessionSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session id, replacing any previous one.
    pub fn set(&mut self, id: SessionId) {
        self.current = Some(id);
    }

    /// Returns the current session id, if any.
    pub fn current(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }
}
