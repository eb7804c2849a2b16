//! Type-safe connection session identifier.
//!
//! [`SessionId`] wraps a [`uuid::Uuid`] (v4). A new one is minted for every
//! accepted connection, so two sessions that used the same chat name at
//! different times are never confused with each other.

use std::fmt;

/// Unique identifier for one accepted client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Creates a new random `SessionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
