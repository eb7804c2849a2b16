//! Chat events relayed to every subscriber.
//!
//! An [`Event`] is created by a producer (a WebSocket read loop or the file
//! tail), published on the [`super::EventBus`], and serialized once per
//! broadcast by the [`super::Broadcaster`]. Events are never mutated after
//! construction.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Kind of chat occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A user sent a chat message.
    Message,
    /// A user joined the room.
    Join,
    /// A user left the room.
    Leave,
}

impl EventType {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Join => "join",
            Self::Leave => "leave",
        }
    }
}

/// One immutable chat occurrence.
///
/// Wire format:
/// ```json
/// {"type":"message","user":"alice","timestamp":1000,"content":"hi"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    kind: EventType,
    user: String,
    timestamp: i64,
    content: String,
}

impl Event {
    /// Creates an event with an explicit timestamp (seconds since epoch).
    #[must_use]
    pub fn new(
        kind: EventType,
        user: impl Into<String>,
        timestamp: i64,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            user: user.into(),
            timestamp,
            content: content.into(),
        }
    }

    /// A chat message from `user`, stamped with the current time.
    #[must_use]
    pub fn message(user: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(EventType::Message, user, now_secs(), content)
    }

    /// A join notification for `user`.
    #[must_use]
    pub fn join(user: impl Into<String>) -> Self {
        Self::new(EventType::Join, user, now_secs(), String::new())
    }

    /// A leave notification for `user`.
    #[must_use]
    pub fn leave(user: impl Into<String>) -> Self {
        Self::new(EventType::Leave, user, now_secs(), String::new())
    }

    /// Event kind.
    #[must_use]
    pub const fn kind(&self) -> EventType {
        self.kind
    }

    /// Name of the user the event concerns.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Message body; empty for join/leave.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Encodes the event into its JSON wire representation.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn now_secs() -> i64 {
    Utc::now().timestamp()
}
