//! Translation between WebSocket frames and chat events.

use axum::extract::ws::Message;

use crate::domain::Event;
use crate::error::ChatError;

/// What the read loop should do with one client frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Publish this event to the room.
    Publish(Event),
    /// Nothing to relay (control frame or undecodable payload).
    Ignore,
    /// The client asked to close the connection.
    Close,
}

impl InboundFrame {
    /// Classifies a frame received from the session named `user`.
    ///
    /// Text frames become `message` events. Binary frames are accepted when
    /// they hold valid UTF-8 and ignored otherwise.
    #[must_use]
    pub fn classify(user: &str, frame: Message) -> Self {
        match frame {
            Message::Text(text) => Self::Publish(Event::message(user, text.as_str())),
            Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => Self::Publish(Event::message(user, text)),
                Err(_) => {
                    tracing::warn!(user, len = bytes.len(), "dropping non-UTF-8 binary frame");
                    Self::Ignore
                }
            },
            Message::Ping(_) | Message::Pong(_) => Self::Ignore,
            Message::Close(_) => Self::Close,
        }
    }
}

/// Renders `error` as the JSON text of an error frame.
#[must_use]
pub fn error_frame(error: &ChatError) -> Option<String> {
    serde_json::to_string(&error.to_response_body()).ok()
}
