//! Registered chat clients and the write-side connection seam.

use std::fmt;
use std::sync::Arc;

use super::SessionId;
use crate::error::DeliveryError;

/// One-way, non-blocking write capability for a connected client.
///
/// Implementations must not block: a client that cannot accept the payload
/// right now reports [`DeliveryError::Full`], and one whose transport is gone
/// reports [`DeliveryError::Closed`]. Either outcome evicts the subscriber.
pub trait Connection: Send + Sync + fmt::Debug {
    /// Queues `payload` for delivery to the client.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the payload cannot be accepted.
    fn send(&self, payload: &str) -> Result<(), DeliveryError>;
}

/// A registered, currently connected chat client.
///
/// The registry keeps a shared handle to the connection and only ever writes
/// through it; the transport task owns the underlying socket.
#[derive(Debug, Clone)]
pub struct Subscriber {
    name: String,
    session_id: SessionId,
    connection: Arc<dyn Connection>,
}

impl Subscriber {
    /// Creates a subscriber for a freshly accepted session.
    #[must_use]
    pub fn new(name: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            name: name.into(),
            session_id: SessionId::new(),
            connection,
        }
    }

    /// Chat name, unique among active subscribers.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session this subscriber belongs to.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Writes a serialized event to this subscriber's connection.
    ///
    /// # Errors
    ///
    /// Propagates the connection's [`DeliveryError`].
    pub fn send(&self, payload: &str) -> Result<(), DeliveryError> {
        self.connection.send(payload)
    }
}
