//! Concurrent, insertion-ordered store of connected subscribers.
//!
//! [`Registry`] keeps every active [`Subscriber`] in a `Vec` behind a
//! [`tokio::sync::RwLock`]. Broadcasts never iterate the live collection;
//! they take a [`Registry::snapshot`] so joins and leaves that race with a
//! broadcast cannot skip, duplicate, or touch removed entries.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{Connection, SessionId, Subscriber};
use crate::error::ChatError;

/// Authoritative set of currently connected subscribers.
///
/// # Concurrency
///
/// - `join`/`leave` take the write lock for a single scan.
/// - `snapshot` takes the read lock and clones the entries out, so the
///   caller iterates without holding any lock.
#[derive(Debug, Default)]
pub struct Registry {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `connection` under `name` with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::DuplicateName`] if an active subscriber already
    /// uses `name`. Existing subscribers are left untouched.
    pub async fn join(
        &self,
        name: &str,
        connection: Arc<dyn Connection>,
    ) -> Result<Subscriber, ChatError> {
        let mut subs = self.subscribers.write().await;
        if subs.iter().any(|s| s.name() == name) {
            return Err(ChatError::DuplicateName(name.to_string()));
        }
        let subscriber = Subscriber::new(name, connection);
        subs.push(subscriber.clone());
        tracing::debug!(user = name, session = %subscriber.session_id(), total = subs.len(), "subscriber joined");
        Ok(subscriber)
    }

    /// Removes the subscriber named `name`, whatever its session.
    ///
    /// Returns the removed entry, or `None` if nobody had that name.
    pub async fn leave(&self, name: &str) -> Option<Subscriber> {
        let mut subs = self.subscribers.write().await;
        let pos = subs.iter().position(|s| s.name() == name)?;
        let removed = subs.remove(pos);
        tracing::debug!(user = name, total = subs.len(), "subscriber left");
        Some(removed)
    }

    /// Removes `name` only if it still belongs to `session_id`.
    ///
    /// A stale session (already evicted, with the name since reused) must
    /// not remove the newer subscriber. Returns `true` if an entry was
    /// removed.
    pub async fn leave_session(&self, name: &str, session_id: SessionId) -> bool {
        let mut subs = self.subscribers.write().await;
        let Some(pos) = subs
            .iter()
            .position(|s| s.name() == name && s.session_id() == session_id)
        else {
            return false;
        };
        subs.remove(pos);
        tracing::debug!(user = name, session = %session_id, total = subs.len(), "subscriber session removed");
        true
    }

    /// Point-in-time copy of all subscribers in join order.
    pub async fn snapshot(&self) -> Vec<Subscriber> {
        self.subscribers.read().await.clone()
    }

    /// Names of all subscribers in join order.
    pub async fn names(&self) -> Vec<String> {
        self.subscribers
            .read()
            .await
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Returns `true` if a subscriber named `name` is registered.
    pub async fn contains(&self, name: &str) -> bool {
        self.subscribers.read().await.iter().any(|s| s.name() == name)
    }

    /// Number of registered subscribers.
    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Returns `true` if nobody is connected.
    pub async fn is_empty(&self) -> bool {
        self.subscribers.read().await.is_empty()
    }
}
