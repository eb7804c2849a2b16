//! Fan-out of one [`Event`] to every registered subscriber.
//!
//! The broadcaster serializes the event once, iterates a registry snapshot,
//! and evicts subscribers whose connection rejected the write. Evictions are
//! applied after the pass, against the live registry, and only for the exact
//! session that failed.

use std::sync::Arc;

use super::{Event, Registry};
use crate::error::ChatError;

/// Outcome of a single broadcast pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers that accepted the payload.
    pub delivered: usize,
    /// Names of subscribers evicted because their write failed.
    pub evicted: Vec<String>,
}

/// Delivers events to all live subscribers of a [`Registry`].
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    /// Creates a broadcaster over `registry`.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Sends `event` to every subscriber present at snapshot time.
    ///
    /// Delivery is best-effort and at-most-once: a failed write is not
    /// retried, and subscribers joining after the snapshot may miss this
    /// event.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Serialization`] if the event cannot be encoded.
    /// Nothing is delivered in that case.
    pub async fn broadcast(&self, event: &Event) -> Result<BroadcastReport, ChatError> {
        let payload = event.to_json().map_err(|e| {
            tracing::error!(error = %e, user = event.user(), "failed to serialize event");
            ChatError::from(e)
        })?;

        let snapshot = self.registry.snapshot().await;
        let mut report = BroadcastReport::default();
        let mut failed = Vec::new();

        for subscriber in &snapshot {
            match subscriber.send(&payload) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(user = subscriber.name(), error = %e, "delivery failed, evicting");
                    failed.push(subscriber);
                }
            }
        }

        for subscriber in failed {
            if self
                .registry
                .leave_session(subscriber.name(), subscriber.session_id())
                .await
            {
                report.evicted.push(subscriber.name().to_string());
            }
        }

        tracing::trace!(
            event_type = event.kind().as_str(),
            delivered = report.delivered,
            evicted = report.evicted.len(),
            "broadcast complete"
        );
        Ok(report)
    }
}
