//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{EventBus, Registry};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of connected subscribers.
    pub registry: Arc<Registry>,
    /// Producer handle for chat events.
    pub event_bus: EventBus,
    /// Per-connection outbound queue capacity.
    pub outbound_queue_capacity: usize,
    /// Upper bound on a single socket write.
    pub send_timeout: Duration,
}
