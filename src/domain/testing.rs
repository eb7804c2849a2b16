//! In-memory [`Connection`] used by unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::Connection;
use crate::error::DeliveryError;

/// Records every payload and fails on demand.
#[derive(Debug, Default)]
pub(crate) struct FakeConnection {
    received: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl FakeConnection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `send` fail with [`DeliveryError::Closed`].
    pub(crate) fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn received(&self) -> Vec<String> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Connection for FakeConnection {
    fn send(&self, payload: &str) -> Result<(), DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Closed);
        }
        if let Ok(mut guard) = self.received.lock() {
            guard.push(payload.to_string());
        }
        Ok(())
    }
}
