//! Domain layer: events, the subscriber registry, and broadcast fan-out.
//!
//! This module holds the core of the relay: the immutable [`Event`] value,
//! the concurrent [`Registry`] of connected [`Subscriber`]s, the
//! [`Broadcaster`] that delivers an event to every live connection, and the
//! [`EventBus`] that serializes producers in front of it.

pub mod broadcaster;
pub mod event;
pub mod event_bus;
pub mod registry;
pub mod session_id;
pub mod subscriber;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcaster::{BroadcastReport, Broadcaster};
pub use event::{Event, EventType};
pub use event_bus::{EventBus, EventStream};
pub use registry::Registry;
pub use session_id::SessionId;
pub use subscriber::{Connection, Subscriber};
