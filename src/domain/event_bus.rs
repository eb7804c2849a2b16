//! Publish queue between event producers and the broadcaster.
//!
//! [`EventBus`] wraps the sending half of a bounded [`tokio::sync::mpsc`]
//! channel. WebSocket read loops and the file tail publish into it; a single
//! [`EventStream`] consumer hands each event to the [`Broadcaster`] in
//! arrival order, so every subscriber sees events in the same order.

use tokio::sync::mpsc;

use super::{Broadcaster, Event};

/// Cloneable producer handle for chat [`Event`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: mpsc::Sender<Event>,
}

/// Consumer half of the bus, drained by [`EventStream::run`].
#[derive(Debug)]
pub struct EventStream {
    receiver: mpsc::Receiver<Event>,
}

impl EventBus {
    /// Creates a bus with room for `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, EventStream) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, EventStream { receiver })
    }

    /// Queues `event` for broadcast, waiting while the queue is full.
    ///
    /// Returns `false` if the consumer has shut down and the event was
    /// dropped.
    pub async fn publish(&self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(()) => true,
            Err(mpsc::error::SendError(event)) => {
                tracing::warn!(user = event.user(), "event bus closed, dropping event");
                false
            }
        }
    }

    /// Returns `true` once the consumer has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl EventStream {
    /// Receives the next event, or `None` once every [`EventBus`] is gone.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Broadcasts every published event until all producers are dropped.
    ///
    /// A failed broadcast (unencodable event) is logged by the broadcaster
    /// and does not stop the loop.
    pub async fn run(mut self, broadcaster: Broadcaster) {
        while let Some(event) = self.recv().await {
            if let Err(e) = broadcaster.broadcast(&event).await {
                tracing::error!(error = %e, "broadcast aborted");
            }
        }
        tracing::debug!("event bus drained, dispatcher stopping");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_pending, assert_ready, task};

    use super::*;
    use crate::domain::testing::FakeConnection;
    use crate::domain::{Connection, EventType, Registry};

    #[tokio::test]
    async fn published_events_arrive_in_order() {
        let (bus, mut stream) = EventBus::new(8);
        assert!(bus.publish(Event::message("a", "1")).await);
        assert!(bus.publish(Event::message("b", "2")).await);

        let Some(first) = stream.recv().await else {
            panic!("expected first event");
        };
        let Some(second) = stream.recv().await else {
            panic!("expected second event");
        };
        assert_eq!(first.content(), "1");
        assert_eq!(second.content(), "2");
    }

    #[tokio::test]
    async fn publish_waits_while_queue_is_full() {
        let (bus, mut stream) = EventBus::new(1);
        assert!(bus.publish(Event::message("a", "1")).await);

        let mut pending = task::spawn(bus.publish(Event::message("a", "2")));
        assert_pending!(pending.poll());

        assert!(stream.recv().await.is_some());
        assert!(pending.is_woken());
        assert!(assert_ready!(pending.poll()));
    }

    #[tokio::test]
    async fn publish_after_consumer_dropped_returns_false() {
        let (bus, stream) = EventBus::new(8);
        drop(stream);
        assert!(bus.is_closed());
        assert!(!bus.publish(Event::join("a")).await);
    }

    #[tokio::test]
    async fn run_broadcasts_until_producers_drop() {
        let registry = Arc::new(Registry::new());
        let fake = Arc::new(FakeConnection::new());
        let handle: Arc<dyn Connection> = Arc::clone(&fake) as Arc<dyn Connection>;
        if registry.join("alice", handle).await.is_err() {
            panic!("join failed");
        }

        let (bus, stream) = EventBus::new(8);
        let dispatcher = tokio::spawn(stream.run(Broadcaster::new(Arc::clone(&registry))));

        assert!(bus.publish(Event::new(EventType::Join, "alice", 1, "")).await);
        assert!(bus.publish(Event::new(EventType::Message, "alice", 2, "hi")).await);
        drop(bus);

        if dispatcher.await.is_err() {
            panic!("dispatcher panicked");
        }
        let received = fake.received();
        assert_eq!(received.len(), 2);
        assert!(received.first().is_some_and(|p| p.contains(r#""type":"join""#)));
        assert!(received.get(1).is_some_and(|p| p.contains(r#""content":"hi""#)));
    }
}
