//! Per-client WebSocket session.
//!
//! Each accepted socket is split into two tasks:
//!
//! - a **writer** that drains a bounded outbound queue into the socket,
//!   bounding every write by the configured send timeout;
//! - the **reader** (this task) that registers the client, turns incoming
//!   frames into events on the [`EventBus`](crate::domain::EventBus), and
//!   unregisters the client when the socket goes away.
//!
//! The registry only ever sees the [`WsConnection`] handle, whose `send`
//! never waits: a full queue or a dead writer is reported immediately and
//! the broadcaster evicts the client.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::{Notify, mpsc};

use super::messages::{InboundFrame, error_frame};
use crate::app_state::AppState;
use crate::domain::{Connection, Event};
use crate::error::DeliveryError;

/// Non-blocking write handle for one WebSocket client.
#[derive(Debug)]
pub struct WsConnection {
    outbound: mpsc::Sender<Message>,
    overflow: Arc<Notify>,
}

impl WsConnection {
    /// Wraps the sending half of a client's outbound queue.
    #[must_use]
    pub fn new(outbound: mpsc::Sender<Message>) -> Self {
        Self {
            outbound,
            overflow: Arc::new(Notify::new()),
        }
    }

    /// Signalled when the outbound queue overflows.
    #[must_use]
    pub fn overflow(&self) -> Arc<Notify> {
        Arc::clone(&self.overflow)
    }

    /// Queues a raw frame without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Full`] if the queue is at capacity and
    /// [`DeliveryError::Closed`] if the writer has stopped.
    pub fn send_message(&self, message: Message) -> Result<(), DeliveryError> {
        self.outbound.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                self.overflow.notify_one();
                DeliveryError::Full
            }
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

impl Connection for WsConnection {
    fn send(&self, payload: &str) -> Result<(), DeliveryError> {
        self.send_message(Message::text(payload))
    }
}

/// Drains `outbound` into the socket until the queue closes or a write
/// fails or exceeds `send_timeout`.
async fn write_loop<S>(mut sink: S, mut outbound: mpsc::Receiver<Message>, send_timeout: Duration)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(message) = outbound.recv().await {
        match tokio::time::timeout(send_timeout, sink.send(message)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "ws write failed");
                return;
            }
            Err(_) => {
                tracing::warn!(timeout = ?send_timeout, "ws write timed out");
                return;
            }
        }
    }
    let _ = tokio::time::timeout(send_timeout, sink.close()).await;
}

/// Runs the session for the client named `name` until it disconnects.
///
/// - Joins the registry; a duplicate name gets an error frame and a close.
/// - Publishes `join`, then one `message` event per text frame.
/// - On close, read error, writer failure, or overflow: leaves the registry
///   and publishes `leave`.
pub async fn run_connection(socket: WebSocket, name: String, state: AppState) {
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::channel(state.outbound_queue_capacity.max(1));
    let mut writer = tokio::spawn(write_loop(sink, rx, state.send_timeout));

    let connection = Arc::new(WsConnection::new(tx));
    let overflow = connection.overflow();

    let handle: Arc<dyn Connection> = Arc::clone(&connection) as Arc<dyn Connection>;
    let session_id = match state.registry.join(&name, handle).await {
        Ok(subscriber) => subscriber.session_id(),
        Err(e) => {
            tracing::info!(user = %name, error = %e, "join rejected");
            if let Some(text) = error_frame(&e) {
                if let Err(err) = connection.send_message(Message::text(text)) {
                    tracing::debug!(user = %name, error = %err, "error frame not queued");
                }
            }
            if let Err(err) = connection.send_message(Message::Close(None)) {
                tracing::debug!(user = %name, error = %err, "close frame not queued");
            }
            drop(connection);
            let _ = writer.await;
            return;
        }
    };
    tracing::info!(user = %name, session = %session_id, "client joined");

    state.event_bus.publish(Event::join(name.as_str())).await;

    loop {
        tokio::select! {
            frame = stream.next() => {
                let frame = match frame {
                    Some(Ok(frame)) => frame,
                    Some(Err(e)) => {
                        tracing::debug!(user = %name, error = %e, "ws read failed");
                        break;
                    }
                    None => break,
                };
                match InboundFrame::classify(&name, frame) {
                    InboundFrame::Publish(event) => {
                        if !state.event_bus.publish(event).await {
                            break;
                        }
                    }
                    InboundFrame::Ignore => {}
                    InboundFrame::Close => break,
                }
            }
            _ = &mut writer => {
                tracing::debug!(user = %name, "ws writer stopped");
                break;
            }
            () = overflow.notified() => {
                tracing::warn!(user = %name, "client not keeping up, disconnecting");
                break;
            }
        }
    }

    state.registry.leave_session(&name, session_id).await;
    drop(connection);
    writer.abort();
    state.event_bus.publish(Event::leave(name.as_str())).await;
    tracing::info!(user = %name, session = %session_id, "client left");
}
