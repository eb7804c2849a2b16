//! WebSocket layer: upgrade handling, per-client sessions, frame mapping.
//!
//! The endpoint at `/ws?uname=<name>` is the inbound boundary of the relay:
//! frames read here become chat events, and the registry writes back
//! through each session's bounded outbound queue.

pub mod connection;
pub mod handler;
pub mod messages;
