//! # webim-gateway
//!
//! WebSocket chat relay built around a concurrent subscriber registry and
//! a broadcast fan-out that tolerates disconnects.
//!
//! Clients connect to `/ws?uname=<name>`; every text frame they send is
//! relayed to all connected clients as a JSON event:
//!
//! ```json
//! {"type":"message","user":"alice","timestamp":1700000000,"content":"hi"}
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)        File tail (optional)
//!     │                           │
//!     ├── WS sessions (ws/)       │
//!     │                           │
//!     └──────── EventBus (domain/) ┘
//!                   │
//!              Broadcaster (domain/)
//!                   │
//!              Registry (domain/) ──► per-client outbound queues
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod tail;
pub mod ws;
