//! Relay configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Unset or unparsable values fall back to defaults, except
//! `LISTEN_ADDR`, which must parse if present.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Settings for the optional file tail producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailConfig {
    /// File whose appended lines are relayed.
    pub path: PathBuf,
    /// Name the lines are attributed to.
    pub user: String,
    /// How often to check for the file and re-read it if no watch event
    /// arrives.
    pub poll_interval: Duration,
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`ChatConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Capacity of the event bus queue.
    pub event_bus_capacity: usize,

    /// Pending frames allowed per connection before it counts as stuck.
    pub outbound_queue_capacity: usize,

    /// Upper bound on a single socket write.
    pub send_timeout: Duration,

    /// File tail settings; `None` disables the producer.
    pub tail: Option<TailConfig>,

    /// Log output format.
    pub log_format: LogFormat,
}

impl ChatConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()?;

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024);
        let outbound_queue_capacity = parse_env("OUTBOUND_QUEUE_CAPACITY", 64);
        let send_timeout = Duration::from_millis(parse_env("SEND_TIMEOUT_MS", 5_000));

        let tail = std::env::var("TAIL_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(|path| TailConfig {
                path: PathBuf::from(path),
                user: std::env::var("TAIL_USER").unwrap_or_else(|_| "tail".to_string()),
                poll_interval: Duration::from_millis(parse_env("TAIL_POLL_INTERVAL_MS", 1_000)),
            });

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            event_bus_capacity,
            outbound_queue_capacity,
            send_timeout,
            tail,
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
