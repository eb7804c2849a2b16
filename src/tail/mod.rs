//! File tail producer.
//!
//! Relays every line appended to a file as a `message` event, attributed
//! to a configured user. It waits for the file to appear, then re-reads it
//! whenever the filesystem watcher reports a change and on a fallback poll
//! tick. It only ever publishes on the [`EventBus`]; delivery is the
//! broadcaster's job.

pub mod reader;

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use reader::TailReader;

use crate::config::TailConfig;
use crate::domain::{Event, EventBus};
use crate::error::TailError;

/// Background producer that turns appended file lines into chat events.
#[derive(Debug)]
pub struct FileTail {
    config: TailConfig,
    bus: EventBus,
}

impl FileTail {
    /// Creates a producer publishing into `bus`.
    #[must_use]
    pub fn new(config: TailConfig, bus: EventBus) -> Self {
        Self { config, bus }
    }

    /// Runs the producer on its own task, logging a fatal error if any.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let path = self.config.path.clone();
            if let Err(e) = self.run().await {
                tracing::error!(path = %path.display(), error = %e, "file tail stopped");
            }
        })
    }

    /// Tails the file until the event bus closes.
    ///
    /// # Errors
    ///
    /// Returns [`TailError::Io`] if the file exists but its path cannot be
    /// resolved.
    pub async fn run(self) -> Result<(), TailError> {
        let Some(path) = self.wait_for_file().await? else {
            return Ok(());
        };
        tracing::info!(path = %path.display(), user = %self.config.user, "tailing file");

        let (changed_tx, mut changed_rx) = mpsc::channel::<()>(1);
        let _watcher = match watch(&path, changed_tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "file watcher unavailable, polling only");
                None
            }
        };

        let mut reader = TailReader::new(&path);
        let mut tick = tokio::time::interval(self.config.poll_interval);
        while !self.bus.is_closed() {
            tokio::select! {
                Some(()) = changed_rx.recv() => {}
                _ = tick.tick() => {}
            }

            let lines = match reader.read_new_lines().await {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "tail read failed");
                    continue;
                }
            };
            for line in lines {
                if !self.bus.publish(Event::message(self.config.user.as_str(), line)).await {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Polls until the configured file exists, then returns its canonical
    /// path. Returns `None` if the event bus closes first.
    async fn wait_for_file(&self) -> Result<Option<PathBuf>, TailError> {
        while !self.bus.is_closed() {
            if tokio::fs::try_exists(&self.config.path).await.unwrap_or(false) {
                return Ok(Some(tokio::fs::canonicalize(&self.config.path).await?));
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
        Ok(None)
    }
}

/// Watches the directory holding `path` so a recreated file is still seen,
/// and signals `changed` for modifications or creations of that file.
fn watch(path: &Path, changed: mpsc::Sender<()>) -> Result<RecommendedWatcher, TailError> {
    let file_name = path.file_name().map(ToOwned::to_owned);
    let mut watcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                let ours = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == file_name.as_deref());
                if ours && (event.kind.is_modify() || event.kind.is_create()) {
                    // A pending signal already covers this change.
                    let _ = changed.try_send(());
                }
            }
            Err(e) => tracing::error!(error = %e, "file watch error"),
        })?;

    let dir = path.parent().unwrap_or(path);
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
