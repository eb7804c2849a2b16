//! Incremental line reader for a growing file.

use std::io::SeekFrom;
use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::TailError;

/// Longest line held back while waiting for its newline; longer runs are
/// relayed as they are.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Number of already-read bytes re-checked on each call to notice a file
/// that was rewritten in place.
const SIGNATURE_BYTES: usize = 64;

/// Reads the lines appended to a file since the previous call.
///
/// Bytes after the last newline are held back until the line is complete,
/// up to [`MAX_LINE_BYTES`]. Reading restarts from the beginning when the
/// file shrinks or when the bytes just before the current offset no longer
/// match what was read there.
#[derive(Debug)]
pub struct TailReader {
    path: PathBuf,
    offset: u64,
    partial: Vec<u8>,
    /// Last bytes read, ending at `offset`.
    signature: Vec<u8>,
}

impl TailReader {
    /// Starts reading `path` from its first byte.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            partial: Vec::new(),
            signature: Vec::new(),
        }
    }

    /// Returns every complete, non-empty line appended since the last call,
    /// without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`TailError::Io`] if the file cannot be opened or read.
    pub async fn read_new_lines(&mut self) -> Result<Vec<String>, TailError> {
        let mut file = File::open(&self.path).await?;
        let len = file.metadata().await?.len();

        if len < self.offset {
            tracing::info!(path = %self.path.display(), "tailed file truncated, rewinding");
            self.rewind();
        } else if !self.signature_matches(&mut file).await? {
            tracing::info!(path = %self.path.display(), "tailed file rewritten, rewinding");
            self.rewind();
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset)).await?;
        let mut chunk = Vec::new();
        let read = file.take(len - self.offset).read_to_end(&mut chunk).await?;
        self.offset += read as u64;
        self.remember_signature(&chunk);
        self.partial.extend_from_slice(&chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.partial.drain(..=pos).collect();
            push_line(&mut lines, &raw);
        }
        if self.partial.len() > MAX_LINE_BYTES {
            tracing::warn!(
                path = %self.path.display(),
                bytes = self.partial.len(),
                "line exceeds limit, relaying without newline"
            );
            let raw = std::mem::take(&mut self.partial);
            push_line(&mut lines, &raw);
        }
        Ok(lines)
    }

    fn rewind(&mut self) {
        self.offset = 0;
        self.partial.clear();
        self.signature.clear();
    }

    /// Compares the bytes ending at `offset` with the ones read there before.
    async fn signature_matches(&self, file: &mut File) -> Result<bool, TailError> {
        if self.signature.is_empty() {
            return Ok(true);
        }
        let start = self.offset.saturating_sub(self.signature.len() as u64);
        file.seek(SeekFrom::Start(start)).await?;
        let mut current = vec![0; self.signature.len()];
        file.read_exact(&mut current).await?;
        Ok(current == self.signature)
    }

    fn remember_signature(&mut self, chunk: &[u8]) {
        self.signature.extend_from_slice(chunk);
        let excess = self.signature.len().saturating_sub(SIGNATURE_BYTES);
        self.signature.drain(..excess);
    }
}

fn push_line(lines: &mut Vec<String>, raw: &[u8]) {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\n', '\r']);
    if !line.is_empty() {
        lines.push(line.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use super::*;

    fn append(path: &Path, text: &str) {
        let Ok(mut file) = std::fs::OpenOptions::new().append(true).open(path) else {
            panic!("open for append failed");
        };
        if file.write_all(text.as_bytes()).is_err() {
            panic!("append failed");
        }
    }

    fn temp_file(initial: &str) -> (tempfile::TempDir, PathBuf) {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let path = dir.path().join("chat.log");
        if std::fs::write(&path, initial).is_err() {
            panic!("write failed");
        }
        (dir, path)
    }

    async fn lines(reader: &mut TailReader) -> Vec<String> {
        let Ok(lines) = reader.read_new_lines().await else {
            panic!("read failed");
        };
        lines
    }

    #[tokio::test]
    async fn reads_existing_then_appended_lines() {
        let (_dir, path) = temp_file("first\nsecond\n");
        let mut reader = TailReader::new(&path);

        assert_eq!(lines(&mut reader).await, vec!["first", "second"]);
        assert!(lines(&mut reader).await.is_empty());

        append(&path, "third\n");
        assert_eq!(lines(&mut reader).await, vec!["third"]);
    }

    #[tokio::test]
    async fn partial_line_waits_for_newline() {
        let (_dir, path) = temp_file("");
        let mut reader = TailReader::new(&path);

        append(&path, "hel");
        assert!(lines(&mut reader).await.is_empty());
        append(&path, "lo\r\n\n");
        assert_eq!(lines(&mut reader).await, vec!["hello"]);
    }

    #[tokio::test]
    async fn truncation_restarts_from_beginning() {
        let (_dir, path) = temp_file("one\ntwo\n");
        let mut reader = TailReader::new(&path);
        assert_eq!(lines(&mut reader).await.len(), 2);

        if std::fs::write(&path, "x\n").is_err() {
            panic!("rewrite failed");
        }
        assert_eq!(lines(&mut reader).await, vec!["x"]);
    }

    #[tokio::test]
    async fn rewrite_with_longer_content_restarts_from_beginning() {
        let (_dir, path) = temp_file("aaaa\n");
        let mut reader = TailReader::new(&path);
        assert_eq!(lines(&mut reader).await, vec!["aaaa"]);

        if std::fs::write(&path, "bbbbbbbbbb\n").is_err() {
            panic!("rewrite failed");
        }
        assert_eq!(lines(&mut reader).await, vec!["bbbbbbbbbb"]);

        append(&path, "c\n");
        assert_eq!(lines(&mut reader).await, vec!["c"]);
    }

    #[tokio::test]
    async fn overlong_line_is_flushed_at_limit() {
        let (_dir, path) = temp_file("");
        let mut reader = TailReader::new(&path);

        append(&path, &"x".repeat(MAX_LINE_BYTES + 10));
        let flushed = lines(&mut reader).await;
        assert_eq!(flushed.len(), 1);
        assert!(flushed.first().is_some_and(|l| l.len() == MAX_LINE_BYTES + 10));
        assert!(reader.partial.is_empty());

        append(&path, "tail\n");
        assert_eq!(lines(&mut reader).await, vec!["tail"]);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let mut reader = TailReader::new(dir.path().join("absent.log"));
        assert!(matches!(
            reader.read_new_lines().await,
            Err(TailError::Io(_))
        ));
    }
}
