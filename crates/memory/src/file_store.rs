//! File-based memory store.
//!
//! Short-term memory is a JSONL file (one `MemoryTurn` per line), capped
//! to the most recent turns on load. Long-term memory is a plain text
//! file of user preferences, one per line, edited by the user rather
//! than the agent. Both are human-inspectable and need no database.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use arka_core::error::MemoryError;
use arka_core::memory::{MemoryStore, MemoryTurn};

/// How many recent turns the short-term file keeps.
const SHORT_TERM_CAP: usize = 50;

/// A file-backed memory store rooted at one directory.
///
/// Turns are loaded into memory on creation and the short-term file is
/// rewritten on every `record`, so reads are fast and writes durable.
pub struct FileMemoryStore {
    short_path: PathBuf,
    long_path: PathBuf,
    turns: Arc<RwLock<Vec<MemoryTurn>>>,
}

impl FileMemoryStore {
    /// Open (or initialize) the store under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let short_path = dir.join("short_term.jsonl");
        let long_path = dir.join("long_term.txt");
        let turns = Self::load_turns(&short_path);
        debug!(dir = %dir.display(), turns = turns.len(), "File memory store loaded");
        Self {
            short_path,
            long_path,
            turns: Arc::new(RwLock::new(turns)),
        }
    }

    /// Load short-term turns from JSONL, skipping corrupt lines.
    fn load_turns(path: &PathBuf) -> Vec<MemoryTurn> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(), // no file yet
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<MemoryTurn>(line) {
                Ok(turn) => Some(turn),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupt memory entry");
                    None
                }
            })
            .collect()
    }

    /// Rewrite the short-term file from the in-memory view.
    async fn flush(&self) -> Result<(), MemoryError> {
        let turns = self.turns.read().await;
        let mut out = String::new();
        for turn in turns.iter() {
            let line =
                serde_json::to_string(turn).map_err(|e| MemoryError::Corrupt(e.to_string()))?;
            out.push_str(&line);
            out.push('\n');
        }
        if let Some(parent) = self.short_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MemoryError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.short_path, out)
            .await
            .map_err(|e| MemoryError::Storage(e.to_string()))
    }
}

#[async_trait]
impl MemoryStore for FileMemoryStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn short_term(&self) -> Result<Vec<MemoryTurn>, MemoryError> {
        Ok(self.turns.read().await.clone())
    }

    async fn long_term(&self) -> Result<Vec<String>, MemoryError> {
        let content = match tokio::fs::read_to_string(&self.long_path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MemoryError::Storage(e.to_string())),
        };
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    async fn record(&self, new_turns: &[MemoryTurn]) -> Result<(), MemoryError> {
        {
            let mut turns = self.turns.write().await;
            turns.extend_from_slice(new_turns);
            let len = turns.len();
            if len > SHORT_TERM_CAP {
                turns.drain(..len - SHORT_TERM_CAP);
            }
        }
        self.flush().await
    }
}
