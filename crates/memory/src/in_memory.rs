//! In-memory store for tests and ephemeral sessions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use arka_core::error::MemoryError;
use arka_core::memory::{MemoryStore, MemoryTurn};

#[derive(Default)]
pub struct InMemoryStore {
    turns: Arc<RwLock<Vec<MemoryTurn>>>,
    preferences: Arc<RwLock<Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a long-term preference (for tests).
    pub async fn add_preference(&self, pref: impl Into<String>) {
        self.preferences.write().await.push(pref.into());
    }

    pub async fn turn_count(&self) -> usize {
        self.turns.read().await.len()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn short_term(&self) -> Result<Vec<MemoryTurn>, MemoryError> {
        Ok(self.turns.read().await.clone())
    }

    async fn long_term(&self) -> Result<Vec<String>, MemoryError> {
        Ok(self.preferences.read().await.clone())
    }

    async fn record(&self, new_turns: &[MemoryTurn]) -> Result<(), MemoryError> {
        self.turns.write().await.extend_from_slice(new_turns);
        Ok(())
    }
}
