//! No-op store for when memory is disabled.

use async_trait::async_trait;

use arka_core::error::MemoryError;
use arka_core::memory::{MemoryStore, MemoryTurn};

pub struct NoopMemoryStore;

#[async_trait]
impl MemoryStore for NoopMemoryStore {
    fn name(&self) -> &str {
        "noop"
    }

    async fn short_term(&self) -> Result<Vec<MemoryTurn>, MemoryError> {
        Ok(Vec::new())
    }

    async fn long_term(&self) -> Result<Vec<String>, MemoryError> {
        Ok(Vec::new())
    }

    async fn record(&self, _turns: &[MemoryTurn]) -> Result<(), MemoryError> {
        Ok(())
    }
}
