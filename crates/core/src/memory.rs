//! Memory collaborator boundary.
//!
//! The agent loop reads short-term and long-term memory back as opaque
//! sequences to seed the system prompt, and hands each completed exchange
//! off for persistence. Ranking and retention policy live behind this
//! trait, not in the loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MemoryError;
use crate::message::Role;

/// One remembered turn of a past exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryTurn {
    pub role: Role,
    pub content: String,
}

impl MemoryTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The memory store trait.
///
/// Implementations: file-backed (production), in-memory (tests), no-op.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// The backend name (e.g., "file", "in-memory", "noop").
    fn name(&self) -> &str;

    /// Recent conversation turns, oldest first.
    async fn short_term(&self) -> std::result::Result<Vec<MemoryTurn>, MemoryError>;

    /// Durable user preferences, one per line.
    async fn long_term(&self) -> std::result::Result<Vec<String>, MemoryError>;

    /// Persist a completed exchange (user query + assistant answer).
    async fn record(&self, turns: &[MemoryTurn]) -> std::result::Result<(), MemoryError>;
}
