//! Memory store implementations for arka.
//!
//! The agent loop talks to `arka_core::MemoryStore`; these are the
//! concrete backends:
//! - `FileMemoryStore` — JSONL short-term turns + plain-text long-term
//!   preferences under `~/.arka/memory/` (production)
//! - `InMemoryStore` — for tests
//! - `NoopMemoryStore` — when memory is disabled

pub mod file_store;
pub mod in_memory;
pub mod noop;

pub use file_store::FileMemoryStore;
pub use in_memory::InMemoryStore;
pub use noop::NoopMemoryStore;
