//! # arka Core
//!
//! Domain types, traits, and error definitions for the arka CLI agent.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem boundary is defined as a trait here. Implementations live
//! in their respective crates. This enables:
//! - Swapping providers via configuration (never branching on provider
//!   identity inside the agent loop)
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod approval;
pub mod error;
pub mod memory;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use approval::{ApprovalDecision, ApprovalGate, ApprovalRequest};
pub use error::{Error, MemoryError, ProviderError, Result, ToolError};
pub use memory::{MemoryStore, MemoryTurn};
pub use message::{ChatMessage, Role};
pub use provider::{ChatProvider, ChatResponse, InvokeOptions, ProviderKind, StreamDelta, ToolChoice};
pub use tool::{ApprovalPolicy, Tool, ToolCall, ToolContext, ToolRegistry};
