//! Approval gate — the human-in-the-loop checkpoint.
//!
//! Invoked by the agent loop only when a tool's policy demands it. The
//! gate presents exactly two choices and blocks the loop until one is
//! picked; there is no retry or timeout logic. This is the only suspension
//! point tied to a human rather than the network.

use async_trait::async_trait;

/// A described action awaiting a human decision.
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    /// The tool that wants to run.
    pub tool_name: String,

    /// The concrete arguments it was called with.
    pub args: serde_json::Value,
}

/// The two possible outcomes of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Deny,
}

impl ApprovalDecision {
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approve)
    }
}

/// Synchronous human checkpoint. Implementations suspend indefinitely
/// awaiting a decision.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    async fn review(&self, request: &ApprovalRequest) -> ApprovalDecision;
}

/// A gate that approves everything. Useful for non-interactive runs and
/// tests.
pub struct AutoApproveGate;

#[async_trait]
impl ApprovalGate for AutoApproveGate {
    async fn review(&self, _request: &ApprovalRequest) -> ApprovalDecision {
        ApprovalDecision::Approve
    }
}
