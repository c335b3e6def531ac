//! Terminal approval gate.
//!
//! Destructive tool calls stop here until the user answers y/n on stdin.

use async_trait::async_trait;

use arka_core::approval::{ApprovalDecision, ApprovalGate, ApprovalRequest};

pub struct StdinApprovalGate;

#[async_trait]
impl ApprovalGate for StdinApprovalGate {
    async fn review(&self, request: &ApprovalRequest) -> ApprovalDecision {
        let prompt = format!(
            "\n  arka wants to run '{}' with:\n    {}\n  Allow? [y/N] ",
            request.tool_name,
            serde_json::to_string_pretty(&request.args)
                .unwrap_or_else(|_| request.args.to_string())
                .replace('\n', "\n    "),
        );

        // Blocking stdin read, off the async runtime.
        let answer = tokio::task::spawn_blocking(move || {
            use std::io::Write;
            eprint!("{prompt}");
            let _ = std::io::stderr().flush();
            let mut line = String::new();
            match std::io::stdin().read_line(&mut line) {
                Ok(_) => line,
                Err(_) => String::new(),
            }
        })
        .await
        .unwrap_or_default();

        if answer.trim().eq_ignore_ascii_case("y") || answer.trim().eq_ignore_ascii_case("yes") {
            ApprovalDecision::Approve
        } else {
            ApprovalDecision::Deny
        }
    }
}
