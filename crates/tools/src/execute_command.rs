//! Run a shell command. Always approval-gated.

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{ApprovalPolicy, Tool, ToolContext};

use crate::workspace;

pub struct ExecuteCommandTool;

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Run a shell command and return its stdout, stderr, and exit status."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Shell command to run"
                },
                "cwd": {
                    "type": "string",
                    "description": "Directory to run in (defaults to the working directory)"
                }
            },
            "required": ["command"]
        })
    }

    fn approval_policy(&self) -> ApprovalPolicy {
        ApprovalPolicy::Always
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let command = args["command"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'command' argument".into()))?;
        let run_dir = match args["cwd"].as_str() {
            Some(raw) => workspace::resolve_scoped("execute_command", &ctx.cwd, raw)?,
            None => ctx.cwd.clone(),
        };

        tracing::debug!(%command, cwd = %run_dir.display(), "Running shell command");

        let mut child = tokio::process::Command::new("sh");
        child
            .arg("-c")
            .arg(command)
            .current_dir(&run_dir)
            .kill_on_drop(true);

        let output = tokio::select! {
            result = child.output() => result.map_err(|e| ToolError::ExecutionFailed {
                tool_name: "execute_command".into(),
                reason: e.to_string(),
            })?,
            _ = ctx.cancel.cancelled() => {
                return Err(ToolError::ExecutionFailed {
                    tool_name: "execute_command".into(),
                    reason: "command cancelled".into(),
                });
            }
        };

        let report = serde_json::json!({
            "success": output.status.success(),
            "stdout": String::from_utf8_lossy(&output.stdout),
            "stderr": String::from_utf8_lossy(&output.stderr),
        });
        Ok(report.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_requires_approval() {
        assert!(ExecuteCommandTool
            .approval_policy()
            .requires_approval(&serde_json::json!({"command": "ls"})));
    }

    #[tokio::test]
    async fn captures_stdout_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ToolContext::new(dir.path());

        let out = ExecuteCommandTool
            .execute(serde_json::json!({"command": "echo hello"}), &ctx)
            .await
            .unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["success"], true);
        assert_eq!(report["stdout"], "hello\n");
    }

    #[tokio::test]
    async fn failing_command_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ToolContext::new(dir.path());

        let out = ExecuteCommandTool
            .execute(
                serde_json::json!({"command": "ls /definitely/not/a/path"}),
                &ctx,
            )
            .await
            .unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["success"], false);
        assert!(!report["stderr"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn runs_in_requested_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let ctx = ToolContext::new(dir.path());

        let out = ExecuteCommandTool
            .execute(serde_json::json!({"command": "pwd", "cwd": "sub"}), &ctx)
            .await
            .unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(report["stdout"].as_str().unwrap().trim().ends_with("/sub"));
    }

    #[tokio::test]
    async fn cancellation_stops_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ToolContext::new(dir.path());
        ctx.cancel.cancel();

        let err = ExecuteCommandTool
            .execute(serde_json::json!({"command": "sleep 30"}), &ctx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }
}
