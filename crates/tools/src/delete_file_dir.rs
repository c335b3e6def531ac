//! Delete a file or directory. Always approval-gated.

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{ApprovalPolicy, Tool, ToolContext};

use crate::workspace;

pub struct DeleteFileDirTool;

#[async_trait]
impl Tool for DeleteFileDirTool {
    fn name(&self) -> &str {
        "delete_file_dir"
    }

    fn description(&self) -> &str {
        "Delete a file or directory. Directories require recursive=true."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to delete"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Required to delete a directory and its contents"
                }
            },
            "required": ["path"]
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
        let path = args["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;
        let recursive = args["recursive"].as_bool().unwrap_or(false);

        let full = workspace::resolve_scoped("delete_file_dir", &ctx.cwd, path)?;
        let meta = tokio::fs::metadata(&full)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "delete_file_dir".into(),
                reason: e.to_string(),
            })?;

        if meta.is_dir() {
            if !recursive {
                return Err(ToolError::ExecutionFailed {
                    tool_name: "delete_file_dir".into(),
                    reason: format!("{path} is a directory; pass recursive=true to delete it"),
                });
            }
            tokio::fs::remove_dir_all(&full)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "delete_file_dir".into(),
                    reason: e.to_string(),
                })?;
            Ok(format!("Deleted directory {path}"))
        } else {
            tokio::fs::remove_file(&full)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "delete_file_dir".into(),
                    reason: e.to_string(),
                })?;
            Ok(format!("Deleted {path}"))
        }
    }
}
