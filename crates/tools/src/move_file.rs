//! Move or rename a file or directory.

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

pub struct MoveFileTool;

#[async_trait]
impl Tool for MoveFileTool {
    fn name(&self) -> &str {
        "move_file"
    }

    fn description(&self) -> &str {
        "Move or rename a file or directory."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "string",
                    "description": "Path to move from"
                },
                "destination": {
                    "type": "string",
                    "description": "Path to move to"
                }
            },
            "required": ["source", "destination"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let source = args["source"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'source' argument".into()))?;
        let destination = args["destination"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'destination' argument".into()))?;

        let from = workspace::resolve_scoped("move_file", &ctx.cwd, source)?;
        let to = workspace::resolve_scoped("move_file", &ctx.cwd, destination)?;
        if let Some(parent) = to.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "move_file".into(),
                    reason: e.to_string(),
                })?;
        }
        tokio::fs::rename(&from, &to)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "move_file".into(),
                reason: e.to_string(),
            })?;

        Ok(format!("Moved {source} to {destination}"))
    }
}
