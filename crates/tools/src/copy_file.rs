//! Copy a file to a new location.

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

pub struct CopyFileTool;

#[async_trait]
impl Tool for CopyFileTool {
    fn name(&self) -> &str {
        "copy_file"
    }

    fn description(&self) -> &str {
        "Copy a file to a new location."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "string",
                    "description": "Path to copy from"
                },
                "destination": {
                    "type": "string",
                    "description": "Path to copy to"
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

        let from = workspace::resolve(&ctx.cwd, source);
        let to = workspace::resolve_scoped("copy_file", &ctx.cwd, destination)?;
        if let Some(parent) = to.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "copy_file".into(),
                    reason: e.to_string(),
                })?;
        }
        let bytes = tokio::fs::copy(&from, &to)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "copy_file".into(),
                reason: e.to_string(),
            })?;

        Ok(format!("Copied {source} to {destination} ({bytes} bytes)"))
    }
}
