//! Append content to the end of a file.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

pub struct AppendFileTool;

#[async_trait]
impl Tool for AppendFileTool {
    fn name(&self) -> &str {
        "append_file"
    }

    fn description(&self) -> &str {
        "Append content to the end of a file, creating it if it does not exist."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path to append to"
                },
                "content": {
                    "type": "string",
                    "description": "Content to append"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let path = args["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;
        let content = args["content"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'content' argument".into()))?;

        let full = workspace::resolve_scoped("append_file", &ctx.cwd, path)?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "append_file".into(),
                reason: e.to_string(),
            })?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "append_file".into(),
                reason: e.to_string(),
            })?;

        Ok(format!("Appended {} bytes to {}", content.len(), path))
    }
}
