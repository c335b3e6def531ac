//! Create a new file, refusing to clobber an existing one.

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

pub struct CreateFileTool;

#[async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &str {
        "create_file"
    }

    fn description(&self) -> &str {
        "Create a new file with optional initial content. Fails if the file already exists."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path to create"
                },
                "content": {
                    "type": "string",
                    "description": "Initial content (defaults to empty)"
                }
            },
            "required": ["path"]
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
        let content = args["content"].as_str().unwrap_or("");

        let full = workspace::resolve_scoped("create_file", &ctx.cwd, path)?;
        if tokio::fs::try_exists(&full).await.unwrap_or(false) {
            return Err(ToolError::ExecutionFailed {
                tool_name: "create_file".into(),
                reason: format!("file already exists: {path}"),
            });
        }
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "create_file".into(),
                    reason: e.to_string(),
                })?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "create_file".into(),
                reason: e.to_string(),
            })?;

        Ok(format!("Created {path}"))
    }
}
