//! Create a directory (and any missing parents).

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

pub struct MakeDirTool;

#[async_trait]
impl Tool for MakeDirTool {
    fn name(&self) -> &str {
        "make_dir"
    }

    fn description(&self) -> &str {
        "Create a directory, including any missing parent directories."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory path to create"
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

        let full = workspace::resolve_scoped("make_dir", &ctx.cwd, path)?;
        tokio::fs::create_dir_all(&full)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "make_dir".into(),
                reason: e.to_string(),
            })?;

        Ok(format!("Created directory {path}"))
    }
}
