//! Report the agent's working directory and list its entries.

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

pub struct CurrentLocTool;

#[async_trait]
impl Tool for CurrentLocTool {
    fn name(&self) -> &str {
        "current_loc"
    }

    fn description(&self) -> &str {
        "Show the current working directory and the files and folders inside it."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        _args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(&ctx.cwd)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "current_loc".into(),
                reason: e.to_string(),
            })?;
        while let Some(entry) = reader.next_entry().await.map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: "current_loc".into(),
                reason: e.to_string(),
            }
        })? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            entries.push(if is_dir { format!("{name}/") } else { name });
        }
        entries.sort();

        Ok(format!(
            "Current directory: {}\n{}",
            ctx.cwd.display(),
            entries.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_cwd_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let ctx = ToolContext::new(dir.path());

        let out = CurrentLocTool.execute(serde_json::json!({}), &ctx).await.unwrap();
        assert!(out.contains(&format!("Current directory: {}", dir.path().display())));
        assert!(out.contains("a.txt"));
        assert!(out.contains("sub/"));
    }
}
