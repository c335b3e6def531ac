//! Extract text from a PDF file.

use async_trait::async_trait;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

pub struct ParsePdfTool;

#[async_trait]
impl Tool for ParsePdfTool {
    fn name(&self) -> &str {
        "parse_pdf"
    }

    fn description(&self) -> &str {
        "Extract the text content of a PDF file."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the PDF file"
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

        let full = workspace::resolve(&ctx.cwd, path);
        // pdf-extract is synchronous and CPU-bound.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&full))
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "parse_pdf".into(),
                reason: e.to_string(),
            })?
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "parse_pdf".into(),
                reason: e.to_string(),
            })?;

        if text.trim().is_empty() {
            return Ok("(no extractable text found in PDF)".into());
        }
        Ok(text)
    }
}
