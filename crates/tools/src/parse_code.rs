//! Produce a structural outline of a source file.
//!
//! Line-based scanning, not a real parser: good enough to give the model
//! a map of the file without sending the whole thing.

use async_trait::async_trait;
use regex::Regex;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

pub struct ParseCodeTool;

/// Declaration patterns per language family.
fn patterns_for(extension: &str) -> Option<Vec<Regex>> {
    let sources: &[&str] = match extension {
        "rs" => &[
            r"^\s*(pub(\(.*\))?\s+)?(async\s+)?fn\s+\w+",
            r"^\s*(pub(\(.*\))?\s+)?(struct|enum|trait|mod|const|static|type)\s+\w+",
            r"^\s*impl\b",
        ],
        "js" | "ts" | "jsx" | "tsx" => &[
            r"^\s*(export\s+)?(default\s+)?(async\s+)?function\s*\*?\s*\w*",
            r"^\s*(export\s+)?(abstract\s+)?class\s+\w+",
            r"^\s*(export\s+)?(const|let|var)\s+\w+\s*=\s*(async\s*)?\(.*\)\s*=>",
            r"^\s*(export\s+)?(interface|type|enum)\s+\w+",
        ],
        "py" => &[
            r"^\s*(async\s+)?def\s+\w+",
            r"^\s*class\s+\w+",
        ],
        _ => return None,
    };
    Some(
        sources
            .iter()
            .map(|s| Regex::new(s).unwrap_or_else(|_| unreachable!("static pattern")))
            .collect(),
    )
}

#[async_trait]
impl Tool for ParseCodeTool {
    fn name(&self) -> &str {
        "parse_code"
    }

    fn description(&self) -> &str {
        "Outline the functions, classes, and types declared in a source file \
         (supports Rust, JavaScript/TypeScript, and Python)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Source file to outline"
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
        let extension = full
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let patterns = patterns_for(&extension).ok_or_else(|| ToolError::InvalidArguments(
            format!("unsupported file type: .{extension}"),
        ))?;

        let content = tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "parse_code".into(),
                reason: e.to_string(),
            })?;

        let mut outline = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if patterns.iter().any(|p| p.is_match(line)) {
                outline.push(format!("{}: {}", idx + 1, line.trim_end()));
            }
        }

        if outline.is_empty() {
            return Ok(format!("No declarations found in {path}"));
        }
        Ok(format!("Outline of {path}:\n{}", outline.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outlines_rust_declarations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lib.rs"),
            "pub struct Widget;\n\nimpl Widget {\n    pub async fn spin(&self) {}\n}\n\nfn helper() {}\n",
        )
        .unwrap();
        let ctx = ToolContext::new(dir.path());

        let out = ParseCodeTool
            .execute(serde_json::json!({"path": "lib.rs"}), &ctx)
            .await
            .unwrap();
        assert!(out.contains("1: pub struct Widget;"));
        assert!(out.contains("3: impl Widget {"));
        assert!(out.contains("pub async fn spin"));
        assert!(out.contains("6: fn helper() {}"));
    }

    #[tokio::test]
    async fn outlines_python_declarations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("app.py"),
            "class Greeter:\n    def greet(self):\n        pass\n\nasync def main():\n    pass\n",
        )
        .unwrap();
        let ctx = ToolContext::new(dir.path());

        let out = ParseCodeTool
            .execute(serde_json::json!({"path": "app.py"}), &ctx)
            .await
            .unwrap();
        assert!(out.contains("1: class Greeter:"));
        assert!(out.contains("def greet"));
        assert!(out.contains("async def main"));
    }

    #[tokio::test]
    async fn outlines_typescript_declarations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("mod.ts"),
            "export interface Config {}\nexport const run = async (q: string) => {};\nfunction local() {}\n",
        )
        .unwrap();
        let ctx = ToolContext::new(dir.path());

        let out = ParseCodeTool
            .execute(serde_json::json!({"path": "mod.ts"}), &ctx)
            .await
            .unwrap();
        assert!(out.contains("export interface Config"));
        assert!(out.contains("export const run"));
        assert!(out.contains("function local"));
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.csv"), "a,b\n").unwrap();
        let ctx = ToolContext::new(dir.path());

        let err = ParseCodeTool
            .execute(serde_json::json!({"path": "data.csv"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
