//! Search file contents recursively with a regex.

use async_trait::async_trait;
use walkdir::WalkDir;

use arka_core::error::ToolError;
use arka_core::tool::{Tool, ToolContext};

use crate::workspace;

/// Directories never worth searching.
const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Cap on reported matches so one noisy query can't flood the model.
const MAX_MATCHES: usize = 100;

pub struct SearchInFilesTool;

#[async_trait]
impl Tool for SearchInFilesTool {
    fn name(&self) -> &str {
        "search_in_files"
    }

    fn description(&self) -> &str {
        "Search file contents recursively using a regular expression, returning matching lines."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Regular expression to search for"
                },
                "path": {
                    "type": "string",
                    "description": "Directory to search (defaults to the working directory)"
                },
                "extension": {
                    "type": "string",
                    "description": "Only search files with this extension (e.g. \"rs\")"
                },
                "case_sensitive": {
                    "type": "boolean",
                    "description": "Match case exactly (defaults to false)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;
        let root = workspace::resolve(&ctx.cwd, args["path"].as_str().unwrap_or("."));
        let extension = args["extension"].as_str().map(str::to_owned);
        let case_sensitive = args["case_sensitive"].as_bool().unwrap_or(false);

        let pattern = regex::RegexBuilder::new(query)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| ToolError::InvalidArguments(format!("bad regex: {e}")))?;

        let base = ctx.cwd.clone();
        // Directory walking and regex matching are blocking work.
        let matches = tokio::task::spawn_blocking(move || {
            let mut lines = Vec::new();
            let walker = WalkDir::new(&root).into_iter().filter_entry(|entry| {
                !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIP_DIRS.contains(&name))
            });
            for entry in walker.flatten() {
                if lines.len() >= MAX_MATCHES {
                    break;
                }
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(ext) = &extension {
                    let matches_ext = entry
                        .path()
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e == ext);
                    if !matches_ext {
                        continue;
                    }
                }
                let Ok(content) = std::fs::read_to_string(entry.path()) else {
                    continue; // binary or unreadable
                };
                let display = entry
                    .path()
                    .strip_prefix(&base)
                    .unwrap_or(entry.path())
                    .display()
                    .to_string();
                for (idx, line) in content.lines().enumerate() {
                    if pattern.is_match(line) {
                        lines.push(format!("{display}:{}: {}", idx + 1, line.trim_end()));
                        if lines.len() >= MAX_MATCHES {
                            break;
                        }
                    }
                }
            }
            lines
        })
        .await
        .map_err(|e| ToolError::ExecutionFailed {
            tool_name: "search_in_files".into(),
            reason: e.to_string(),
        })?;

        if matches.is_empty() {
            return Ok(format!("No matches for '{query}'"));
        }
        Ok(matches.join("\n"))
    }
}
