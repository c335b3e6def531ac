//! Built-in tool implementations for arka.
//!
//! Tools give the agent the ability to act in the world: read and write
//! files, run shell commands, search the web, inspect code. Each tool
//! declares its own approval policy; destructive ones (write_file,
//! delete_file_dir, execute_command) always pass through the human gate,
//! and http_request gates only on mutating methods.
//!
//! Relative paths resolve against the per-query `ToolContext` working
//! directory, and mutating tools refuse paths that escape it.

pub mod append_file;
pub mod copy_file;
pub mod create_file;
pub mod current_loc;
pub mod delete_file_dir;
pub mod execute_command;
pub mod http_request;
pub mod make_dir;
pub mod move_file;
pub mod parse_code;
pub mod parse_pdf;
pub mod read_file;
pub mod search_in_files;
pub mod web_search;
pub mod write_file;

mod workspace;

use std::sync::Arc;

use arka_core::error::ToolError;
use arka_core::tool::ToolRegistry;

/// Create the default tool registry with all built-in tools.
///
/// The web search tool is only registered when a search API key is
/// configured, since it cannot work without one.
pub fn default_registry(search_api_key: Option<String>) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(read_file::ReadFileTool))?;
    registry.register(Arc::new(write_file::WriteFileTool))?;
    registry.register(Arc::new(create_file::CreateFileTool))?;
    registry.register(Arc::new(append_file::AppendFileTool))?;
    registry.register(Arc::new(make_dir::MakeDirTool))?;
    registry.register(Arc::new(current_loc::CurrentLocTool))?;
    registry.register(Arc::new(delete_file_dir::DeleteFileDirTool))?;
    registry.register(Arc::new(move_file::MoveFileTool))?;
    registry.register(Arc::new(copy_file::CopyFileTool))?;
    registry.register(Arc::new(execute_command::ExecuteCommandTool))?;
    registry.register(Arc::new(parse_pdf::ParsePdfTool))?;
    registry.register(Arc::new(search_in_files::SearchInFilesTool))?;
    registry.register(Arc::new(http_request::HttpRequestTool))?;
    registry.register(Arc::new(parse_code::ParseCodeTool))?;

    if let Some(key) = search_api_key {
        registry.register(Arc::new(web_search::WebSearchTool::new(key)))?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_builtins() {
        let registry = default_registry(None).unwrap();
        assert_eq!(registry.len(), 14);
        assert!(registry.get("read_file").is_some());
        assert!(registry.get("execute_command").is_some());
        assert!(registry.get("web_search").is_none());
    }

    #[test]
    fn web_search_registered_with_key() {
        let registry = default_registry(Some("tvly-test".into())).unwrap();
        assert_eq!(registry.len(), 15);
        assert!(registry.get("web_search").is_some());
    }
}
