//! Path resolution against the per-query working directory.

use std::path::{Component, Path, PathBuf};

use arka_core::error::ToolError;

/// Resolve `raw` against `cwd`, normalizing `.` and `..` lexically
/// (no filesystem access, so nonexistent targets resolve too).
pub(crate) fn resolve(cwd: &Path, raw: &str) -> PathBuf {
    let candidate = Path::new(raw);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        cwd.join(candidate)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `raw` and refuse anything that escapes the working directory.
/// Used by every tool that mutates the filesystem.
pub(crate) fn resolve_scoped(
    tool_name: &str,
    cwd: &Path,
    raw: &str,
) -> Result<PathBuf, ToolError> {
    let full = resolve(cwd, raw);
    if !full.starts_with(cwd) {
        return Err(ToolError::PermissionDenied {
            tool_name: tool_name.into(),
            reason: format!("path '{raw}' escapes the working directory"),
        });
    }
    Ok(full)
}
