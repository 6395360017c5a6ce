//! File metadata tool

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{path_to_display, resolve_path};

/// Tool for describing a file or directory
pub struct FileInfo {
    workspace: PathBuf,
}

impl FileInfo {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for FileInfo {
    fn name(&self) -> &str {
        "file_info"
    }

    fn description(&self) -> &str {
        "Get detailed information about a file or directory: size, permissions, modification time and type."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File or directory to inspect"
                }
            },
            "required": ["path"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let path = resolve_path(&self.workspace, params.require_str("path")?);
            let metadata = tokio::fs::metadata(&path).await?;

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path_to_display(&path));

            let mut out = String::new();
            out.push_str(&format!("Path: {}\n", path_to_display(&path)));
            out.push_str(&format!("Name: {}\n", name));
            out.push_str(&format!("Size: {} bytes\n", metadata.len()));
            out.push_str(&format!("Mode: {}\n", format_mode(&metadata)));
            if let Ok(modified) = metadata.modified() {
                let modified: DateTime<Utc> = modified.into();
                out.push_str(&format!("Modified: {}\n", modified.to_rfc3339()));
            }

            if metadata.is_dir() {
                out.push_str("Type: Directory\n");
            } else {
                out.push_str("Type: File\n");
                let extension = path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                out.push_str(&format!("Extension: {}\n", extension));
            }

            Ok(out)
        })
    }
}

#[cfg(unix)]
fn format_mode(metadata: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:o}", metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn format_mode(metadata: &std::fs::Metadata) -> String {
    if metadata.permissions().readonly() {
        "read-only".to_string()
    } else {
        "read-write".to_string()
    }
}
