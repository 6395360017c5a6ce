//! Delete file tool

use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{path_to_display, resolve_path};

/// Tool for deleting files and directories
///
/// Directories are removed recursively. A failure part-way through a
/// directory removal leaves the remaining entries behind.
pub struct DeleteFile {
    workspace: PathBuf,
}

impl DeleteFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for DeleteFile {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Delete a file or directory (directories are removed recursively). This cannot be undone."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file or directory to delete"
                }
            },
            "required": ["path"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let path = resolve_path(&self.workspace, params.require_str("path")?);

            let metadata = tokio::fs::symlink_metadata(&path).await?;
            if metadata.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
                Ok(format!("Directory deleted: {}", path_to_display(&path)))
            } else {
                tokio::fs::remove_file(&path).await?;
                Ok(format!("File deleted: {}", path_to_display(&path)))
            }
        })
    }
}
