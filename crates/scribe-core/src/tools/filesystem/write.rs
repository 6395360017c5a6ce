//! Write file tool

use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{ensure_parent, path_to_display, resolve_path};

/// Tool for writing file contents
///
/// Parent directories are created first; if the write itself then fails,
/// those directories are left in place.
pub struct WriteFile {
    workspace: PathBuf,
}

impl WriteFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for WriteFile {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file, creating parent directories as needed. Overwrites any existing content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "The full content to write to the file"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let file_path = params.require_str("file_path")?;
            let content = params.require_str("content")?;
            let path = resolve_path(&self.workspace, file_path);

            ensure_parent(&path).await?;
            tokio::fs::write(&path, content).await?;

            Ok(format!(
                "File written successfully: {} ({} bytes)",
                path_to_display(&path),
                content.len()
            ))
        })
    }
}
