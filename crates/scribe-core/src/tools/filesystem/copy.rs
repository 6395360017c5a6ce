//! Copy file tool

use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{ensure_parent, path_to_display, resolve_path};

/// Tool for copying a single file
///
/// Destination parent directories are created before copying and stay
/// behind if the copy fails.
pub struct CopyFile {
    workspace: PathBuf,
}

impl CopyFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for CopyFile {
    fn name(&self) -> &str {
        "copy_file"
    }

    fn description(&self) -> &str {
        "Copy a file to another location, creating destination directories as needed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "src_path": {
                    "type": "string",
                    "description": "File to copy"
                },
                "dst_path": {
                    "type": "string",
                    "description": "Destination path"
                }
            },
            "required": ["src_path", "dst_path"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let src = resolve_path(&self.workspace, params.require_str("src_path")?);
            let dst = resolve_path(&self.workspace, params.require_str("dst_path")?);

            if tokio::fs::metadata(&src).await?.is_dir() {
                return Err(ToolError::InvalidParams(format!(
                    "{} is a directory; copy_file copies single files",
                    path_to_display(&src)
                )));
            }

            ensure_parent(&dst).await?;
            let bytes = tokio::fs::copy(&src, &dst).await?;

            Ok(format!(
                "Copied {} to {} ({} bytes)",
                path_to_display(&src),
                path_to_display(&dst),
                bytes
            ))
        })
    }
}
