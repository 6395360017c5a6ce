//! Move file tool

use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{ensure_parent, path_to_display, resolve_path};

/// Tool for moving a file or directory
///
/// Destination parent directories are created before the move and stay
/// behind if the move fails.
pub struct MoveFile {
    workspace: PathBuf,
}

impl MoveFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for MoveFile {
    fn name(&self) -> &str {
        "move_file"
    }

    fn description(&self) -> &str {
        "Move a file or directory to another location, creating destination directories as needed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "src_path": {
                    "type": "string",
                    "description": "Source path"
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

            ensure_parent(&dst).await?;
            tokio::fs::rename(&src, &dst).await?;

            Ok(format!(
                "Moved {} to {}",
                path_to_display(&src),
                path_to_display(&dst)
            ))
        })
    }
}
