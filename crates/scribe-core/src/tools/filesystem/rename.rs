//! Rename tool

use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{path_to_display, resolve_path};

/// Tool for renaming a file or directory in place
pub struct RenameFile {
    workspace: PathBuf,
}

impl RenameFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for RenameFile {
    fn name(&self) -> &str {
        "rename_file"
    }

    fn description(&self) -> &str {
        "Rename a file or directory."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "old_path": {
                    "type": "string",
                    "description": "Current path"
                },
                "new_path": {
                    "type": "string",
                    "description": "New path"
                }
            },
            "required": ["old_path", "new_path"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let old_path = resolve_path(&self.workspace, params.require_str("old_path")?);
            let new_path = resolve_path(&self.workspace, params.require_str("new_path")?);

            tokio::fs::rename(&old_path, &new_path).await?;

            Ok(format!(
                "Renamed {} to {}",
                path_to_display(&old_path),
                path_to_display(&new_path)
            ))
        })
    }
}
