//! Create directory tool

use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{path_to_display, resolve_path};

/// Tool for creating a directory and any missing parents
pub struct CreateDirectory {
    workspace: PathBuf,
}

impl CreateDirectory {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for CreateDirectory {
    fn name(&self) -> &str {
        "create_directory"
    }

    fn description(&self) -> &str {
        "Create a directory and its parent directories if needed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to create"
                }
            },
            "required": ["path"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let path = resolve_path(&self.workspace, params.require_str("path")?);
            tokio::fs::create_dir_all(&path).await?;
            Ok(format!("Directory created: {}", path_to_display(&path)))
        })
    }
}
