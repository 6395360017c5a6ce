//! Pattern replacement tool

use regex::Regex;
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{path_to_display, resolve_path};

/// Tool for replacing every occurrence of a literal or regex pattern in a file
pub struct ReplaceText {
    workspace: PathBuf,
}

impl ReplaceText {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for ReplaceText {
    fn name(&self) -> &str {
        "replace_text"
    }

    fn description(&self) -> &str {
        "Replace all occurrences of a pattern in a file. With use_regex, the replacement may use $1-style capture references."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "File to modify"
                },
                "pattern": {
                    "type": "string",
                    "description": "Text or regular expression to replace"
                },
                "replacement": {
                    "type": "string",
                    "description": "Replacement text"
                },
                "use_regex": {
                    "type": "boolean",
                    "description": "Treat pattern as a regular expression",
                    "default": false
                }
            },
            "required": ["file_path", "pattern", "replacement"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let path = resolve_path(&self.workspace, params.require_str("file_path")?);
            let pattern = params.require_str("pattern")?;
            let replacement = params.require_str("replacement")?;
            let use_regex = params.bool_or("use_regex", false)?;

            if pattern.is_empty() {
                return Err(ToolError::InvalidParams("pattern must not be empty".into()));
            }

            let content = tokio::fs::read_to_string(&path).await?;
            let (updated, count) = if use_regex {
                let regex = Regex::new(pattern)
                    .map_err(|e| ToolError::InvalidParams(format!("Invalid regex: {}", e)))?;
                let count = regex.find_iter(&content).count();
                (regex.replace_all(&content, replacement).into_owned(), count)
            } else {
                let count = content.matches(pattern).count();
                (content.replace(pattern, replacement), count)
            };

            if count == 0 {
                return Ok(format!(
                    "No occurrences of '{}' found in {}",
                    pattern,
                    path_to_display(&path)
                ));
            }

            tokio::fs::write(&path, updated).await?;
            Ok(format!(
                "Replaced {} occurrences in {}",
                count,
                path_to_display(&path)
            ))
        })
    }
}
