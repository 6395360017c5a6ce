//! Composite working context tool

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{describe_directory, describe_project, system_summary};

/// Tool combining the directory, project and system reports
pub struct GetWorkingContext {
    workspace: PathBuf,
}

impl GetWorkingContext {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for GetWorkingContext {
    fn name(&self) -> &str {
        "get_working_context"
    }

    fn description(&self) -> &str {
        "Get the full working context in one call: current directory, project analysis and a system summary."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn execute(&self, _params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move { Ok(describe_working_context(&self.workspace)) })
    }
}

/// Sections that fail to build are left out
pub fn describe_working_context(workspace: &Path) -> String {
    let mut out = String::from("=== Working Context ===\n\n");
    if let Ok(directory) = describe_directory(workspace) {
        out.push_str(&directory);
        out.push('\n');
    }
    if let Ok(project) = describe_project(workspace) {
        out.push_str(&project);
        out.push('\n');
    }
    out.push_str("System Summary:\n");
    out.push_str(&system_summary());
    out.push('\n');
    out
}
