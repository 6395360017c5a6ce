//! Activity-aware context tool

use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::context::ActivityTracker;
use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

/// Tool reporting tracked activity: current project, recent files and next-step hints
///
/// Calling it also marks the workspace as the current project.
pub struct GetSmartContext {
    workspace: PathBuf,
    tracker: Arc<ActivityTracker>,
}

impl GetSmartContext {
    pub fn new(workspace: PathBuf, tracker: Arc<ActivityTracker>) -> Self {
        Self { workspace, tracker }
    }
}

impl Tool for GetSmartContext {
    fn name(&self) -> &str {
        "get_smart_context"
    }

    fn description(&self) -> &str {
        "Get a summary of recent activity in this project (recent files, work history) with suggested next steps."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn execute(&self, _params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            self.tracker.update_current_project(&self.workspace);

            let mut out = self.tracker.summary();
            let suggestions = self.tracker.suggestions();
            if !suggestions.is_empty() {
                out.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    out.push_str(&format!("  {}\n", suggestion));
                }
            }
            if let Some(project) = self.tracker.current_project() {
                out.push_str(&format!("\nProject Type: {}\n", project.project_type));
            }
            Ok(out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_marks_workspace_as_current_project() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module demo\n").unwrap();
        let tracker = Arc::new(ActivityTracker::new());
        let tool = GetSmartContext::new(dir.path().to_path_buf(), tracker.clone());

        let text = tool
            .execute(ToolParams::default(), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(tracker.current_project_path().as_deref(), Some(dir.path()));
        assert!(text.contains("Project Type: Go"));
        assert!(text.contains("go build"));
    }
}
