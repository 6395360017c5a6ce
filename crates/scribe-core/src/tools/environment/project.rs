//! Project analysis tool

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::context::project::{
    classify_directory, classify_file, dependency_summary, detect_project_kinds, project_kind_label,
    project_suggestions,
};
use crate::error::ToolError;
use crate::tools::filesystem::resolve_path;
use crate::tools::{BoxFuture, Tool, ToolParams};

/// Tool describing a project's type, layout, dependencies and common commands
pub struct GetProjectInfo {
    workspace: PathBuf,
}

impl GetProjectInfo {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for GetProjectInfo {
    fn name(&self) -> &str {
        "get_project_info"
    }

    fn description(&self) -> &str {
        "Analyze a project directory: detected project type, top-level structure, dependencies and suggested commands."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Project directory (defaults to the workspace root)"
                }
            }
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let dir = resolve_path(&self.workspace, params.opt_str("path")?.unwrap_or("."));
            if !dir.is_dir() {
                return Err(ToolError::InvalidParams(format!(
                    "{} is not a directory",
                    dir.display()
                )));
            }
            Ok(describe_project(&dir)?)
        })
    }
}

/// Project report for `dir`
pub fn describe_project(dir: &Path) -> std::io::Result<String> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string());

    let mut out = format!("=== Project Analysis: {} ===\n", name);
    out.push_str(&format!("Project Path: {}\n\n", dir.display()));
    out.push_str(&format!("Project Type: {}\n\n", project_kind_label(dir)));

    let mut entries: Vec<(String, bool)> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| {
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (e.file_name().to_string_lossy().to_string(), is_dir)
        })
        .collect();
    entries.sort();

    out.push_str("Project Structure:\n");
    for (entry, _) in entries.iter().filter(|(_, is_dir)| *is_dir) {
        out.push_str(&format!("  {}/ - {}\n", entry, classify_directory(entry)));
    }
    for (entry, _) in entries.iter().filter(|(_, is_dir)| !*is_dir) {
        if let Some(kind) = classify_file(entry) {
            out.push_str(&format!("  {} - {}\n", entry, kind));
        }
    }

    let dependencies = dependency_summary(dir);
    if !dependencies.is_empty() {
        out.push_str("\nDependencies & Configuration:\n");
        for line in dependencies {
            out.push_str(&format!("  {}\n", line));
        }
    }

    let suggestions = project_suggestions(dir, &detect_project_kinds(dir));
    if !suggestions.is_empty() {
        out.push_str("\nSuggestions:\n");
        for suggestion in suggestions {
            out.push_str(&format!("  - {}\n", suggestion));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rust_project_report() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();

        let report = describe_project(dir.path()).unwrap();
        assert!(report.contains("Project Type: Rust"));
        assert!(report.contains("src/ - Source code"));
        assert!(report.contains("Package: demo"));
        assert!(report.contains("cargo build"));
    }
}
