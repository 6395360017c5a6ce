//! Current directory tool

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

/// Entries listed before the listing is cut short
pub const MAX_LISTED_ENTRIES: usize = 20;

/// Tool reporting the workspace directory and its first entries
pub struct GetCurrentDirectory {
    workspace: PathBuf,
}

impl GetCurrentDirectory {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for GetCurrentDirectory {
    fn name(&self) -> &str {
        "get_current_directory"
    }

    fn description(&self) -> &str {
        "Get the current working directory and a short listing of its contents."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn execute(&self, _params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move { Ok(describe_directory(&self.workspace)?) })
    }
}

/// Directory header plus up to [`MAX_LISTED_ENTRIES`] entries, sorted by name
pub fn describe_directory(dir: &Path) -> std::io::Result<String> {
    let metadata = std::fs::metadata(dir)?;
    let mut entries: Vec<(String, bool)> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| {
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (e.file_name().to_string_lossy().to_string(), is_dir)
        })
        .collect();
    entries.sort();

    let mut out = String::new();
    out.push_str(&format!("Current Working Directory: {}\n", dir.display()));
    if let Some(name) = dir.file_name() {
        out.push_str(&format!("Directory Name: {}\n", name.to_string_lossy()));
    }
    if let Some(parent) = dir.parent() {
        out.push_str(&format!("Parent Directory: {}\n", parent.display()));
    }
    if let Ok(modified) = metadata.modified() {
        let modified: DateTime<Utc> = modified.into();
        out.push_str(&format!("Modified: {}\n", modified.to_rfc3339()));
    }
    out.push_str(&format!("Total Items: {}\n\nDirectory Contents:\n", entries.len()));

    let (mut dirs, mut files) = (0, 0);
    for (name, is_dir) in entries.iter().take(MAX_LISTED_ENTRIES) {
        if *is_dir {
            out.push_str(&format!("  {}/\n", name));
            dirs += 1;
        } else {
            out.push_str(&format!("  {}\n", name));
            files += 1;
        }
    }
    if entries.len() > MAX_LISTED_ENTRIES {
        out.push_str(&format!("  ... ({} more)\n", entries.len() - MAX_LISTED_ENTRIES));
    }
    out.push_str(&format!("\nSummary: {} directories, {} files shown\n", dirs, files));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_listing_is_capped() {
        let dir = TempDir::new().unwrap();
        for i in 0..25 {
            std::fs::write(dir.path().join(format!("file{:02}.txt", i)), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let text = describe_directory(dir.path()).unwrap();
        assert!(text.contains("Total Items: 26"));
        assert!(text.contains("file00.txt"));
        assert!(!text.contains("file24.txt"));
        assert!(text.contains("... (6 more)"));
    }
}
