//! Activity tracker
//!
//! Remembers the current project, recently touched files, and recent tool
//! activity across runs. One `RwLock` guards all state; each public method
//! acquires it exactly once and works on the borrowed state directly, so no
//! method ever re-enters the lock.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::project::project_kind_label;

/// Recent files kept per project
pub const MAX_RECENT_FILES: usize = 10;

/// Actions within this window of the previous one extend the same work period
const WORK_PERIOD_GAP_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub path: PathBuf,
    pub name: String,
    pub project_type: String,
    pub last_accessed: DateTime<Utc>,
    /// Most recent first, no duplicates
    #[serde(default)]
    pub recent_files: Vec<String>,
}

/// A run of actions in one project without a long pause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPeriod {
    pub project_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub preferred_editor: String,
    pub default_encoding: String,
    pub max_history_days: i64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            preferred_editor: "vim".to_string(),
            default_encoding: "utf-8".to_string(),
            max_history_days: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TrackerState {
    #[serde(default)]
    current_project: Option<ProjectContext>,
    #[serde(default)]
    work_history: Vec<WorkPeriod>,
    #[serde(default)]
    preferences: Preferences,
}

/// Single-writer/many-reader record of what the user has been working on
#[derive(Debug, Default)]
pub struct ActivityTracker {
    state: RwLock<TrackerState>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load persisted state; a missing file yields an empty tracker
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let state: TrackerState = serde_json::from_str(&json)?;
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Persist state; the lock is released before touching the disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = {
            let state = self.state.read();
            serde_json::to_string_pretty(&*state)?
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        debug!("Saved activity context to {:?}", path);
        Ok(())
    }

    /// Make `path` the current project. Recent files survive only if the project is unchanged.
    pub fn update_current_project(&self, path: &Path) {
        let now = Utc::now();
        let project_type = project_kind_label(path);
        let mut state = self.state.write();
        let unchanged = state
            .current_project
            .as_ref()
            .is_some_and(|project| project.path == path);

        if unchanged {
            if let Some(project) = state.current_project.as_mut() {
                project.last_accessed = now;
                project.project_type = project_type;
            }
        } else {
            state.current_project = Some(ProjectContext {
                path: path.to_path_buf(),
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string()),
                project_type,
                last_accessed: now,
                recent_files: Vec::new(),
            });
        }
    }

    /// Move `file` to the front of the current project's recent files
    pub fn add_recent_file(&self, file: &str) {
        let mut state = self.state.write();
        if let Some(project) = state.current_project.as_mut() {
            project.recent_files.retain(|f| f != file);
            project.recent_files.insert(0, file.to_string());
            project.recent_files.truncate(MAX_RECENT_FILES);
        }
    }

    pub fn record_action(&self, action: &str) {
        self.record_action_at(action, Utc::now());
    }

    /// Append to the latest work period, or start a new one, then prune old periods
    pub fn record_action_at(&self, action: &str, now: DateTime<Utc>) {
        let mut state = self.state.write();
        let project_path = state.current_project.as_ref().map(|p| p.path.clone());
        let gap = Duration::minutes(WORK_PERIOD_GAP_MINUTES);

        let extends_last = state.work_history.last().is_some_and(|period| {
            period.project_path == project_path && now - period.last_active <= gap
        });

        if extends_last {
            if let Some(period) = state.work_history.last_mut() {
                period.actions.push(action.to_string());
                period.last_active = now;
            }
        } else {
            state.work_history.push(WorkPeriod {
                project_path,
                started_at: now,
                last_active: now,
                actions: vec![action.to_string()],
            });
        }

        let cutoff = now - Duration::days(state.preferences.max_history_days);
        state.work_history.retain(|p| p.last_active >= cutoff);
    }

    pub fn current_project(&self) -> Option<ProjectContext> {
        self.state.read().current_project.clone()
    }

    pub fn current_project_path(&self) -> Option<PathBuf> {
        self.state.read().current_project.as_ref().map(|p| p.path.clone())
    }

    pub fn work_history(&self) -> Vec<WorkPeriod> {
        self.state.read().work_history.clone()
    }

    pub fn preferences(&self) -> Preferences {
        self.state.read().preferences.clone()
    }

    /// Text overview of the current project, recent activity, and preferences
    pub fn summary(&self) -> String {
        let state = self.state.read();
        let mut out = String::from("=== Context Summary ===\n\n");

        if let Some(project) = &state.current_project {
            out.push_str("Current Project:\n");
            out.push_str(&format!("  Name: {}\n", project.name));
            out.push_str(&format!("  Path: {}\n", project.path.display()));
            out.push_str(&format!("  Type: {}\n", project.project_type));
            out.push_str(&format!(
                "  Last Accessed: {}\n",
                project.last_accessed.format("%Y-%m-%d %H:%M:%S")
            ));
            if !project.recent_files.is_empty() {
                out.push_str("  Recent Files:\n");
                for file in project.recent_files.iter().take(5) {
                    out.push_str(&format!("    - {}\n", file_name(file)));
                }
            }
            out.push('\n');
        }

        if !state.work_history.is_empty() {
            out.push_str("Recent Activity:\n");
            for period in state.work_history.iter().rev().take(3) {
                let project = period
                    .project_path
                    .as_deref()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "(no project)".to_string());
                out.push_str(&format!(
                    "  {} - {} ({} actions)\n",
                    period.started_at.format("%H:%M"),
                    project,
                    period.actions.len()
                ));
            }
            out.push('\n');
        }

        out.push_str("Preferences:\n");
        out.push_str(&format!("  Editor: {}\n", state.preferences.preferred_editor));
        out.push_str(&format!("  Encoding: {}\n", state.preferences.default_encoding));
        out
    }

    /// Next-step hints derived from the project type, recent files, and last action
    pub fn suggestions(&self) -> Vec<String> {
        let state = self.state.read();
        let Some(project) = &state.current_project else {
            return vec![
                "Use 'get_working_context' to analyze the current environment".to_string(),
                "Use 'get_project_info' to understand the project structure".to_string(),
            ];
        };

        let mut suggestions = Vec::new();
        if project.project_type.contains("Rust") {
            suggestions.push("Run 'cargo check' after edits to catch compile errors".to_string());
        }
        if project.project_type.contains("Go") {
            suggestions.push("Run 'go build' to compile and 'go mod tidy' to clean dependencies".to_string());
        }
        if project.project_type.contains("Node.js") {
            suggestions.push("Run 'npm install' to install dependencies".to_string());
        }

        if !project.recent_files.is_empty() {
            suggestions.push("Continue editing recent files:".to_string());
            for file in project.recent_files.iter().take(3) {
                suggestions.push(format!("  - {}", file_name(file)));
            }
        }

        if let Some(last) = state.work_history.last().and_then(|p| p.actions.last()) {
            if last.contains("read_file") {
                suggestions.push("Consider editing the file you just read".to_string());
            }
            if last.contains("search") {
                suggestions.push("Use 'replace_text' to modify the content you found".to_string());
            }
        }
        suggestions
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_recent_files_dedupe_and_cap() {
        let dir = TempDir::new().unwrap();
        let tracker = ActivityTracker::new();
        tracker.update_current_project(dir.path());

        for i in 0..12 {
            tracker.add_recent_file(&format!("file{}.rs", i));
        }
        tracker.add_recent_file("file5.rs");

        let project = tracker.current_project().unwrap();
        assert_eq!(project.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(project.recent_files[0], "file5.rs");
        assert_eq!(project.recent_files.iter().filter(|f| *f == "file5.rs").count(), 1);
    }

    #[test]
    fn test_same_project_keeps_recent_files() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let tracker = ActivityTracker::new();

        tracker.update_current_project(dir.path());
        tracker.add_recent_file("a.rs");
        tracker.update_current_project(dir.path());
        assert_eq!(tracker.current_project().unwrap().recent_files, vec!["a.rs"]);

        tracker.update_current_project(other.path());
        assert!(tracker.current_project().unwrap().recent_files.is_empty());
    }

    #[test]
    fn test_record_action_merges_within_window() {
        let dir = TempDir::new().unwrap();
        let tracker = ActivityTracker::new();
        tracker.update_current_project(dir.path());

        let start = Utc::now();
        tracker.record_action_at("read_file", start);
        tracker.record_action_at("search", start + Duration::minutes(10));
        assert_eq!(tracker.work_history().len(), 1);
        assert_eq!(tracker.work_history()[0].actions.len(), 2);

        tracker.record_action_at("write_file", start + Duration::minutes(45));
        assert_eq!(tracker.work_history().len(), 2);
    }

    #[test]
    fn test_old_history_pruned() {
        let tracker = ActivityTracker::new();
        let start = Utc::now() - Duration::days(40);
        tracker.record_action_at("list_files", start);
        tracker.record_action_at("list_files", Utc::now());
        assert_eq!(tracker.work_history().len(), 1);
    }

    #[test]
    fn test_suggestions_follow_last_action() {
        let tracker = ActivityTracker::new();
        assert_eq!(tracker.suggestions().len(), 2);

        let dir = TempDir::new().unwrap();
        tracker.update_current_project(dir.path());
        tracker.record_action("search");
        assert!(tracker.suggestions().iter().any(|s| s.contains("replace_text")));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("context.json");

        let tracker = ActivityTracker::new();
        tracker.update_current_project(dir.path());
        tracker.add_recent_file("main.rs");
        tracker.record_action("read_file");
        tracker.save(&path).unwrap();

        let loaded = ActivityTracker::load(&path).unwrap();
        assert_eq!(loaded.current_project(), tracker.current_project());
        assert_eq!(loaded.work_history(), tracker.work_history());
        assert!(loaded.summary().contains("main.rs"));

        let missing = ActivityTracker::load(&dir.path().join("none.json")).unwrap();
        assert!(missing.current_project().is_none());
    }
}
