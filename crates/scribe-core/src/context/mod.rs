//! Workspace awareness: project detection and activity tracking

pub mod project;
mod tracker;

pub use project::{analyze_project, detect_project_kinds, project_kind_label, ProjectInfo};
pub use tracker::{ActivityTracker, Preferences, ProjectContext, WorkPeriod, MAX_RECENT_FILES};
