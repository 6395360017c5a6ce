//! Tool Registry Factory Module
//!
//! Centralizes tool registration for a workspace and provides a builder for
//! enabling or disabling tool groups.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::context::ActivityTracker;
use crate::tools::environment::{
    GetCurrentDirectory, GetProjectInfo, GetSmartContext, GetSystemInfo, GetWorkingContext,
};
use crate::tools::filesystem::{
    CopyFile, CreateDirectory, DeleteFile, EditFile, FileInfo, ListFiles, MoveFile, ReadFile,
    RenameFile, ReplaceText, Search, WriteFile,
};
use crate::tools::shell::{ExecuteCommand, ShellConfig};
use crate::tools::ToolRegistry;

/// Builder for creating a tool registry with customizable options
pub struct ToolRegistryBuilder {
    workspace: PathBuf,
    include_filesystem: bool,
    include_shell: bool,
    include_environment: bool,
    shell_config: ShellConfig,
    tracker: Option<Arc<ActivityTracker>>,
}

impl ToolRegistryBuilder {
    /// Create a new builder with the given workspace path
    pub fn new(workspace: PathBuf) -> Self {
        Self {
            workspace,
            include_filesystem: true,
            include_shell: true,
            include_environment: true,
            shell_config: ShellConfig::default(),
            tracker: None,
        }
    }

    /// Enable/disable filesystem tools
    pub fn with_filesystem(mut self, enabled: bool) -> Self {
        self.include_filesystem = enabled;
        self
    }

    /// Enable/disable the command execution tool
    pub fn with_shell(mut self, enabled: bool) -> Self {
        self.include_shell = enabled;
        self
    }

    /// Enable/disable environment inspection tools
    pub fn with_environment(mut self, enabled: bool) -> Self {
        self.include_environment = enabled;
        self
    }

    pub fn with_shell_config(mut self, config: ShellConfig) -> Self {
        self.shell_config = config;
        self
    }

    /// Share an activity tracker with `get_smart_context`
    pub fn with_tracker(mut self, tracker: Arc<ActivityTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Build the tool registry with the configured options
    pub fn build(self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        let ws = &self.workspace;

        if self.include_filesystem {
            registry.register(Arc::new(ReadFile::new(ws.clone())));
            registry.register(Arc::new(WriteFile::new(ws.clone())));
            registry.register(Arc::new(EditFile::new(ws.clone())));
            registry.register(Arc::new(ListFiles::new(ws.clone())));
            registry.register(Arc::new(CreateDirectory::new(ws.clone())));
            registry.register(Arc::new(DeleteFile::new(ws.clone())));
            registry.register(Arc::new(RenameFile::new(ws.clone())));
            registry.register(Arc::new(CopyFile::new(ws.clone())));
            registry.register(Arc::new(MoveFile::new(ws.clone())));
            registry.register(Arc::new(FileInfo::new(ws.clone())));
            registry.register(Arc::new(Search::new(ws.clone())));
            registry.register(Arc::new(ReplaceText::new(ws.clone())));
        }

        if self.include_shell {
            registry.register(Arc::new(
                ExecuteCommand::new(ws.clone()).with_config(self.shell_config.clone()),
            ));
        }

        if self.include_environment {
            let tracker = self.tracker.clone().unwrap_or_default();
            registry.register(Arc::new(GetCurrentDirectory::new(ws.clone())));
            registry.register(Arc::new(GetSystemInfo::new()));
            registry.register(Arc::new(GetProjectInfo::new(ws.clone())));
            registry.register(Arc::new(GetWorkingContext::new(ws.clone())));
            registry.register(Arc::new(GetSmartContext::new(ws.clone(), tracker)));
        }

        tracing::debug!(tools = registry.len(), "Built tool registry");
        registry
    }
}

/// Create the full tool registry for a workspace
pub fn create_standard_tool_registry(workspace: &Path, tracker: Arc<ActivityTracker>) -> ToolRegistry {
    ToolRegistryBuilder::new(workspace.to_path_buf())
        .with_tracker(tracker)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FILESYSTEM_TOOLS: &[&str] = &[
        "read_file",
        "write_file",
        "edit_file",
        "list_files",
        "create_directory",
        "delete_file",
        "rename_file",
        "copy_file",
        "move_file",
        "file_info",
        "search",
        "replace_text",
    ];

    const ENVIRONMENT_TOOLS: &[&str] = &[
        "get_current_directory",
        "get_system_info",
        "get_project_info",
        "get_working_context",
        "get_smart_context",
    ];

    #[test]
    fn test_builder_creates_registry() {
        let temp_dir = tempdir().unwrap();
        let registry = ToolRegistryBuilder::new(temp_dir.path().to_path_buf()).build();

        for name in FILESYSTEM_TOOLS.iter().chain(ENVIRONMENT_TOOLS) {
            assert!(registry.get(name).is_some(), "missing tool {}", name);
        }
        assert!(registry.get("execute_command").is_some());
        assert_eq!(registry.len(), FILESYSTEM_TOOLS.len() + ENVIRONMENT_TOOLS.len() + 1);
    }

    #[test]
    fn test_builder_toggles() {
        let temp_dir = tempdir().unwrap();
        let registry = ToolRegistryBuilder::new(temp_dir.path().to_path_buf())
            .with_shell(false)
            .with_environment(false)
            .build();

        assert!(registry.get("execute_command").is_none());
        assert!(registry.get("get_system_info").is_none());
        assert_eq!(registry.len(), FILESYSTEM_TOOLS.len());
    }

    #[test]
    fn test_definitions_have_object_schemas() {
        let temp_dir = tempdir().unwrap();
        let tracker = Arc::new(ActivityTracker::new());
        let registry = create_standard_tool_registry(temp_dir.path(), tracker);

        for definition in registry.definitions() {
            assert_eq!(definition.parameters["type"], "object", "{}", definition.name);
            assert!(!definition.description.is_empty());
        }
    }
}
