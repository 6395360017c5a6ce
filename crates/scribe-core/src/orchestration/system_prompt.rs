//! System prompt management
//!
//! Provides a single source of truth for the system prompt and the rule for
//! placing it at the head of a conversation.

use crate::provider::{Message, Role};

/// System prompt configuration and generation
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    /// Base system prompt
    base: String,
    /// Additional context (e.g., workspace info)
    context: Option<String>,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPrompt {
    /// Create a new system prompt with the default content
    pub fn new() -> Self {
        Self {
            base: DEFAULT_SYSTEM_PROMPT.to_string(),
            context: None,
        }
    }

    /// Create with a custom base prompt
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            context: None,
        }
    }

    /// Add workspace context to the prompt
    pub fn with_workspace_context(mut self, workspace_path: &std::path::Path) -> Self {
        let context = format!(
            "\n\n## Current Workspace\nYou are working in: {}",
            workspace_path.display()
        );
        self.context = Some(context);
        self
    }

    /// Add custom context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build the final system prompt
    pub fn build(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{}{}", self.base, ctx),
            None => self.base.clone(),
        }
    }

    /// Get the base prompt without context
    pub fn base(&self) -> &str {
        &self.base
    }
}

/// Put `prompt` at index 0 unless the conversation already starts with a system message.
///
/// Applying it repeatedly leaves exactly one system message.
pub fn ensure_system_message(messages: &mut Vec<Message>, prompt: &str) -> bool {
    if messages.first().is_some_and(|m| m.role == Role::System) {
        return false;
    }
    messages.insert(0, Message::system(prompt));
    true
}

/// Default system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are Scribe, an AI assistant working in the user's terminal. You help with software engineering and writing tasks by reading and changing files in the current workspace.

## Available Tools

### File Operations
- read_file: Read a file's contents
- write_file: Create or overwrite a file (parent directories are created)
- edit_file: Replace text (old_text/new_text) or a 1-based line range (start_line, end_line, new_content)
- list_files: List a directory
- create_directory, delete_file, rename_file, copy_file, move_file: Manage files and directories
- file_info: Size, permissions and modification time
- search: Find text in files (plain or regex, optional file name glob)
- replace_text: Replace every occurrence of a pattern in a file

### Commands
- execute_command: Run a program in the workspace. Arguments are split on whitespace; pipes and redirects are not supported.

### Environment
- get_current_directory, get_system_info, get_project_info: Inspect the environment
- get_working_context: All of the above in one call
- get_smart_context: Recent activity in this project and suggested next steps

## Guidelines

1. Look before you change: read files and inspect the project before editing.
2. Prefer edit_file over write_file for changes to existing files.
3. After changing files, verify the result (read the file back or run the tests).
4. When tool results arrive, summarize them for the user instead of repeating the same call.

Be concise and helpful. Ask for clarification when a request is ambiguous."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_context_appended() {
        let prompt = SystemPrompt::new()
            .with_workspace_context(std::path::Path::new("/work/demo"))
            .build();
        assert!(prompt.starts_with("You are Scribe"));
        assert!(prompt.ends_with("You are working in: /work/demo"));
    }

    #[test]
    fn test_ensure_system_message_is_idempotent() {
        let mut messages = vec![Message::user("hello")];
        assert!(ensure_system_message(&mut messages, "system"));
        assert!(!ensure_system_message(&mut messages, "system"));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages.iter().filter(|m| m.role == Role::System).count(), 1);
    }
}
