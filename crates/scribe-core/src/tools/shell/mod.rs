//! Shell tools for command execution

mod execute;

pub use execute::ExecuteCommand;

use std::collections::HashSet;

/// Default command timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Limits applied to command execution
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Program names that are refused outright
    pub blocked_programs: HashSet<String>,
    /// Timeout used when the call does not supply one
    pub timeout_seconds: u64,
}

impl ShellConfig {
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn is_blocked(&self, program: &str) -> bool {
        let name = std::path::Path::new(program)
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.blocked_programs.contains(&name)
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        let blocked = [
            "sudo", "su", "doas", "mkfs", "dd", "shutdown", "reboot", "halt", "format",
            "bcdedit", "diskpart",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            blocked_programs: blocked,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_by_program_name() {
        let config = ShellConfig::default();
        assert!(config.is_blocked("sudo"));
        assert!(config.is_blocked("/usr/bin/sudo"));
        assert!(!config.is_blocked("echo"));
    }
}
