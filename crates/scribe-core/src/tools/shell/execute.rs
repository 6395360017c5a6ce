//! Execute command tool

use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::ShellConfig;

/// Tool for running a program in the workspace
///
/// The command line is split on whitespace and run directly, without a
/// shell, so pipes, redirects and quoting are not interpreted. The child is
/// killed when the call times out or is cancelled.
pub struct ExecuteCommand {
    config: ShellConfig,
    workspace: PathBuf,
}

impl ExecuteCommand {
    pub fn new(workspace: PathBuf) -> Self {
        Self {
            config: ShellConfig::default(),
            workspace,
        }
    }

    pub fn with_config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }
}

impl Tool for ExecuteCommand {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Run a command in the workspace directory and return its combined stdout and stderr. \
         The command is split on whitespace and executed directly (no shell features such as pipes)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Command line to execute, e.g. 'cargo test'"
                },
                "timeout": {
                    "type": "integer",
                    "description": format!("Timeout in seconds (default: {})", self.config.timeout_seconds),
                    "default": self.config.timeout_seconds
                }
            },
            "required": ["command"]
        })
    }

    fn execute(&self, params: ToolParams, cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let command = params.require_str("command")?;
            let timeout = params
                .opt_u64("timeout")?
                .filter(|t| *t > 0)
                .unwrap_or(self.config.timeout_seconds);

            let mut argv = command.split_whitespace();
            let program = argv
                .next()
                .ok_or_else(|| ToolError::InvalidParams("command must not be empty".into()))?;

            if self.config.is_blocked(program) {
                return Err(ToolError::PermissionDenied(format!(
                    "program '{}' is blocked",
                    program
                )));
            }

            debug!(command, timeout, "Running command");
            let child = Command::new(program)
                .args(argv)
                .current_dir(&self.workspace)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| ToolError::ExecutionFailed(format!("failed to start '{}': {}", program, e)))?;

            let output = tokio::select! {
                result = child.wait_with_output() => result?,
                _ = tokio::time::sleep(Duration::from_secs(timeout)) => {
                    return Err(ToolError::ExecutionFailed(format!(
                        "Command timed out after {}s",
                        timeout
                    )));
                }
                _ = cancel.cancelled() => return Err(ToolError::Cancelled),
            };

            let mut text = String::from_utf8_lossy(&output.stdout).to_string();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            if !output.status.success() {
                text.push_str(&format!("\nError: command exited with {}", output.status));
            }
            Ok(text)
        })
    }
}
