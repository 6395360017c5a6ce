//! Shell tool tests
//!
//! Tests for ExecuteCommand: output capture, exit status, timeouts and cancellation.

use scribe_core::error::ToolError;
use scribe_core::tools::shell::{ExecuteCommand, ShellConfig};
use scribe_core::tools::{Tool, ToolParams};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Create a test workspace
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "Hello, World!").unwrap();
    dir
}

fn params(value: Value) -> ToolParams {
    ToolParams::from_arguments(value).unwrap()
}

#[cfg(unix)]
mod execute_command_tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_echo() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());

        let output = tool
            .execute(params(json!({"command": "echo Hello Test"})), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "Hello Test\n");
    }

    #[tokio::test]
    async fn test_runs_in_workspace() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());

        let output = tool
            .execute(params(json!({"command": "cat test.txt"})), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "Hello, World!");
    }

    #[tokio::test]
    async fn test_no_shell_interpretation() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());

        let output = tool
            .execute(params(json!({"command": "echo a | wc"})), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(output, "a | wc\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_success_text() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());

        let output = tool
            .execute(params(json!({"command": "ls does-not-exist"})), CancellationToken::new())
            .await
            .unwrap();
        assert!(output.contains("does-not-exist"));
        assert!(output.contains("Error: command exited with"));
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());

        let result = tool
            .execute(
                params(json!({"command": "definitely-not-a-real-program-xyz"})),
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(ToolError::ExecutionFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_command_rejected() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());

        let result = tool
            .execute(params(json!({"command": "   "})), CancellationToken::new())
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_blocked_program() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());

        let result = tool
            .execute(params(json!({"command": "sudo ls"})), CancellationToken::new())
            .await;
        assert!(matches!(result, Err(ToolError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf())
            .with_config(ShellConfig::default().with_timeout(1));

        let result = tool
            .execute(params(json!({"command": "sleep 5"})), CancellationToken::new())
            .await;
        match result {
            Err(ToolError::ExecutionFailed(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancellation() {
        let dir = setup_workspace();
        let tool = ExecuteCommand::new(dir.path().to_path_buf());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result = tool.execute(params(json!({"command": "sleep 10"})), cancel).await;
        assert!(matches!(result, Err(ToolError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
