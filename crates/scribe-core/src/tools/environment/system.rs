//! System information tool

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

/// Environment variables worth showing the model
const REPORTED_ENV_VARS: &[&str] = &["PATH", "HOME", "SHELL", "CARGO_HOME", "GOPATH", "PWD"];

/// PATH entries shown before eliding the rest
const MAX_PATH_ENTRIES: usize = 5;

/// Tool reporting OS, architecture, host and selected environment variables
#[derive(Default)]
pub struct GetSystemInfo;

impl GetSystemInfo {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for GetSystemInfo {
    fn name(&self) -> &str {
        "get_system_info"
    }

    fn description(&self) -> &str {
        "Get system information: operating system, architecture, CPU count, host, user and key environment variables."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn execute(&self, _params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move { Ok(describe_system()) })
    }
}

fn cpu_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

fn username() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.is_empty())
}

/// Full system report
pub fn describe_system() -> String {
    let mut out = String::from("=== System Information ===\n");
    out.push_str(&format!("Operating System: {}\n", std::env::consts::OS));
    out.push_str(&format!("Architecture: {}\n", std::env::consts::ARCH));
    out.push_str(&format!("OS Family: {}\n", std::env::consts::FAMILY));
    out.push_str(&format!("CPU Cores: {}\n", cpu_count()));
    if let Some(host) = hostname() {
        out.push_str(&format!("Hostname: {}\n", host));
    }
    if let Some(user) = username() {
        out.push_str(&format!("Current User: {}\n", user));
    }

    out.push_str("\n=== Environment Variables ===\n");
    for name in REPORTED_ENV_VARS {
        let Ok(value) = std::env::var(name) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if *name == "PATH" {
            out.push_str(&format!("PATH: {}\n", abbreviate_path_var(&value)));
        } else {
            out.push_str(&format!("{}: {}\n", name, value));
        }
    }
    out
}

/// One-line host summary used by the working context report
pub fn system_summary() -> String {
    let mut line = format!(
        "OS: {}/{} | CPU: {} cores",
        std::env::consts::OS,
        std::env::consts::ARCH,
        cpu_count()
    );
    if let Some(host) = hostname() {
        line.push_str(&format!(" | Host: {}", host));
    }
    line
}

fn abbreviate_path_var(value: &str) -> String {
    let entries: Vec<_> = std::env::split_paths(value).collect();
    if entries.len() <= MAX_PATH_ENTRIES {
        return value.to_string();
    }
    let shown = std::env::join_paths(&entries[..MAX_PATH_ENTRIES])
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{} ... (and {} more)", shown, entries.len() - MAX_PATH_ENTRIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_names_platform() {
        let report = describe_system();
        assert!(report.contains(std::env::consts::OS));
        assert!(report.contains("CPU Cores:"));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_is_abbreviated() {
        let path = "/a:/b:/c:/d:/e:/f:/g";
        assert_eq!(abbreviate_path_var(path), "/a:/b:/c:/d:/e ... (and 2 more)");
        assert_eq!(abbreviate_path_var("/a:/b"), "/a:/b");
    }
}
