//! Tool system for Scribe
//!
//! Tools are the actions the model can take. Each tool has:
//! - A name and description for the LLM
//! - A JSON schema for parameters
//! - An execute method returning text or a [`ToolError`]

pub mod environment;
pub mod filesystem;
mod params;
pub mod shell;

pub use params::ToolParams;

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::provider::{Message, ToolCall};

/// Boxed future type for object-safe async trait methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Tool definition for LLM consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Core trait for all tools
pub trait Tool: Send + Sync {
    /// Tool name (used by LLM to invoke)
    fn name(&self) -> &str;

    /// Description of what the tool does
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool. An empty string is a valid success result.
    fn execute(&self, params: ToolParams, cancel: CancellationToken)
        -> BoxFuture<'_, Result<String, ToolError>>;

    /// Convert to tool definition for LLM
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Outcome of one tool call, tagged with the call's correlation id
#[derive(Debug)]
pub struct ToolResult {
    pub tool_name: String,
    pub call_id: String,
    pub output: Result<String, ToolError>,
}

impl ToolResult {
    pub fn is_success(&self) -> bool {
        self.output.is_ok()
    }

    /// Text sent back to the model
    pub fn content(&self) -> String {
        match &self.output {
            Ok(text) => text.clone(),
            Err(e) => format!("Error: {}", e),
        }
    }

    /// `tool` message answering the originating call
    pub fn to_message(&self) -> Message {
        Message::tool_result(self.call_id.clone(), self.content())
    }
}

/// Registry of available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        if let Some(previous) = self.tools.insert(tool.name().to_string(), tool) {
            debug!("Replaced tool registration: {}", previous.name());
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions for every registered tool, in no particular order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute one call. Never fails: every fault becomes an error result carrying the call id.
    pub async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let output = self.dispatch(call, cancel).await;
        if let Err(e) = &output {
            warn!(tool = %call.function.name, call_id = %call.id, "Tool failed: {}", e);
        }
        ToolResult {
            tool_name: call.function.name.clone(),
            call_id: call.id.clone(),
            output,
        }
    }

    /// Execute calls one at a time, in order, producing exactly one result per call
    pub async fn execute_all(&self, calls: &[ToolCall], cancel: &CancellationToken) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call, cancel).await);
        }
        results
    }

    async fn dispatch(&self, call: &ToolCall, cancel: &CancellationToken) -> Result<String, ToolError> {
        if call.kind != ToolCall::FUNCTION {
            return Err(ToolError::InvalidParams(format!(
                "unsupported tool call type: {}",
                call.kind
            )));
        }

        let tool = self
            .get(&call.function.name)
            .ok_or_else(|| ToolError::NotFound(call.function.name.clone()))?;

        let params = ToolParams::from_arguments(call.function.arguments.clone())?;

        if cancel.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        debug!(tool = %call.function.name, call_id = %call.id, "Executing tool");
        AssertUnwindSafe(tool.execute(params, cancel.clone()))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ToolError::ExecutionFailed(format!(
                    "tool panicked: {}",
                    panic_message(panic.as_ref())
                )))
            })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
