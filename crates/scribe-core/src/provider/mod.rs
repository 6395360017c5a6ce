//! LLM provider abstraction
//!
//! The orchestration loop only sees [`ChatProvider`]. Concrete backends:
//! - [`OpenAiCompatProvider`]: one HTTP endpoint speaking the OpenAI wire format
//! - [`ProviderClient`]: the switchable front that owns the active backend

mod client;
mod kind;
mod message;
mod openai_compat;

pub use client::ProviderClient;
pub use kind::ProviderKind;
pub use message::{FunctionCall, Message, Role, ToolCall};
pub use openai_compat::{OpenAiCompatProvider, ProviderSettings};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::tools::ToolDefinition;

/// What the model produced for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A chat-completion backend
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name (e.g., "zhipu", "deepseek")
    fn name(&self) -> String;

    /// Send the history and tool schema; fails with a transport error the caller may retry
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ChatResponse>;
}
