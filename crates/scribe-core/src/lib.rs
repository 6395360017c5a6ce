//! Scribe Core - tool-calling assistant engine
//!
//! This crate provides the core functionality for the Scribe CLI:
//! - Tool system for file, search, shell and environment operations
//! - OpenAI-compatible provider client with switchable backends
//! - Session persistence
//! - The turn runner that drives model calls and tool execution
//! - Configuration and activity tracking

pub mod config;
pub mod context;
pub mod error;
pub mod orchestration;
pub mod provider;
pub mod session;
pub mod tools;

pub use config::{AiConfig, Config, ConfigManager, ModelConfig, SessionSettings, UiConfig};
pub use context::ActivityTracker;
pub use error::{Error, Result, ToolError};
pub use provider::{
    ChatProvider, ChatResponse, Message, OpenAiCompatProvider, ProviderClient, ProviderKind, Role,
    ToolCall,
};
pub use tools::{Tool, ToolDefinition, ToolParams, ToolRegistry, ToolResult};

// Orchestration exports
pub use orchestration::{
    create_standard_tool_registry, RetryPolicy, SystemPrompt, ToolRegistryBuilder, TurnEvent,
    TurnRunner,
};

// Session exports
pub use session::{Session, SessionContext, SessionStore};
