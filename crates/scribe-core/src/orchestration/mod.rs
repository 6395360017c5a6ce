//! Orchestration: the system prompt, the standard tool set, and the turn runner

mod agent_loop;
mod system_prompt;
mod tool_registry;

pub use agent_loop::{RetryPolicy, TurnEvent, TurnObserver, TurnRunner};
pub use system_prompt::{ensure_system_message, SystemPrompt, DEFAULT_SYSTEM_PROMPT};
pub use tool_registry::{create_standard_tool_registry, ToolRegistryBuilder};
