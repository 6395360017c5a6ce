//! Turn runner
//!
//! One user turn against the model:
//!
//! ```text
//! user message ─▶ chat ─┬─ no tool calls ─▶ assistant message ─▶ done
//!                       └─ tool calls ─▶ execute each ─▶ tool messages
//!                                          ─▶ follow-up chat (retried) ─▶ assistant message
//! ```
//!
//! The first request is not retried. The follow-up is retried with a linear
//! backoff. Tool executions are never retried.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SessionSettings;
use crate::context::ActivityTracker;
use crate::error::{Error, Result};
use crate::provider::{ChatProvider, ChatResponse, Message, ToolCall};
use crate::session::Session;
use crate::tools::{ToolDefinition, ToolParams, ToolRegistry, ToolResult};

use super::system_prompt::{ensure_system_message, SystemPrompt};

/// Tools whose path argument is worth remembering as a recent file
const FILE_TOOLS: &[&str] = &[
    "read_file",
    "write_file",
    "edit_file",
    "replace_text",
    "file_info",
    "copy_file",
    "move_file",
    "rename_file",
];

/// Argument keys naming the file a tool touched, most specific first
const PATH_KEYS: &[&str] = &["file_path", "dst_path", "new_path", "path"];

/// Retry settings for the follow-up request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure
    pub max_retries: u32,
    /// Delay before retry `n` is `backoff_base * n`
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            backoff_base: Duration::from_millis(settings.retry_backoff_ms),
        }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff_base * attempt
    }
}

/// Progress notifications emitted while a turn runs
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    ToolsStarted { count: usize },
    ToolFinished { name: String, success: bool, error: Option<String> },
    ToolsCompleted { succeeded: usize, failed: usize },
    Retrying { attempt: u32, max: u32 },
}

pub type TurnObserver = Arc<dyn Fn(&TurnEvent) + Send + Sync>;

/// Runs user turns: provider calls, tool dispatch and transcript updates
pub struct TurnRunner {
    provider: Arc<dyn ChatProvider>,
    registry: Arc<ToolRegistry>,
    system_prompt: String,
    retry: RetryPolicy,
    tracker: Option<Arc<ActivityTracker>>,
    observer: Option<TurnObserver>,
}

impl TurnRunner {
    pub fn new(provider: Arc<dyn ChatProvider>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            registry,
            system_prompt: SystemPrompt::new().build(),
            retry: RetryPolicy::default(),
            tracker: None,
            observer: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Record executed tools and touched files in `tracker`
    pub fn with_tracker(mut self, tracker: Arc<ActivityTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn with_observer(mut self, observer: TurnObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one turn and return the assistant's final text.
    ///
    /// On error the transcript keeps everything appended so far: the user
    /// message and, if tools ran, the tool-call message and its tool results.
    pub async fn run_turn(
        &self,
        session: &mut Session,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        session.add_message(Message::user(input));
        let definitions = self.registry.definitions();

        let response = self.chat(session, &definitions, cancel).await.map_err(|e| match e {
            Error::Cancelled | Error::Provider(_) => e,
            other => Error::Provider(other.to_string()),
        })?;

        if !response.has_tool_calls() {
            session.add_message(Message::assistant(response.content.clone()));
            return Ok(response.content);
        }

        let calls = response.tool_calls;
        info!(count = calls.len(), "Model requested tool calls");
        session.add_message(Message::assistant_with_tool_calls(response.content, calls.clone()));
        self.execute_tools(session, &calls, cancel).await;

        let follow_up = self.follow_up(session, &definitions, cancel).await?;
        if follow_up.has_tool_calls() {
            debug!(
                count = follow_up.tool_calls.len(),
                "Ignoring tool calls in follow-up response"
            );
        }
        session.add_message(Message::assistant(follow_up.content.clone()));
        Ok(follow_up.content)
    }

    async fn chat(
        &self,
        session: &Session,
        definitions: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        let mut request = session.messages.clone();
        ensure_system_message(&mut request, &self.system_prompt);
        self.provider.chat(&request, definitions, cancel).await
    }

    async fn execute_tools(&self, session: &mut Session, calls: &[ToolCall], cancel: &CancellationToken) {
        self.emit(TurnEvent::ToolsStarted { count: calls.len() });

        let (mut succeeded, mut failed) = (0, 0);
        for call in calls {
            let result = self.registry.execute(call, cancel).await;
            if result.is_success() {
                succeeded += 1;
            } else {
                failed += 1;
            }
            self.track(call, &result);
            self.emit(TurnEvent::ToolFinished {
                name: result.tool_name.clone(),
                success: result.is_success(),
                error: result.output.as_ref().err().map(|e| e.to_string()),
            });
            session.add_message(result.to_message());
        }

        self.emit(TurnEvent::ToolsCompleted { succeeded, failed });
    }

    async fn follow_up(
        &self,
        session: &Session,
        definitions: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        let mut attempt = 0;
        loop {
            match self.chat(session, definitions, cancel).await {
                Ok(response) => return Ok(response),
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) if attempt >= self.retry.max_retries => {
                    return Err(Error::RetriesExhausted {
                        retries: self.retry.max_retries,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    warn!(
                        attempt,
                        max = self.retry.max_retries,
                        "Follow-up request failed, retrying in {:?}: {}",
                        delay,
                        e
                    );
                    self.emit(TurnEvent::Retrying {
                        attempt,
                        max: self.retry.max_retries,
                    });
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                    }
                }
            }
        }
    }

    fn track(&self, call: &ToolCall, result: &ToolResult) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        tracker.record_action(&call.function.name);

        if !result.is_success() || !FILE_TOOLS.contains(&call.function.name.as_str()) {
            return;
        }
        let Ok(params) = ToolParams::from_arguments(call.function.arguments.clone()) else {
            return;
        };
        let touched = PATH_KEYS
            .iter()
            .find_map(|key| params.opt_str(key).ok().flatten());
        if let Some(path) = touched {
            tracker.add_recent_file(path);
        }
    }

    fn emit(&self, event: TurnEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_secs(1));
        assert_eq!(policy.delay(2), Duration::from_secs(2));

        let settings = SessionSettings {
            max_retries: 3,
            retry_backoff_ms: 250,
            ..SessionSettings::default()
        };
        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.max_retries, 3);
        let delays: Vec<Duration> = (1..=3).map(|n| policy.delay(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_millis(750),
            ]
        );
    }
}
