//! Wiring of the core components for one CLI run

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use scribe_core::orchestration::ToolRegistryBuilder;
use scribe_core::tools::shell::ShellConfig;
use scribe_core::{
    ActivityTracker, ChatProvider, ConfigManager, ProviderClient, RetryPolicy, SessionStore,
    SystemPrompt, ToolRegistry, TurnRunner,
};

use crate::interrupt::TurnInterrupt;
use crate::progress::TurnProgress;

/// Everything an interactive or one-shot run needs, built once in `main`
pub struct App {
    pub workspace: PathBuf,
    pub config: ConfigManager,
    pub client: Arc<ProviderClient>,
    pub runner: TurnRunner,
    pub store: SessionStore,
    pub tracker: Arc<ActivityTracker>,
    pub progress: TurnProgress,
    pub interrupt: TurnInterrupt,
}

impl App {
    pub fn new(workspace: PathBuf, config: ConfigManager, provider: Option<&str>) -> anyhow::Result<Self> {
        let client = Arc::new(ProviderClient::from_config(&config)?);
        if let Some(name) = provider {
            client.switch_provider(name)?;
        }

        let tracker = Arc::new(load_tracker(&config.context_path()));
        tracker.update_current_project(&workspace);

        let registry = Arc::new(build_registry(&workspace, &config, tracker.clone()));
        let progress = TurnProgress::new(config.config().ui.compact_mode);

        let provider: Arc<dyn ChatProvider> = client.clone();
        let runner = TurnRunner::new(provider, registry)
            .with_system_prompt(SystemPrompt::new().with_workspace_context(&workspace).build())
            .with_retry_policy(RetryPolicy::from_settings(&config.config().session))
            .with_tracker(tracker.clone())
            .with_observer(progress.observer());

        let store = SessionStore::new(config.sessions_dir(), &workspace)?;

        let interrupt = TurnInterrupt::new();
        interrupt.watch();

        Ok(Self {
            workspace,
            config,
            client,
            runner,
            store,
            tracker,
            progress,
            interrupt,
        })
    }

    /// Run one user turn against the active session. Ctrl-C cancels it.
    pub async fn run_turn(&mut self, input: &str) -> scribe_core::Result<String> {
        let cancel = self.interrupt.begin();
        self.progress.start("Thinking...");
        let result = self
            .runner
            .run_turn(self.store.current_mut(), input, &cancel)
            .await;
        self.progress.finish();
        self.interrupt.end();

        if let Err(e) = self.store.save_current() {
            warn!("Failed to save session: {}", e);
        }
        result
    }

    /// Final checkpoint: active session and tracker state
    pub fn shutdown(&self) {
        if let Err(e) = self.store.save_current() {
            warn!("Failed to save session: {}", e);
        }
        if let Err(e) = self.tracker.save(&self.config.context_path()) {
            warn!("Failed to save activity context: {}", e);
        }
    }
}

/// Registry without a provider, for commands that only list tools
pub fn standalone_registry(workspace: &Path, config: &ConfigManager) -> ToolRegistry {
    build_registry(workspace, config, Arc::new(ActivityTracker::new()))
}

fn build_registry(workspace: &Path, config: &ConfigManager, tracker: Arc<ActivityTracker>) -> ToolRegistry {
    let shell = ShellConfig::default().with_timeout(config.config().session.tool_timeout_secs);
    ToolRegistryBuilder::new(workspace.to_path_buf())
        .with_shell_config(shell)
        .with_tracker(tracker)
        .build()
}

fn load_tracker(path: &Path) -> ActivityTracker {
    ActivityTracker::load(path).unwrap_or_else(|e| {
        warn!("Ignoring unreadable activity context {:?}: {}", path, e);
        ActivityTracker::new()
    })
}
