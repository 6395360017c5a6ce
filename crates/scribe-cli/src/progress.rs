//! Spinner and tool progress lines shown while a turn runs

use std::sync::Arc;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

use scribe_core::orchestration::TurnObserver;
use scribe_core::TurnEvent;

/// Shared handle to the spinner of the turn in flight
#[derive(Clone, Default)]
pub struct TurnProgress {
    bar: Arc<Mutex<Option<ProgressBar>>>,
    compact: bool,
}

impl TurnProgress {
    pub fn new(compact: bool) -> Self {
        Self {
            bar: Arc::default(),
            compact,
        }
    }

    pub fn start(&self, message: &str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock() = Some(bar);
    }

    pub fn finish(&self) {
        if let Some(bar) = self.bar.lock().take() {
            bar.finish_and_clear();
        }
    }

    /// Observer to hand to the turn runner
    pub fn observer(&self) -> TurnObserver {
        let progress = self.clone();
        Arc::new(move |event: &TurnEvent| progress.on_event(event))
    }

    fn on_event(&self, event: &TurnEvent) {
        let guard = self.bar.lock();
        let Some(bar) = guard.as_ref() else {
            return;
        };

        match event {
            TurnEvent::ToolsStarted { count } => {
                bar.set_message(format!("Running {} tool(s)...", count));
            }
            TurnEvent::ToolFinished { name, success, error } => {
                if self.compact {
                    return;
                }
                if *success {
                    bar.println(format!("  {} {}", style("✓").green(), style(name).dim()));
                } else {
                    bar.println(format!(
                        "  {} {} {}",
                        style("✗").red(),
                        style(name).yellow(),
                        style(error.as_deref().unwrap_or("failed")).dim()
                    ));
                }
            }
            TurnEvent::ToolsCompleted { succeeded, failed } => {
                bar.set_message(format!(
                    "{} tool(s) succeeded, {} failed. Waiting for the model...",
                    succeeded, failed
                ));
            }
            TurnEvent::Retrying { attempt, max } => {
                bar.println(format!(
                    "  {}",
                    style(format!("Request failed, retrying ({}/{})", attempt, max)).yellow()
                ));
            }
        }
    }
}
