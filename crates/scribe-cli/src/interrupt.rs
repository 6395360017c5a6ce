//! Ctrl-C routing
//!
//! Once `tokio::signal::ctrl_c` is first awaited, the process no longer dies
//! on SIGINT, so a single watcher owns the signal for the whole run. During a
//! turn it cancels that turn; otherwise it exits the way SIGINT would.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Exit status for a process terminated by SIGINT
const SIGINT_EXIT_CODE: i32 = 130;

/// Slot holding the cancellation token of the turn in flight
#[derive(Clone, Default)]
pub struct TurnInterrupt {
    active: Arc<Mutex<Option<CancellationToken>>>,
}

impl TurnInterrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a new turn; Ctrl-C cancels it until [`TurnInterrupt::end`]
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.active.lock() = Some(token.clone());
        token
    }

    pub fn end(&self) {
        self.active.lock().take();
    }

    /// Cancel the active turn. Returns false when no turn is running.
    pub fn interrupt(&self) -> bool {
        match self.active.lock().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Spawn the process-wide watcher. Call once per run.
    pub fn watch(&self) {
        let interrupt = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if interrupt.interrupt() {
                    debug!("Cancelled running turn");
                } else {
                    std::process::exit(SIGINT_EXIT_CODE);
                }
            }
        });
    }
}
