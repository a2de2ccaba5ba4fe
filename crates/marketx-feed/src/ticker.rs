//! Periodic background loop with an explicit stop handle.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Shortest period a ticker will run at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A spawned loop calling `tick` once per period.
///
/// The first tick fires immediately. Dropping the ticker stops it.
pub struct Ticker {
    name: String,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a loop on the current runtime.
    ///
    /// The loop ends when `tick` returns `ControlFlow::Break` or the ticker
    /// is stopped. Each tick is awaited before the next one is scheduled;
    /// slow ticks delay the schedule instead of bunching up.
    pub fn spawn<F, Fut>(name: &str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    debug!("{task_name}: loop finished");
                    break;
                }
            }
        });
        debug!("{name}: started (every {period:?})");
        Self {
            name: name.to_string(),
            handle,
        }
    }

    /// Abort the loop. Safe to call more than once.
    pub fn stop(&self) {
        if !self.handle.is_finished() {
            info!("{}: stopped", self.name);
        }
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("name", &self.name)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
