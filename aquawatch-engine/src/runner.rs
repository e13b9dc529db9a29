//! Periodic tick driver for the engine.
//!
//! A single spawned task advances the simulation at a fixed interval. There
//! are no concurrent tickers: stopping aborts the task, and a restart resumes
//! from current state rather than recomputing history.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::engine::WaterEngine;

/// Handle to a running tick task.
pub struct TickHandle {
    task: tokio::task::JoinHandle<()>,
}

impl TickHandle {
    /// Stop the periodic tick. Engine state is left as-is.
    pub fn stop(self) {
        self.task.abort();
        info!("Tick loop stopped");
    }
}

/// Start driving `engine.tick()` every `interval_ms` milliseconds.
pub fn start(engine: Arc<WaterEngine>, interval_ms: u64) -> TickHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        // The first interval tick fires immediately; skip it so the baseline
        // snapshot survives one full interval.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            engine.tick();
        }
    });
    info!(interval_ms, "Tick loop started");
    TickHandle { task }
}
