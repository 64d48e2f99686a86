use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Cooperative stop signal checked between gateway calls.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancel from a watchdog thread once `limit` has elapsed.
    pub fn cancel_after(&self, limit: Duration) {
        let token = self.clone();
        thread::spawn(move || {
            thread::sleep(limit);
            tracing::info!(limit_secs = limit.as_secs(), "time limit reached, cancelling run");
            token.cancel();
        });
    }
}
