//! Keep-alive registration for post-response background work.
//!
//! Cache warming must be allowed to run to completion after the client
//! response has already been returned. The tracker here is that hook: the
//! request handler registers the extract-then-warm task on it, and graceful
//! shutdown drains it before the process exits.

use std::future::Future;

use tokio_util::task::TaskTracker;

/// Handle for scheduling background tasks that outlive their request.
#[derive(Debug, Clone, Default)]
pub struct KeepAlive {
    tracker: TaskTracker,
}

impl KeepAlive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a background task. The task starts immediately and is
    /// independent of the client connection's lifetime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(task);
    }

    /// Stop accepting new tasks and wait until every registered task has
    /// settled.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
