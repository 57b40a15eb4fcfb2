//! Bounded background execution of submitted work.
//!
//! `submit` registers a task, hands the work to a spawned supervisor, and
//! returns the submit id immediately. The supervisor acquires a semaphore
//! permit (bounding concurrency), drives the work to completion, and
//! performs exactly one terminal transition on the registry. Errors and
//! panics both land as `Failed`; a process crash is the only way a task can
//! stay `Running` forever.

use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::task::registry::TaskRegistry;

/// Executes submitted work off the request path with bounded concurrency.
pub struct TaskRunner {
    registry: Arc<TaskRegistry>,
    permits: Arc<Semaphore>,
}

impl TaskRunner {
    /// Create a runner over the given registry with at most
    /// `max_concurrency` work items executing at once.
    pub fn new(registry: Arc<TaskRegistry>, max_concurrency: usize) -> Self {
        Self {
            registry,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// The registry this runner transitions tasks in.
    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Register a task and schedule `work` without blocking the caller.
    ///
    /// Exactly one terminal transition is produced per submission: `Ok`
    /// becomes `complete`, `Err` becomes `fail` with the error's display
    /// form, and a panic inside the work is caught and recorded as `fail`.
    /// There is no cancellation primitive; once running, work runs to
    /// completion or failure.
    pub fn submit<F, E>(&self, work: F) -> Uuid
    where
        F: Future<Output = Result<serde_json::Value, E>> + Send + 'static,
        E: Display,
    {
        let submit_id = self.registry.register();
        let registry = Arc::clone(&self.registry);
        let permits = Arc::clone(&self.permits);

        tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // Semaphore closed: runner torn down while work was queued.
                    let _ = registry.fail(submit_id, "worker pool shut down".to_string());
                    return;
                }
            };

            debug!(%submit_id, "task picked up by worker");
            let transition = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(Ok(result)) => registry.complete(submit_id, result),
                Ok(Err(error)) => registry.fail(submit_id, error.to_string()),
                Err(panic) => registry.fail(
                    submit_id,
                    format!("task panicked: {}", panic_message(panic.as_ref())),
                ),
            };

            // Single-writer invariant: the supervisor is the only caller of
            // complete/fail, so a rejection here is a bug worth logging.
            if let Err(error) = transition {
                warn!(%submit_id, %error, "terminal transition rejected");
            }
        });

        submit_id
    }
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
