//! The lifetime scope of one active screen.
//!
//! A [Session] owns every task launched on its behalf. Closing the session,
//! or dropping its last handle, aborts whatever is still running.

use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use tokio::{sync::watch, task::JoinSet};

/// Owns the in-flight operation tasks of one screen session.
///
/// Requires a Tokio runtime.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    tasks: Mutex<Option<JoinSet<()>>>,
    in_flight: watch::Sender<usize>,
}

/// Decrements the in-flight count when the task finishes or is aborted.
struct InFlightGuard(watch::Sender<usize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|count| *count = count.saturating_sub(1));
    }
}

impl Session {
    /// Open a new session.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                tasks: Mutex::new(Some(JoinSet::new())),
                in_flight: watch::Sender::new(0),
            }),
        }
    }

    /// Launch `task` within the session.
    ///
    /// Does nothing if the session has been closed.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(mut tasks) = self.inner.tasks.lock() else {
            tracing::error!("Could not acquire the session task lock, dropping task");
            return;
        };

        let Some(tasks) = tasks.as_mut() else {
            tracing::debug!("Session is closed, dropping task");
            return;
        };

        // Reap finished tasks so the set does not grow without bound.
        while tasks.try_join_next().is_some() {}

        self.inner.in_flight.send_modify(|count| *count += 1);
        let guard = InFlightGuard(self.inner.in_flight.clone());

        tasks.spawn(async move {
            let _guard = guard;
            task.await;
        });
    }

    /// The number of tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        *self.inner.in_flight.borrow()
    }

    /// Wait until every task in the session has finished, including tasks
    /// that were launched by other tasks while waiting.
    pub async fn settle(&self) {
        let mut in_flight = self.inner.in_flight.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = in_flight.wait_for(|count| *count == 0).await;
    }

    /// End the session, aborting all tasks that are still running.
    pub fn close(&self) {
        let tasks = match self.inner.tasks.lock() {
            Ok(mut tasks) => tasks.take(),
            Err(_) => {
                tracing::error!("Could not acquire the session task lock while closing");
                return;
            }
        };

        if let Some(mut tasks) = tasks {
            tracing::debug!("Closing session with {} task(s)", tasks.len());
            tasks.abort_all();
        }
    }

    /// Whether [Session::close] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner
            .tasks
            .lock()
            .map(|tasks| tasks.is_none())
            .unwrap_or(true)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
