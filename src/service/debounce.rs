//! Trailing-edge debouncing of rapid input.
//!
//! A [`Debouncer`] collapses a burst of calls into one invocation of its
//! action, made `delay` after the last call, with that call's argument.
//! Used for search input only; mutations are never debounced.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;

type Action<A> = Arc<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

/// Schedules an async action after a quiet period, cancelling any
/// previously scheduled invocation on each call.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<A> {
    delay: Duration,
    action: Action<A>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    /// Creates a debouncer running `action` after `delay` of inactivity.
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let action: Action<A> =
            Arc::new(move |args: A| -> BoxFuture<'static, ()> { action(args).boxed() });
        Self {
            delay,
            action,
            pending: Mutex::new(None),
        }
    }

    /// The quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules the action with `args`, replacing any pending invocation.
    ///
    /// Fire-and-forget: the action's completion is not observable here.
    pub fn call(&self, args: A) {
        let action = Arc::clone(&self.action);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach so that a later call cannot abort an action that has
            // already started.
            tokio::spawn(action(args));
        });
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drops the pending invocation, if any. Returns `true` if one was
    /// still waiting.
    pub fn cancel(&self) -> bool {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match pending {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl<A> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex as AsyncMutex;

    use super::*;

    fn recorder() -> (Arc<AsyncMutex<Vec<String>>>, Debouncer<String>) {
        let calls = Arc::new(AsyncMutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let debouncer = Debouncer::new(Duration::from_millis(500), move |term: String| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().await.push(term);
            }
        });
        (calls, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_call() {
        let (calls, debouncer) = recorder();
        for term in ["c", "ch", "chi", "chic", "chick", "chicke", "chicken"] {
            debouncer.call(term.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*calls.lock().await, vec!["chicken".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_quiet_period() {
        let (calls, debouncer) = recorder();
        debouncer.call("oats".to_string());
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(calls.lock().await.is_empty());
        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(calls.lock().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_calls_each_fire() {
        let (calls, debouncer) = recorder();
        debouncer.call("a".to_string());
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.call("b".to_string());
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*calls.lock().await, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_call() {
        let (calls, debouncer) = recorder();
        debouncer.call("rice".to_string());
        assert!(debouncer.cancel());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(calls.lock().await.is_empty());
        assert!(!debouncer.cancel());
    }
}
