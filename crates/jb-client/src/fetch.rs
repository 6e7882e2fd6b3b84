//! Observable fetch state.
//!
//! `Fetcher` wraps an async data load and exposes the `data`/`loading`/
//! `error` triple a view layer binds to. Errors are both stored in the
//! state and re-raised to the caller. Each call gets a generation number;
//! only the latest call commits its outcome, so a slow stale response can
//! never clobber the state of a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::ClientResult;

/// Snapshot of a fetcher's observable state.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    /// Last successfully loaded value. Kept across reloads until replaced.
    pub data: Option<T>,
    /// True while the latest call is in flight.
    pub loading: bool,
    /// Message of the last failure, cleared when a new call starts.
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Holds fetch state across calls.
pub struct Fetcher<T> {
    state: Mutex<FetchState<T>>,
    generation: AtomicU64,
}

impl<T: Clone> Default for Fetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Fetcher<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FetchState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot the current state.
    pub fn state(&self) -> FetchState<T> {
        self.lock().clone()
    }

    /// Last loaded value, if any.
    pub fn data(&self) -> Option<T> {
        self.lock().data.clone()
    }

    /// Whether the latest call is still in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Message of the last failure, if any.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Run a load. Marks the state loading and clears any previous error,
    /// then commits the outcome only if no newer call has started since.
    /// The result is returned to the caller either way.
    pub async fn run<F, Fut>(&self, op: F) -> ClientResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }

        let result = op().await;

        if self.generation.load(Ordering::SeqCst) == generation {
            let mut state = self.lock();
            state.loading = false;
            match &result {
                Ok(data) => state.data = Some(data.clone()),
                Err(e) => state.error = Some(e.to_string()),
            }
        }

        result
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FetchState<T>> {
        // Recover the state on poisoning; it only holds plain data
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::error::ClientError;

    #[tokio::test]
    async fn test_success_commits_data_and_clears_loading() {
        let fetcher = Fetcher::new();

        let result = fetcher.run(|| async { Ok(vec![1, 2, 3]) }).await;

        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        let state = fetcher.state();
        assert_eq!(state.data, Some(vec![1, 2, 3]));
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_error_is_stored_and_reraised() {
        let fetcher: Fetcher<u32> = Fetcher::new();

        let result = fetcher
            .run(|| async { Err(ClientError::session("no session")) })
            .await;

        assert!(result.is_err());
        let state = fetcher.state();
        assert!(state.error.unwrap().contains("no session"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_new_call_clears_previous_error_and_keeps_stale_data() {
        let fetcher = Fetcher::new();
        fetcher.run(|| async { Ok(7u32) }).await.unwrap();
        let _ = fetcher
            .run(|| async { Err(ClientError::session("boom")) })
            .await;

        assert!(fetcher.error().is_some());
        // Stale data survives a failed reload
        assert_eq!(fetcher.data(), Some(7));

        fetcher.run(|| async { Ok(8u32) }).await.unwrap();
        assert!(fetcher.error().is_none());
        assert_eq!(fetcher.data(), Some(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_call_does_not_clobber_newer_result() {
        let fetcher = Arc::new(Fetcher::new());

        let slow = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move {
                fetcher
                    .run(|| async {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok("slow-and-stale".to_string())
                    })
                    .await
            })
        };

        // Let the slow call claim its generation first
        tokio::time::sleep(Duration::from_millis(1)).await;

        let fast = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move {
                fetcher
                    .run(|| async {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Ok("fresh".to_string())
                    })
                    .await
            })
        };

        assert_eq!(fast.await.unwrap().unwrap(), "fresh");
        assert_eq!(slow.await.unwrap().unwrap(), "slow-and-stale");

        // The stale call still returned its value to its caller, but the
        // observable state belongs to the newer call.
        assert_eq!(fetcher.data(), Some("fresh".to_string()));
        assert!(!fetcher.is_loading());
    }
}
