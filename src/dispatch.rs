//! Bounded, retry-once executor for mutating requests.
//!
//! Uploads and deletes go through a [`Dispatcher`]. At most `limit`
//! operations run at once; waiting submissions are admitted in submission
//! order. A failed operation is run exactly once more, and if that also
//! fails the error is logged and handed back as [`DispatchOutcome::Dropped`]
//! instead of being returned as an `Err`.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::{Result, UpyunError};

/// What happened to a dispatched operation.
#[derive(Debug)]
pub enum DispatchOutcome<T> {
    /// Succeeded on the first attempt.
    Completed(T),
    /// Failed once, succeeded on the retry.
    Retried(T),
    /// Failed twice; the last error is kept here and nothing was propagated.
    Dropped(UpyunError),
}

impl<T> DispatchOutcome<T> {
    /// `true` unless the operation was dropped.
    pub fn is_success(&self) -> bool {
        !self.is_dropped()
    }

    /// `true` if both attempts failed.
    pub fn is_dropped(&self) -> bool {
        matches!(self, DispatchOutcome::Dropped(_))
    }

    /// Borrow the value of a successful operation.
    pub fn value(&self) -> Option<&T> {
        match self {
            DispatchOutcome::Completed(v) | DispatchOutcome::Retried(v) => Some(v),
            DispatchOutcome::Dropped(_) => None,
        }
    }

    /// Borrow the error of a dropped operation.
    pub fn error(&self) -> Option<&UpyunError> {
        match self {
            DispatchOutcome::Dropped(e) => Some(e),
            _ => None,
        }
    }

    /// Transform the success value, keeping the variant.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> DispatchOutcome<U> {
        match self {
            DispatchOutcome::Completed(v) => DispatchOutcome::Completed(f(v)),
            DispatchOutcome::Retried(v) => DispatchOutcome::Retried(f(v)),
            DispatchOutcome::Dropped(e) => DispatchOutcome::Dropped(e),
        }
    }

    /// Turn the outcome into a plain `Result` for callers that want to fail
    /// loudly on dropped writes.
    pub fn into_result(self) -> Result<T> {
        match self {
            DispatchOutcome::Completed(v) | DispatchOutcome::Retried(v) => Ok(v),
            DispatchOutcome::Dropped(e) => Err(e),
        }
    }
}

/// Concurrency-limited executor shared by all clones of a session.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl Dispatcher {
    /// Create a dispatcher running at most `limit` operations at once.
    ///
    /// A limit of 0 is treated as 1.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Configured concurrency limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of operations currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.limit - self.permits.available_permits()
    }

    /// Run `operation` under the concurrency limit, retrying it once.
    ///
    /// The slot is held for both attempts. This never returns an error;
    /// check the outcome to tell a dropped operation from a successful one.
    ///
    /// # Example
    /// ```
    /// use upyunlib::{Dispatcher, DispatchOutcome};
    ///
    /// # async fn example() {
    /// let dispatcher = Dispatcher::new(2);
    /// let outcome = dispatcher.submit(|| async { Ok::<_, upyunlib::UpyunError>(42) }).await;
    /// assert!(matches!(outcome, DispatchOutcome::Completed(42)));
    /// # }
    /// ```
    pub async fn submit<T, F, Fut>(&self, mut operation: F) -> DispatchOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                let err = UpyunError::Custom("dispatcher closed".to_string());
                warn!(error = %err, "dropping request");
                return DispatchOutcome::Dropped(err);
            }
        };

        match operation().await {
            Ok(value) => DispatchOutcome::Completed(value),
            Err(first) => {
                debug!(error = %first, "request failed, retrying once");
                match operation().await {
                    Ok(value) => DispatchOutcome::Retried(value),
                    Err(err) => {
                        warn!(error = %err, "request failed twice, dropping it");
                        DispatchOutcome::Dropped(err)
                    }
                }
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CONCURRENCY)
    }
}
