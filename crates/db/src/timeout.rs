//! Time budgets for remote calls.
//!
//! Every remote call races a fixed timer. When the timer wins the caller gets
//! [`StoreError::Timeout`]; the request may already have reached the backend
//! and can still take effect there.

use std::future::Future;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};

/// Default budget for reads (8 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(8);

/// Default budget for writes (10 seconds).
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Read and write budgets applied by the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub read: Duration,
    pub write: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read: DEFAULT_READ_TIMEOUT,
            write: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// Await `fut`, failing with [`StoreError::Timeout`] after `after`.
pub async fn with_timeout<T, F>(operation: &'static str, after: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout_ms = after.as_millis() as u64, "Remote call timed out");
            Err(StoreError::Timeout { operation, after })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pending_call_times_out() {
        let started = tokio::time::Instant::now();
        let result: StoreResult<()> =
            with_timeout("fetch artworks", DEFAULT_READ_TIMEOUT, std::future::pending()).await;

        assert_matches!(result, Err(StoreError::Timeout { operation: "fetch artworks", .. }));
        let waited = started.elapsed();
        assert!(waited >= DEFAULT_READ_TIMEOUT);
        assert!(waited < DEFAULT_READ_TIMEOUT + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn completed_call_passes_through() {
        let result = with_timeout("write", DEFAULT_WRITE_TIMEOUT, async { Ok(5) }).await;
        assert_eq!(result.unwrap(), 5);
    }

    #[tokio::test]
    async fn inner_errors_are_preserved() {
        let result: StoreResult<()> = with_timeout("write", DEFAULT_WRITE_TIMEOUT, async {
            Err(StoreError::Rejected("permission denied".into()))
        })
        .await;
        assert_matches!(result, Err(StoreError::Rejected(_)));
    }
}
