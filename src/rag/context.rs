//! Per-request deadline and cancellation

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::errors::Result;
use crate::RecipeRagError;

/// Deadline plus cancellation token shared by every stage of one request.
///
/// Upstream calls wrapped in [`RequestContext::run`] are dropped as soon as the
/// deadline passes or the token fires, so abandoned requests stop consuming
/// model and embedding capacity.
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl RequestContext {
    /// Context expiring `timeout` from now
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: CancellationToken::new(),
        }
    }

    /// Context without deadline; still cancellable
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that cancels this request when fired
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drive `fut` to completion unless the request is cancelled or expires first
    pub async fn run<T, F>(&self, stage: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(RecipeRagError::Cancelled { stage });
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, fut)
                    .await
                    .map_err(|_| RecipeRagError::Timeout { stage })?,
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                warn!("Request cancelled during {}", stage);
                Err(RecipeRagError::Cancelled { stage })
            }
            result = bounded => {
                if let Err(RecipeRagError::Timeout { .. }) = &result {
                    warn!("Deadline exceeded during {}", stage);
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let value = ctx.run("condense", async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_names_the_stage() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(50));
        let err = ctx
            .run("compose", async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeRagError::Timeout { stage: "compose" }));
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_the_call() {
        let ctx = RequestContext::unbounded();
        ctx.cancel();
        let err = ctx
            .run("retrieve", async { Ok::<_, RecipeRagError>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeRagError::Cancelled { stage: "retrieve" }));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_call() {
        let ctx = RequestContext::unbounded();
        let token = ctx.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = ctx
            .run("condense", async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeRagError::Cancelled { .. }));
    }
}
