//! Cancellation and deadline for one reconciliation cycle.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::loader::{BoxError, CollaboratorError};

/// Execution context owned by a single reconciliation cycle.
///
/// Every suspension point races the awaited call against the cancellation
/// token and the optional deadline.
#[derive(Debug, Clone, Default)]
pub struct CycleContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CycleContext {
    /// Create a context with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire the context `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Create a context driven by an existing token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token, deadline: None }
    }

    /// Token that cancels this cycle when triggered.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Await a collaborator call, failing on cancellation or deadline.
    pub async fn run<F, T, E>(&self, call: F) -> Result<T, CollaboratorError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let guarded = async {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(CollaboratorError::Cancelled),
                result = call => result.map_err(|e| CollaboratorError::Failed(e.into())),
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(CollaboratorError::DeadlineExceeded)),
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let ctx = CycleContext::new();
        let value = ctx.run(async { Ok::<_, BoxError>(42) }).await.unwrap();
        assert_eq!(value, 42);

        let err = ctx.run(async { Err::<u64, _>("boom") }).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Failed(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_run_observes_cancellation() {
        let ctx = CycleContext::new();
        ctx.cancel();
        let err = ctx
            .run(std::future::pending::<Result<u64, BoxError>>())
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_observes_deadline() {
        let ctx = CycleContext::new().with_timeout(Duration::from_secs(5));
        let err = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<u64, BoxError>(1)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::DeadlineExceeded));
    }
}
