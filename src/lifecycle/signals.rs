//! OS signal handling.
//!
//! # Responsibilities
//! - Translate SIGINT into cancellation of the running cycle
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The listener exits once the token is cancelled by anyone

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancel `token` when Ctrl-C is received.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    tracing::warn!("Interrupt received, cancelling cycle");
                    token.cancel();
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for interrupt"),
            },
            _ = token.cancelled() => {}
        }
    })
}

/// Wait for a listener started by [`cancel_on_ctrl_c`] to exit.
pub async fn join_listener(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        tracing::warn!(error = %e, "Interrupt listener did not exit cleanly");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_listener_exits_on_cancel() {
        let token = CancellationToken::new();
        let handle = cancel_on_ctrl_c(token.clone());

        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), join_listener(handle))
            .await
            .expect("listener must exit once the token is cancelled");
    }

    #[tokio::test]
    async fn test_join_listener_tolerates_failed_task() {
        let handle = tokio::spawn(async { panic!("listener failed") });
        join_listener(handle).await;

        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        join_listener(handle).await;
    }
}
