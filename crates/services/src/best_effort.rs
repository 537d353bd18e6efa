use std::future::Future;

use api::ApiError;

/// Awaits a telemetry call whose failure must never reach the user.
///
/// Errors are logged at `warn` with the operation name and dropped.
pub async fn best_effort<T>(
    operation: &'static str,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Option<T> {
    match call.await {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(operation, error = %error, "best-effort call failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failures_become_none() {
        let failed = best_effort("ping", async {
            Err::<(), _>(ApiError::Transport("down".into()))
        })
        .await;
        assert_eq!(failed, None);
        assert_eq!(best_effort("ping", async { Ok::<_, ApiError>(7) }).await, Some(7));
    }
}
