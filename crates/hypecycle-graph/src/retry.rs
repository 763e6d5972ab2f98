use std::future::Future;
use std::time::Duration;

use hypecycle_core::GraphError;

/// Retries a fallible graph operation up to `max_attempts` times with
/// `2^n * 100ms` backoff (spec §4.A "Retry policy"). `GraphError::SchemaMismatch`
/// is never retried — it is fatal and returned immediately.
pub async fn retry_graph_call<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, GraphError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GraphError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(GraphError::SchemaMismatch(msg)) => return Err(GraphError::SchemaMismatch(msg)),
            Err(e @ GraphError::Unavailable(_)) => {
                attempt += 1;
                if attempt >= max_attempts {
                    return Err(e);
                }
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_graph_call(3, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(GraphError::Unavailable("transient".into()))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn schema_mismatch_is_fatal_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), GraphError> = retry_graph_call(3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(GraphError::SchemaMismatch("bad shape".into()))
        })
        .await;
        assert!(matches!(result, Err(GraphError::SchemaMismatch(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
