use crate::foundation::{QuorumError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry an async operation with fixed delay.
///
/// Stops early when the error is not transient (see
/// [`QuorumError::is_transient`]) - a deterministic rejection never improves
/// with another attempt.
pub async fn retry_transient<F, Fut, T>(mut attempts: usize, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    while attempts > 0 {
        match op().await {
            Ok(v) => return Ok(v),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) => {
                last_err = Some(err);
                attempts -= 1;
                if attempts > 0 {
                    sleep(delay).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| QuorumError::Message("retry exhausted".to_string())))
}
