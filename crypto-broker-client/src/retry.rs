//! Bounded retry with a fixed delay between attempts.
//!
//! Broker connections are retried on a fixed cadence rather than an
//! exponential one: the broker is expected to come up within a known window
//! (e.g. while its container starts), so each attempt is given a short time
//! budget and the caller polls once per second until the attempt budget is
//! used up.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::ClientError;

/// Policy governing bounded connection retries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of connection attempts before giving up.
    pub max_attempts: u32,
    /// Time budget for a single attempt.
    pub per_attempt_timeout: Duration,
    /// Fixed delay between consecutive attempts.
    pub delay_between_attempts: Duration,
}

impl Default for RetryPolicy {
    /// Up to 60 attempts, 2 seconds per attempt, 1 second between attempts.
    fn default() -> Self {
        Self {
            max_attempts: 60,
            per_attempt_timeout: Duration::from_secs(2),
            delay_between_attempts: Duration::from_secs(1),
        }
    }
}

/// Retries the given operation on a fixed delay until it succeeds or the
/// attempt budget is exhausted.
///
/// Every attempt runs under the policy's per-attempt timeout; an attempt that
/// outlives it fails with [`ClientError::ConnectTimeout`]. The delay is only
/// applied between attempts, never after the final one. Once the last attempt
/// has failed, the error is returned wrapped in
/// [`ClientError::RetriesExhausted`] together with the number of attempts
/// made.
pub(crate) async fn retry_with_fixed_delay<F, Fut, T>(
    policy: RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt: u32 = 1;

    loop {
        let outcome = match tokio::time::timeout(policy.per_attempt_timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::ConnectTimeout(policy.per_attempt_timeout)),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts => {
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(policy.delay_between_attempts).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(ClientError::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::timeout;

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            per_attempt_timeout: Duration::from_millis(100),
            delay_between_attempts: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn returns_first_success_without_further_attempts() {
        let attempts = AtomicUsize::new(0);

        let result = timeout(
            Duration::from_secs(5),
            retry_with_fixed_delay(quick_policy(3), "test_connect", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ClientError>("connected") }
            }),
        )
        .await;

        assert_eq!(result.unwrap().unwrap(), "connected");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_an_attempt_succeeds() {
        let attempts = AtomicUsize::new(0);

        let result = timeout(
            Duration::from_secs(5),
            retry_with_fixed_delay(quick_policy(5), "test_connect", || {
                let current = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if current < 2 {
                        Err(ClientError::ConnectTimeout(Duration::from_millis(100)))
                    } else {
                        Ok("connected")
                    }
                }
            }),
        )
        .await;

        assert_eq!(result.unwrap().unwrap(), "connected");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn reports_exhaustion_with_the_final_error() {
        let attempts = AtomicUsize::new(0);

        let result = timeout(
            Duration::from_secs(5),
            retry_with_fixed_delay(quick_policy(3), "test_connect", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<(), _>(ClientError::InvalidEndpoint(
                        "http://nowhere".to_string(),
                        "unreachable".to_string(),
                    ))
                }
            }),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        match result.unwrap() {
            Err(ClientError::RetriesExhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, ClientError::InvalidEndpoint(..)));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn exhaustion_message_names_the_attempt_count() {
        let result = retry_with_fixed_delay(quick_policy(3), "test_connect", || async {
            Err::<(), _>(ClientError::ConnectTimeout(Duration::from_millis(100)))
        })
        .await;

        let message = result.unwrap_err().to_string();
        assert!(message.contains("3 attempts"), "unexpected message: {message}");
    }

    #[tokio::test]
    async fn cuts_off_attempts_that_outlive_their_budget() {
        let attempts = AtomicUsize::new(0);

        let result = timeout(
            Duration::from_secs(5),
            retry_with_fixed_delay(quick_policy(2), "test_connect", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok::<_, ClientError>("connected")
                }
            }),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        match result.unwrap() {
            Err(ClientError::RetriesExhausted { attempts, source }) => {
                assert_eq!(attempts, 2);
                assert!(matches!(*source, ClientError::ConnectTimeout(_)));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn does_not_sleep_after_the_final_attempt() {
        // A long inter-attempt delay with a single attempt must return
        // promptly; any trailing sleep would trip the outer timeout.
        let policy = RetryPolicy {
            max_attempts: 1,
            per_attempt_timeout: Duration::from_millis(100),
            delay_between_attempts: Duration::from_secs(30),
        };

        let result = timeout(
            Duration::from_millis(500),
            retry_with_fixed_delay(policy, "test_connect", || async {
                Err::<(), _>(ClientError::ConnectTimeout(Duration::from_millis(100)))
            }),
        )
        .await;

        assert!(matches!(
            result.expect("retry slept after its final attempt"),
            Err(ClientError::RetriesExhausted { attempts: 1, .. })
        ));
    }
}
