//! Single-shot and interval execution of command work.

use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::shutdown::ShutdownWatch;

/// Inclusive lower bound for the loop delay flag, in milliseconds.
pub const MIN_LOOP_DELAY_MS: i64 = 1;
/// Inclusive upper bound for the loop delay flag, in milliseconds.
pub const MAX_LOOP_DELAY_MS: i64 = 1000;
/// Flag default meaning "do not loop".
pub const NO_LOOP_FLAG_VALUE: i64 = -1_000_001;

/// How often a command's work runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSpec {
    /// Run the work exactly once.
    SingleShot,
    /// Run the work repeatedly with a fixed delay between calls.
    Interval(Duration),
}

impl LoopSpec {
    /// Maps the `--loop` flag value to an execution mode.
    ///
    /// Values inside `[MIN_LOOP_DELAY_MS, MAX_LOOP_DELAY_MS]` loop with that
    /// delay; any other value, the no-loop sentinel included, runs once.
    pub fn from_flag(delay_ms: i64) -> Self {
        if (MIN_LOOP_DELAY_MS..=MAX_LOOP_DELAY_MS).contains(&delay_ms) {
            Self::Interval(Duration::from_millis(delay_ms as u64))
        } else {
            Self::SingleShot
        }
    }
}

/// Runs `work` according to `spec`.
///
/// Single-shot mode runs the work exactly once without consulting the
/// shutdown watch. Interval mode checks the watch before every call and
/// stops with `Ok(())` once it is latched; a sleep separates consecutive
/// calls. The first failure stops the loop and is returned unchanged.
pub async fn run<F, Fut, E>(spec: LoopSpec, shutdown: &ShutdownWatch, mut work: F) -> Result<(), E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    match spec {
        LoopSpec::SingleShot => work().await,
        LoopSpec::Interval(delay) => loop {
            if shutdown.is_shutting_down() {
                info!("Received shutdown signal, stopping loop");
                return Ok(());
            }
            work().await?;
            tokio::time::sleep(delay).await;
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::timeout;

    #[test]
    fn flag_values_inside_range_loop() {
        assert_eq!(
            LoopSpec::from_flag(MIN_LOOP_DELAY_MS),
            LoopSpec::Interval(Duration::from_millis(1))
        );
        assert_eq!(
            LoopSpec::from_flag(MAX_LOOP_DELAY_MS),
            LoopSpec::Interval(Duration::from_millis(1000))
        );
    }

    #[test]
    fn flag_values_outside_range_run_once() {
        for value in [NO_LOOP_FLAG_VALUE, 0, -1, 1001, i64::MAX] {
            assert_eq!(LoopSpec::from_flag(value), LoopSpec::SingleShot);
        }
    }

    #[tokio::test]
    async fn out_of_range_delay_runs_exactly_once_without_sleeping() {
        let (_trigger, watch) = shutdown::channel();
        let calls = AtomicUsize::new(0);

        // A wrongly-applied 5 second interval would trip the outer timeout.
        let result = timeout(
            Duration::from_millis(500),
            run(LoopSpec::from_flag(5000), &watch, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Infallible>(()) }
            }),
        )
        .await;

        assert!(result.expect("single shot must not sleep").is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn single_shot_runs_even_when_already_latched() {
        let (trigger, watch) = shutdown::channel();
        trigger.trigger();
        let calls = AtomicUsize::new(0);

        let result = run(LoopSpec::from_flag(NO_LOOP_FLAG_VALUE), &watch, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, Infallible>(()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn latched_watch_stops_the_loop_before_any_call() {
        let (trigger, watch) = shutdown::channel();
        trigger.trigger();
        let calls = AtomicUsize::new(0);

        let result = run(LoopSpec::Interval(Duration::from_millis(1)), &watch, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, Infallible>(()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_error_stops_the_loop_unchanged() {
        let (_trigger, watch) = shutdown::channel();
        let calls = AtomicUsize::new(0);

        let result: Result<(), String> =
            run(LoopSpec::Interval(Duration::from_millis(1)), &watch, || {
                let current = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if current == 2 {
                        Err("broke on the third call".to_string())
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap_err(), "broke on the third call");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn latch_during_work_stops_at_the_next_boundary() {
        let (trigger, watch) = shutdown::channel();
        let calls = AtomicUsize::new(0);

        let result = timeout(
            Duration::from_secs(5),
            run(LoopSpec::Interval(Duration::from_millis(1)), &watch, || {
                let current = calls.fetch_add(1, Ordering::SeqCst);
                if current == 2 {
                    trigger.trigger();
                }
                async { Ok::<_, Infallible>(()) }
            }),
        )
        .await;

        assert!(result.unwrap().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
