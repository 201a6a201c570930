//! Waiting for a remote object to reach a target state.
//!
//! [`StateChangeConf`] polls a refresh function until the state it reports is
//! one of the target states, failing on timeout, on a state that is neither
//! pending nor target, on a refresh error, or when the object stays missing
//! for too many consecutive refreshes.
//!
//! A refresh function returns `Ok(None)` when the object does not exist. The
//! waiter records that observation as the [`NOT_FOUND_STATE`] pseudo-status.

use crate::backoff::PollBackoff;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Pseudo-status reported while the polled object does not exist
pub const NOT_FOUND_STATE: &str = "not found";

/// Default number of consecutive not-found refreshes tolerated
pub const DEFAULT_NOT_FOUND_CHECKS: u32 = 20;

/// Errors that end a wait without reaching a target state
#[derive(Debug, Error)]
pub enum WaitError<E>
where
    E: std::error::Error + 'static,
{
    /// The timeout elapsed first
    #[error(
        "timeout while waiting for state to become '{}' (last state: '{last_state}', timeout: {timeout:?})",
        .expected.join(", ")
    )]
    Timeout {
        last_state: String,
        expected: Vec<String>,
        timeout: Duration,
    },

    /// The object stayed missing for more than the allowed refreshes
    #[error("couldn't find resource ({retries} retries)")]
    NotFound { retries: u32 },

    /// The object reached a state that is neither pending nor target
    #[error("unexpected state '{state}', wanted target '{}'", .expected.join(", "))]
    UnexpectedState { state: String, expected: Vec<String> },

    /// The refresh function itself failed
    #[error(transparent)]
    Refresh(E),
}

/// Configuration of a single wait
#[derive(Debug, Clone)]
pub struct StateChangeConf {
    /// States that keep the wait going
    pub pending: Vec<String>,
    /// States that end the wait successfully
    pub target: Vec<String>,
    /// Bound on the whole wait, including `delay`
    pub timeout: Duration,
    /// Sleep before the first refresh
    pub delay: Duration,
    /// Minimum sleep between refreshes
    pub min_timeout: Duration,
    /// Fixed sleep between refreshes, replacing the exponential backoff
    pub poll_interval: Option<Duration>,
    /// Consecutive not-found refreshes tolerated before failing
    pub not_found_checks: u32,
    /// Consecutive target observations required to succeed
    pub continuous_target_occurrence: u32,
}

impl StateChangeConf {
    pub fn new(pending: &[&str], target: &[&str]) -> Self {
        Self {
            pending: pending.iter().map(|s| s.to_string()).collect(),
            target: target.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(10 * 60),
            delay: Duration::ZERO,
            min_timeout: Duration::ZERO,
            poll_interval: None,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
            continuous_target_occurrence: 1,
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn min_timeout(mut self, min_timeout: Duration) -> Self {
        self.min_timeout = min_timeout;
        self
    }

    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }

    #[must_use]
    pub fn not_found_checks(mut self, checks: u32) -> Self {
        self.not_found_checks = checks;
        self
    }

    #[must_use]
    pub fn continuous_target_occurrence(mut self, occurrences: u32) -> Self {
        self.continuous_target_occurrence = occurrences.max(1);
        self
    }

    /// Poll `refresh` until the object reaches a target state.
    ///
    /// Returns the object from the refresh that completed the wait.
    pub async fn wait_for_state<T, E, F, Fut>(&self, mut refresh: F) -> Result<T, WaitError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<(T, String)>, E>>,
        E: std::error::Error + 'static,
    {
        let mut last_state = String::new();
        let outcome = tokio::time::timeout(self.timeout, self.poll(&mut refresh, &mut last_state)).await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(WaitError::Timeout {
                last_state,
                expected: self.target.clone(),
                timeout: self.timeout,
            }),
        }
    }

    async fn poll<T, E, F, Fut>(&self, refresh: &mut F, last_state: &mut String) -> Result<T, WaitError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<(T, String)>, E>>,
        E: std::error::Error + 'static,
    {
        debug!(
            "Waiting for state to become: {:?} (pending: {:?})",
            self.target, self.pending
        );
        tokio::time::sleep(self.delay).await;

        let mut backoff = PollBackoff::new(self.min_timeout, self.poll_interval);
        let mut not_found_ticks: u32 = 0;
        let mut target_occurrences: u32 = 0;

        loop {
            match refresh().await.map_err(WaitError::Refresh)? {
                None => {
                    *last_state = NOT_FOUND_STATE.to_string();
                    not_found_ticks += 1;
                    if not_found_ticks > self.not_found_checks {
                        return Err(WaitError::NotFound {
                            retries: not_found_ticks,
                        });
                    }
                }
                Some((object, state)) => {
                    not_found_ticks = 0;
                    trace!("Refreshed state: {}", state);

                    if self.target.contains(&state) {
                        target_occurrences += 1;
                        if target_occurrences >= self.continuous_target_occurrence {
                            return Ok(object);
                        }
                    } else if self.pending.contains(&state) {
                        target_occurrences = 0;
                    } else if !self.pending.is_empty() {
                        return Err(WaitError::UnexpectedState {
                            state,
                            expected: self.target.clone(),
                        });
                    }

                    *last_state = state;
                }
            }

            let wait = backoff.next_wait(target_occurrences == 0);
            debug!("Last state {:?}, waiting {:?} before next refresh", last_state, wait);
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;

    #[derive(Debug, Error)]
    #[error("refresh failed: {0}")]
    struct TestError(String);

    /// Refresh function that replays a scripted sequence of observations.
    /// The last observation repeats once the script runs out.
    fn scripted(
        steps: &[Option<&str>],
    ) -> impl FnMut() -> std::future::Ready<Result<Option<(String, String)>, TestError>> {
        let mut steps: VecDeque<Option<String>> = steps.iter().map(|s| s.map(str::to_string)).collect();
        let mut last: Option<String> = None;
        move || {
            let step = match steps.pop_front() {
                Some(step) => {
                    last = step.clone();
                    step
                }
                None => last.clone(),
            };
            std::future::ready(Ok(step.map(|state| (format!("object-{}", state), state))))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaches_target_state() {
        let conf = StateChangeConf::new(&["registering", "activating"], &["active"])
            .delay(Duration::from_secs(1))
            .min_timeout(Duration::from_secs(3));

        let result = conf
            .wait_for_state(scripted(&[Some("registering"), Some("activating"), Some("active")]))
            .await
            .unwrap();

        assert_eq!(result, "object-active");
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_wins_over_pending() {
        // "active" is both pending and target; target is checked first
        let conf = StateChangeConf::new(&["active", "registering"], &["active", "disconnected"]);

        let result = conf.wait_for_state(scripted(&[Some("active")])).await.unwrap();
        assert_eq!(result, "object-active");
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_target_never_reached() {
        let conf = StateChangeConf::new(&["deactivating"], &["inactive"])
            .timeout(Duration::from_secs(60))
            .min_timeout(Duration::from_secs(3));

        let err = conf
            .wait_for_state(scripted(&[Some("deactivating")]))
            .await
            .unwrap_err();

        match err {
            WaitError::Timeout {
                last_state,
                expected,
                timeout,
            } => {
                assert_eq!(last_state, "deactivating");
                assert_eq!(expected, vec!["inactive".to_string()]);
                assert_eq!(timeout, Duration::from_secs(60));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tolerates_bounded_not_found() {
        let conf = StateChangeConf::new(&["registering"], &["active"]).not_found_checks(3);

        let result = conf
            .wait_for_state(scripted(&[None, None, None, Some("active")]))
            .await
            .unwrap();
        assert_eq!(result, "object-active");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_after_too_many_not_found() {
        let conf = StateChangeConf::new(&["registering"], &["active"]).not_found_checks(3);

        let err = conf.wait_for_state(scripted(&[None])).await.unwrap_err();
        assert!(matches!(err, WaitError::NotFound { retries: 4 }), "got {err:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_counter_resets_when_found() {
        let conf = StateChangeConf::new(&["registering"], &["active"]).not_found_checks(2);

        let result = conf
            .wait_for_state(scripted(&[
                None,
                None,
                Some("registering"),
                None,
                None,
                Some("active"),
            ]))
            .await
            .unwrap();
        assert_eq!(result, "object-active");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_state_fails_immediately() {
        let conf = StateChangeConf::new(&["active", "deactivating"], &["inactive"]);

        let err = conf
            .wait_for_state(scripted(&[Some("deactivating"), Some("error")]))
            .await
            .unwrap_err();

        match err {
            WaitError::UnexpectedState { state, expected } => {
                assert_eq!(state, "error");
                assert_eq!(expected, vec!["inactive".to_string()]);
            }
            other => panic!("expected unexpected state, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_error_is_propagated() {
        let conf = StateChangeConf::new(&["active"], &["inactive"]);
        let calls = Cell::new(0);

        let err = conf
            .wait_for_state(|| {
                calls.set(calls.get() + 1);
                std::future::ready(Err::<Option<(String, String)>, _>(TestError("boom".into())))
            })
            .await
            .unwrap_err();

        assert_eq!(calls.get(), 1);
        assert_eq!(err.to_string(), "refresh failed: boom");
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_target_occurrence() {
        let conf = StateChangeConf::new(&["removing"], &["removed"]).continuous_target_occurrence(2);

        // A single "removed" followed by "removing" resets the count
        let result = conf
            .wait_for_state(scripted(&[
                Some("removed"),
                Some("removing"),
                Some("removed"),
                Some("removed"),
            ]))
            .await
            .unwrap();
        assert_eq!(result, "object-removed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_counts_against_timeout() {
        let conf = StateChangeConf::new(&["registering"], &["active"])
            .delay(Duration::from_secs(10))
            .timeout(Duration::from_secs(5));

        let err = conf.wait_for_state(scripted(&[Some("active")])).await.unwrap_err();
        match err {
            WaitError::Timeout { last_state, .. } => assert_eq!(last_state, ""),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_message_names_states() {
        let err: WaitError<TestError> = WaitError::Timeout {
            last_state: "deactivating".to_string(),
            expected: vec!["inactive".to_string()],
            timeout: Duration::from_secs(600),
        };
        let message = err.to_string();
        assert!(message.contains("'inactive'"), "{message}");
        assert!(message.contains("last state: 'deactivating'"), "{message}");
    }
}
