//! # Poll Backoff
//!
//! Provides the interval calculation used between refreshes while waiting for
//! a remote object to change state.
//!
//! The interval starts at 100ms and doubles after every refresh, bounded below
//! by the caller's minimum interval and above by 10s. A fixed poll interval,
//! when configured, replaces the calculation entirely.

use std::time::Duration;

/// Interval the sequence starts from before the first doubling
pub const INITIAL_WAIT: Duration = Duration::from_millis(100);

/// Upper bound applied when no fixed poll interval is set
pub const MAX_WAIT: Duration = Duration::from_secs(10);

/// Fixed poll intervals at or above this are ignored
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(180);

/// Exponential backoff calculator for state polling
///
/// The bounded value is fed back into the sequence, so once the minimum is
/// hit the next value doubles the minimum rather than the raw sequence.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    /// Current wait
    wait: Duration,
    /// Minimum wait between refreshes
    min: Duration,
    /// Fixed interval overriding the exponential sequence
    poll_interval: Option<Duration>,
}

impl PollBackoff {
    /// Create a new backoff
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum wait between refreshes (the waiter's `min_timeout`)
    /// * `poll_interval` - Fixed interval; only honoured when non-zero and below 180s
    #[must_use]
    pub fn new(min: Duration, poll_interval: Option<Duration>) -> Self {
        Self {
            wait: INITIAL_WAIT,
            min,
            poll_interval: poll_interval
                .filter(|interval| !interval.is_zero() && *interval < MAX_POLL_INTERVAL),
        }
    }

    /// Get the next wait and advance the sequence
    ///
    /// `grow` is false while a target state is being confirmed across
    /// consecutive refreshes; the wait then stays where it is.
    pub fn next_wait(&mut self, grow: bool) -> Duration {
        if grow {
            self.wait = self.wait.saturating_mul(2);
        }

        if let Some(interval) = self.poll_interval {
            self.wait = interval;
        } else if self.wait < self.min {
            self.wait = self.min;
        } else if self.wait > MAX_WAIT {
            self.wait = MAX_WAIT;
        }

        self.wait
    }
}
