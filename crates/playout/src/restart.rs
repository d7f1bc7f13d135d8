//! Declares [RestartPolicy], which decides how the playout loop recovers from
//! a failed pass over its source.

use std::time::Duration;

/// How many failures in a row are tolerated and how long to wait before
/// starting over after each one.
///
/// The wait doubles with every consecutive failure, starting from
/// [backoff_base](Self::backoff_base) and never exceeding
/// [backoff_max](Self::backoff_max). A successfully sent frame resets the
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    /// The failure that reaches this count is fatal. `1` means no failure is
    /// ever retried.
    pub max_consecutive_failures: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl RestartPolicy {
    /// How long to wait before starting over after the `failures`th failure
    /// in a row.
    ///
    /// ```
    /// use std::time::Duration;
    /// use playout::RestartPolicy;
    ///
    /// let policy = RestartPolicy {
    ///     max_consecutive_failures: 10,
    ///     backoff_base: Duration::from_millis(100),
    ///     backoff_max: Duration::from_millis(500),
    /// };
    /// assert_eq!(policy.backoff(1), Duration::from_millis(100));
    /// assert_eq!(policy.backoff(3), Duration::from_millis(400));
    /// assert_eq!(policy.backoff(4), Duration::from_millis(500));
    /// ```
    pub fn backoff(&self, failures: u32) -> Duration {
        let doublings = failures.saturating_sub(1).min(31);
        self.backoff_base
            .saturating_mul(1 << doublings)
            .min(self.backoff_max)
    }

    /// Whether the `failures`th failure in a row should end playback.
    pub fn is_fatal(&self, failures: u32) -> bool {
        failures >= self.max_consecutive_failures
    }
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 5,
            backoff_base: Duration::from_millis(100),
            backoff_max: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        let policy = RestartPolicy::default();
        let delays: Vec<_> = (1..=8).map(|n| policy.backoff(n)).collect();

        assert_eq!(
            delays,
            [100, 200, 400, 800, 1600, 3200, 5000, 5000].map(Duration::from_millis)
        );
    }

    #[test]
    fn huge_failure_counts_do_not_overflow() {
        let policy = RestartPolicy::default();
        assert_eq!(policy.backoff(u32::MAX), policy.backoff_max);
    }

    #[test]
    fn fatal_at_the_configured_count() {
        let policy = RestartPolicy {
            max_consecutive_failures: 3,
            ..Default::default()
        };

        assert!(!policy.is_fatal(1));
        assert!(!policy.is_fatal(2));
        assert!(policy.is_fatal(3));
    }
}
