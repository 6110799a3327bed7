//! Retry policy and per-run attempt state for stage execution.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for stage retry behavior.
///
/// A stage is attempted at most `max_attempts` times, with `base_delay`
/// between consecutive attempts. The executor treats `max_attempts` of zero
/// as one: every stage runs at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum attempts per stage, including the initial one.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Returns `max_attempts` with the at-least-one floor applied.
    #[must_use]
    pub const fn effective_attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Attempt counter for one stage execution.
#[derive(Debug, Default)]
pub struct RetryState {
    attempt: u32,
}

impl RetryState {
    /// Creates a fresh state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the next attempt and returns its 1-based number.
    pub fn next_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    /// Returns the current 1-based attempt number, zero before the first.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns true once all attempts allowed by `policy` have run.
    #[must_use]
    pub const fn is_exhausted(&self, policy: &RetryPolicy) -> bool {
        self.attempt >= policy.effective_attempts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_policy_builder() {
        let policy = RetryPolicy::new()
            .with_max_attempts(5)
            .with_base_delay(Duration::from_millis(250));

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_effective_attempts_floor() {
        assert_eq!(RetryPolicy::new().with_max_attempts(0).effective_attempts(), 1);
        assert_eq!(RetryPolicy::new().with_max_attempts(3).effective_attempts(), 3);
    }

    #[test]
    fn test_state_counts_attempts() {
        let policy = RetryPolicy::new().with_max_attempts(2);
        let mut state = RetryState::new();

        assert_eq!(state.attempt(), 0);
        assert!(!state.is_exhausted(&policy));

        assert_eq!(state.next_attempt(), 1);
        assert!(!state.is_exhausted(&policy));

        assert_eq!(state.next_attempt(), 2);
        assert!(state.is_exhausted(&policy));
    }
}
