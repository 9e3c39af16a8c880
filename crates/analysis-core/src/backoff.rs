//! Retry policies for provider tiers

use crate::error::ErrorKind;
use std::time::Duration;

/// How a provider tier retries failed calls.
///
/// Transient failures back off exponentially from `initial_delay`; auth
/// failures use their own small fixed delay. Malformed responses and other
/// errors never retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_transient_retries: u32,
    pub initial_delay: Duration,
    pub factor: u32,
    pub max_delay: Duration,
    pub max_auth_retries: u32,
    pub auth_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_transient_retries: 3,
            initial_delay: Duration::from_secs(1),
            factor: 2,
            max_delay: Duration::from_secs(8),
            max_auth_retries: 2,
            auth_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Policy that gives up after the first failure
    pub fn no_retry() -> Self {
        Self {
            max_transient_retries: 0,
            max_auth_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_transient_retries(mut self, retries: u32, initial_delay: Duration) -> Self {
        self.max_transient_retries = retries;
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_auth_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.max_auth_retries = retries;
        self.auth_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before transient retry number `retry` (0-based)
    pub fn transient_delay(&self, retry: u32) -> Duration {
        let multiplier = self.factor.saturating_pow(retry);
        self.initial_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }

    pub fn start(&self) -> RetryState<'_> {
        RetryState {
            policy: self,
            transient_retries: 0,
            auth_retries: 0,
        }
    }
}

/// Per-call retry bookkeeping
#[derive(Debug)]
pub struct RetryState<'a> {
    policy: &'a RetryPolicy,
    transient_retries: u32,
    auth_retries: u32,
}

impl RetryState<'_> {
    /// Delay before the next attempt, or `None` when the tier should give up
    pub fn next_delay(&mut self, kind: ErrorKind) -> Option<Duration> {
        match kind {
            ErrorKind::Transient if self.transient_retries < self.policy.max_transient_retries => {
                let delay = self.policy.transient_delay(self.transient_retries);
                self.transient_retries += 1;
                Some(delay)
            }
            ErrorKind::Auth if self.auth_retries < self.policy.max_auth_retries => {
                self.auth_retries += 1;
                Some(self.policy.auth_delay)
            }
            _ => None,
        }
    }

    /// Retries performed so far
    pub fn retries(&self) -> u32 {
        self.transient_retries + self.auth_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transient_delays_double() {
        let policy = RetryPolicy::default();
        let mut state = policy.start();

        assert_eq!(state.next_delay(ErrorKind::Transient), Some(Duration::from_secs(1)));
        assert_eq!(state.next_delay(ErrorKind::Transient), Some(Duration::from_secs(2)));
        assert_eq!(state.next_delay(ErrorKind::Transient), Some(Duration::from_secs(4)));
        assert_eq!(state.next_delay(ErrorKind::Transient), None);
        assert_eq!(state.retries(), 3);
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::default().with_max_delay(Duration::from_millis(1500));
        assert_eq!(policy.transient_delay(0), Duration::from_secs(1));
        assert_eq!(policy.transient_delay(1), Duration::from_millis(1500));
        assert_eq!(policy.transient_delay(30), Duration::from_millis(1500));
    }

    #[test]
    fn test_auth_retries_use_fixed_delay() {
        let policy = RetryPolicy::default();
        let mut state = policy.start();

        assert_eq!(state.next_delay(ErrorKind::Auth), Some(Duration::from_millis(500)));
        assert_eq!(state.next_delay(ErrorKind::Auth), Some(Duration::from_millis(500)));
        assert_eq!(state.next_delay(ErrorKind::Auth), None);
    }

    #[test]
    fn test_auth_and_transient_budgets_are_separate() {
        let policy = RetryPolicy::default();
        let mut state = policy.start();

        state.next_delay(ErrorKind::Auth);
        assert_eq!(state.next_delay(ErrorKind::Transient), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_malformed_and_other_never_retry() {
        let policy = RetryPolicy::default();
        let mut state = policy.start();

        assert_eq!(state.next_delay(ErrorKind::Malformed), None);
        assert_eq!(state.next_delay(ErrorKind::Other), None);
    }

    #[test]
    fn test_no_retry_policy() {
        let policy = RetryPolicy::no_retry();
        let mut state = policy.start();
        assert_eq!(state.next_delay(ErrorKind::Transient), None);
        assert_eq!(state.next_delay(ErrorKind::Auth), None);
    }
}
