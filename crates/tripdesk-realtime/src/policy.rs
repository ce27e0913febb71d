//! Reconnect policy: fixed delay, capped attempt count.

use std::time::Duration;

/// Delay between reconnect attempts when nothing else is configured.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);
/// Attempts allowed since the last successful connection.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Decides whether another reconnect is scheduled after a disconnect.
///
/// The delay is the same for every attempt; it does not grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RECONNECT_DELAY,
            max_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
        }
    }
}

impl ReconnectPolicy {
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }

    /// Never retries; the client stays down until the next explicit `connect()`.
    pub fn disabled() -> Self {
        Self {
            delay: Duration::ZERO,
            max_attempts: 0,
        }
    }

    /// Consume one attempt from `attempts` and return the delay before it,
    /// or `None` once the budget is spent.
    pub fn next_delay(&self, attempts: &mut u32) -> Option<Duration> {
        if *attempts >= self.max_attempts {
            return None;
        }
        *attempts += 1;
        Some(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_feed_contract() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay, Duration::from_millis(3000));
        assert_eq!(policy.max_attempts, 5);
    }

    #[test]
    fn grants_exactly_max_attempts() {
        let policy = ReconnectPolicy::new(Duration::from_millis(10), 5);
        let mut attempts = 0;
        let mut granted = 0;
        while policy.next_delay(&mut attempts).is_some() {
            granted += 1;
            assert!(granted <= 5, "policy granted more than max_attempts");
        }
        assert_eq!(granted, 5);
        assert_eq!(attempts, 5);
        assert_eq!(policy.next_delay(&mut attempts), None);
        assert_eq!(attempts, 5);
    }

    #[test]
    fn delay_is_constant() {
        let policy = ReconnectPolicy::new(Duration::from_millis(250), 3);
        let mut attempts = 0;
        let delays: Vec<_> = std::iter::from_fn(|| policy.next_delay(&mut attempts)).collect();
        assert_eq!(delays, vec![Duration::from_millis(250); 3]);
    }

    #[test]
    fn reset_counter_restores_budget() {
        let policy = ReconnectPolicy::new(Duration::from_millis(1), 2);
        let mut attempts = 0;
        assert!(policy.next_delay(&mut attempts).is_some());
        assert!(policy.next_delay(&mut attempts).is_some());
        assert!(policy.next_delay(&mut attempts).is_none());

        attempts = 0;
        assert!(policy.next_delay(&mut attempts).is_some());
    }

    #[test]
    fn disabled_policy_never_retries() {
        let policy = ReconnectPolicy::disabled();
        let mut attempts = 0;
        assert_eq!(policy.next_delay(&mut attempts), None);
        assert_eq!(attempts, 0);
    }
}
