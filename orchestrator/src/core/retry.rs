//! Startup attempt counter

use std::time::Duration;

/// Attempt bookkeeping for one `ensure_running` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
}

impl RetryState {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Advance to the next attempt, or `None` once every attempt is used
    pub fn next_attempt(&mut self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        self.attempt += 1;
        Some(self.attempt)
    }

    /// Delay to wait before the current attempt; the first attempt starts immediately
    pub fn delay_before_current(&self) -> Option<Duration> {
        (self.attempt > 1).then_some(self.delay)
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_are_bounded() {
        let mut retry = RetryState::new(3, Duration::from_millis(10));
        let attempts: Vec<u32> = std::iter::from_fn(|| retry.next_attempt()).collect();

        assert_eq!(attempts, vec![1, 2, 3]);
        assert!(retry.is_exhausted());
        assert_eq!(retry.next_attempt(), None);
    }

    #[test]
    fn test_delay_only_between_attempts() {
        let mut retry = RetryState::new(2, Duration::from_millis(25));
        retry.next_attempt();
        assert_eq!(retry.delay_before_current(), None);
        retry.next_attempt();
        assert_eq!(retry.delay_before_current(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let mut retry = RetryState::new(0, Duration::ZERO);
        assert_eq!(retry.max_attempts(), 1);
        assert_eq!(retry.next_attempt(), Some(1));
        assert_eq!(retry.next_attempt(), None);
    }
}
