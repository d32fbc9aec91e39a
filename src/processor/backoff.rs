use crate::runtime::config::BatchingConfig;
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryDisposition {
    Retry,
    Abort,
}

/// Retry bookkeeping for the transaction currently being driven by the sequential runner.
#[derive(Debug, Clone)]
pub(crate) struct RetryBackoff {
    enabled: bool,
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: Option<usize>,
    attempt: usize,
    backoff: Duration,
}

impl RetryBackoff {
    pub(crate) fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            enabled: true,
            initial_delay,
            max_delay,
            max_attempts: None,
            attempt: 0,
            backoff: initial_delay,
        }
    }

    pub(crate) fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO, Duration::ZERO)
        }
    }

    pub(crate) fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub(crate) fn from_config(config: &BatchingConfig) -> Self {
        if !config.retry() {
            return Self::disabled();
        }

        let backoff = Self::new(config.retry_initial_backoff(), config.retry_max_backoff());
        match config.retry_limit() {
            Some(limit) => backoff.with_max_attempts(limit),
            None => backoff,
        }
    }

    /// Consecutive failures of the current transaction.
    pub(crate) fn attempt(&self) -> usize {
        self.attempt
    }

    pub(crate) fn current_delay(&self) -> Duration {
        self.backoff
    }

    /// Registers one more failure of the current transaction.
    pub(crate) fn on_failure(&mut self) -> RetryDisposition {
        self.attempt += 1;

        if !self.enabled {
            return RetryDisposition::Abort;
        }

        let exhausted = self
            .max_attempts
            .map(|max| self.attempt >= max)
            .unwrap_or(false);

        if exhausted {
            RetryDisposition::Abort
        } else {
            RetryDisposition::Retry
        }
    }

    /// Waits before the next attempt. A zero delay only yields to the scheduler.
    pub(crate) async fn wait(&mut self) {
        if self.backoff.is_zero() {
            yield_now().await;
        } else {
            sleep(self.backoff).await;
        }
        self.backoff = next_backoff(self.backoff, self.max_delay);
    }

    /// Called once the current transaction succeeds.
    pub(crate) fn reset(&mut self) {
        self.attempt = 0;
        self.backoff = self.initial_delay;
    }
}

fn next_backoff(current: Duration, max_backoff: Duration) -> Duration {
    if current.is_zero() {
        return max_backoff.min(Duration::from_millis(1));
    }

    let mut next = current.saturating_mul(2);
    if next > max_backoff {
        next = max_backoff;
    }
    next
}
