use crate::runtime::error::BatchJobError;
use crate::runtime::hooks::BatchHooks;
use crate::runtime::progress::BatchProgress;
use crate::runtime::telemetry::RunTelemetry;
use std::sync::Arc;
use std::time::Duration;

/// Validated knobs that control how records are chunked and driven.
///
/// All instances must be constructed via [`BatchingConfig::builder`] or [`BatchingConfig::new`]
/// so invariants are validated before a runner observes the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchingConfig {
    transaction_size: usize,
    retry: bool,
    retry_limit: Option<usize>,
    retry_initial_backoff: Duration,
    retry_max_backoff: Duration,
    max_concurrency: Option<usize>,
}

pub struct BatchingConfigParams {
    pub transaction_size: usize,
    pub retry: bool,
    pub retry_limit: Option<usize>,
    pub retry_initial_backoff: Duration,
    pub retry_max_backoff: Duration,
    pub max_concurrency: Option<usize>,
}

impl BatchingConfig {
    pub fn builder() -> BatchingConfigBuilder {
        BatchingConfigBuilder::default()
    }

    /// Constructs a configuration directly from the provided values.
    pub fn new(params: BatchingConfigParams) -> Result<Self, BatchJobError> {
        let BatchingConfigParams {
            transaction_size,
            retry,
            retry_limit,
            retry_initial_backoff,
            retry_max_backoff,
            max_concurrency,
        } = params;

        let config = Self {
            transaction_size,
            retry,
            retry_limit,
            retry_initial_backoff,
            retry_max_backoff,
            max_concurrency,
        };

        config.validate()?;
        Ok(config)
    }

    /// Number of records per transaction.
    pub fn transaction_size(&self) -> usize {
        self.transaction_size
    }

    /// Whether the sequential runner re-runs a failed transaction.
    pub fn retry(&self) -> bool {
        self.retry
    }

    /// Consecutive failures tolerated per transaction before the sequential run halts.
    /// `None` retries forever.
    pub fn retry_limit(&self) -> Option<usize> {
        self.retry_limit
    }

    /// Delay before the first retry of a transaction. Zero only yields to the scheduler.
    pub fn retry_initial_backoff(&self) -> Duration {
        self.retry_initial_backoff
    }

    /// Upper bound for the doubling retry delay.
    pub fn retry_max_backoff(&self) -> Duration {
        self.retry_max_backoff
    }

    /// Maximum in-flight executor calls for the concurrent runner. `None` launches all at once.
    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    pub fn validate(&self) -> Result<(), BatchJobError> {
        if self.transaction_size == 0 {
            return Err(BatchJobError::invalid(
                "transaction_size",
                "must be greater than 0",
            ));
        }

        if self.retry_limit == Some(0) {
            return Err(BatchJobError::invalid("retry_limit", "must be greater than 0"));
        }

        if self.retry_limit.is_some() && !self.retry {
            return Err(BatchJobError::invalid(
                "retry_limit",
                "requires retry to be enabled",
            ));
        }

        if self.retry_max_backoff < self.retry_initial_backoff {
            return Err(BatchJobError::invalid(
                "retry_max_backoff",
                format!(
                    "({:?}) must be at least retry_initial_backoff ({:?})",
                    self.retry_max_backoff, self.retry_initial_backoff
                ),
            ));
        }

        if self.max_concurrency == Some(0) {
            return Err(BatchJobError::invalid(
                "max_concurrency",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct BatchingConfigBuilder {
    transaction_size: Option<usize>,
    retry: Option<bool>,
    retry_limit: Option<usize>,
    retry_initial_backoff: Option<Duration>,
    retry_max_backoff: Option<Duration>,
    max_concurrency: Option<usize>,
}

impl BatchingConfigBuilder {
    pub fn transaction_size(mut self, size: usize) -> Self {
        self.transaction_size = Some(size);
        self
    }

    pub fn retry(mut self, retry: bool) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn retry_limit(mut self, attempts: usize) -> Self {
        self.retry_limit = Some(attempts);
        self
    }

    pub fn retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_initial_backoff = Some(initial);
        self.retry_max_backoff = Some(max);
        self
    }

    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    pub fn build(self) -> Result<BatchingConfig, BatchJobError> {
        let transaction_size = self
            .transaction_size
            .ok_or_else(|| BatchJobError::invalid("transaction_size", "is required"))?;
        let retry_initial_backoff = self.retry_initial_backoff.unwrap_or(Duration::ZERO);

        BatchingConfig::new(BatchingConfigParams {
            transaction_size,
            retry: self.retry.unwrap_or(false),
            retry_limit: self.retry_limit,
            retry_initial_backoff,
            retry_max_backoff: self.retry_max_backoff.unwrap_or(retry_initial_backoff),
            max_concurrency: self.max_concurrency,
        })
    }
}

/// Everything a runner needs besides the executor, records, and reducer.
#[derive(Debug)]
pub struct BatchingOptions<'h, K, E> {
    config: BatchingConfig,
    hooks: BatchHooks<'h, K, E>,
    telemetry: Option<Arc<RunTelemetry>>,
}

impl<'h, K, E> BatchingOptions<'h, K, E> {
    pub fn builder() -> BatchingOptionsBuilder<'h, K, E> {
        BatchingOptionsBuilder::default()
    }

    /// Options without callbacks or telemetry.
    pub fn from_config(config: BatchingConfig) -> Self {
        Self {
            config,
            hooks: BatchHooks::new(),
            telemetry: None,
        }
    }

    pub fn config(&self) -> &BatchingConfig {
        &self.config
    }

    pub fn telemetry(&self) -> Option<&Arc<RunTelemetry>> {
        self.telemetry.as_ref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        BatchingConfig,
        BatchHooks<'h, K, E>,
        Option<Arc<RunTelemetry>>,
    ) {
        (self.config, self.hooks, self.telemetry)
    }
}

pub struct BatchingOptionsBuilder<'h, K, E> {
    config: BatchingConfigBuilder,
    hooks: BatchHooks<'h, K, E>,
    telemetry: Option<Arc<RunTelemetry>>,
}

impl<K, E> Default for BatchingOptionsBuilder<'_, K, E> {
    fn default() -> Self {
        Self {
            config: BatchingConfigBuilder::default(),
            hooks: BatchHooks::new(),
            telemetry: None,
        }
    }
}

impl<'h, K, E> BatchingOptionsBuilder<'h, K, E> {
    pub fn transaction_size(mut self, size: usize) -> Self {
        self.config = self.config.transaction_size(size);
        self
    }

    pub fn retry(mut self, retry: bool) -> Self {
        self.config = self.config.retry(retry);
        self
    }

    pub fn retry_limit(mut self, attempts: usize) -> Self {
        self.config = self.config.retry_limit(attempts);
        self
    }

    pub fn retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config = self.config.retry_backoff(initial, max);
        self
    }

    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config = self.config.max_concurrency(limit);
        self
    }

    /// Callback fired after each successful transaction has been folded. Receives a clone of
    /// the result and the post-fold progress.
    pub fn on_batch_success<F>(mut self, callback: F) -> Self
    where
        K: Clone,
        F: FnMut(&K, &BatchProgress) + Send + 'h,
    {
        self.hooks = self.hooks.with_success(callback);
        self
    }

    pub fn on_batch_error<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Option<&E>) + Send + 'h,
    {
        self.hooks = self.hooks.with_error(callback);
        self
    }

    pub fn telemetry(mut self, telemetry: Arc<RunTelemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn build(self) -> Result<BatchingOptions<'h, K, E>, BatchJobError> {
        Ok(BatchingOptions {
            config: self.config.build()?,
            hooks: self.hooks,
            telemetry: self.telemetry,
        })
    }
}
