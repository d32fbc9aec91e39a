use super::report::RunStats;
use crate::runtime::hooks::BatchHooks;
use crate::runtime::progress::BatchProgress;
use crate::runtime::telemetry::RunTelemetry;
use std::sync::Arc;

/// Reducer and seed accumulator for a run. Mirrors `Iterator::fold` with the arguments of the
/// reducer ordered `(result, accumulator)`.
#[derive(Debug, Clone)]
pub struct ReducerOptions<R, U> {
    pub reducer: R,
    pub accumulator: U,
}

impl<R, U> ReducerOptions<R, U> {
    pub fn new(reducer: R, accumulator: U) -> Self {
        Self {
            reducer,
            accumulator,
        }
    }
}

/// Fold/callback step shared by the sequential and concurrent runners.
///
/// The accumulator itself is threaded through by value so the runner owns it between folds.
pub(crate) struct FoldStep<'h, K, E, R> {
    reducer: R,
    hooks: BatchHooks<'h, K, E>,
    telemetry: Option<Arc<RunTelemetry>>,
    stats: RunStats,
}

impl<'h, K, E, R> FoldStep<'h, K, E, R> {
    pub(crate) fn new(
        reducer: R,
        hooks: BatchHooks<'h, K, E>,
        telemetry: Option<Arc<RunTelemetry>>,
    ) -> Self {
        Self {
            reducer,
            hooks,
            telemetry,
            stats: RunStats::default(),
        }
    }

    /// Folds `result` into `accumulator`, then reports it to the success callback.
    pub(crate) fn fold_success<U>(
        &mut self,
        result: K,
        accumulator: U,
        progress: &BatchProgress,
        records: usize,
    ) -> U
    where
        R: FnMut(K, U) -> U,
    {
        let retained = self.hooks.retain_success(&result);
        let accumulator = (self.reducer)(result, accumulator);

        self.stats.succeeded += 1;
        self.stats.records_folded += records;
        if let Some(telemetry) = &self.telemetry {
            telemetry.record_success(records);
        }

        if let Some(result) = retained {
            self.hooks.batch_succeeded(&result, progress);
        }
        accumulator
    }

    pub(crate) fn report_failure(&mut self, error: Option<&E>) {
        self.hooks.batch_failed(error);
        self.stats.failed += 1;
        if let Some(telemetry) = &self.telemetry {
            telemetry.record_failure();
        }
    }

    pub(crate) fn record_retry(&mut self) {
        self.stats.retries += 1;
        if let Some(telemetry) = &self.telemetry {
            telemetry.record_retry();
        }
    }

    pub(crate) fn stats(&self) -> RunStats {
        self.stats
    }
}
