//! Strictly sequential driver: one transaction in flight, retried in place on failure.

use super::backoff::{RetryBackoff, RetryDisposition};
use super::fold::{FoldStep, ReducerOptions};
use super::report::BatchReport;
use crate::chunking::chunker::{transaction_at, transaction_count};
use crate::runtime::config::BatchingOptions;
use crate::runtime::error::BatchJobError;
use crate::runtime::executor::BatchExecutor;
use crate::runtime::outcome::BatchOutcome;
use crate::runtime::progress::ProgressTracker;

/// Splits `records` into transactions and drives them through `executor` one at a time,
/// folding each success into the accumulator.
///
/// A failure is reported through `on_batch_error`. Without retry the run stops there and
/// returns the partial accumulator. With retry the same transaction is executed again, forever
/// unless a retry limit was configured.
pub async fn batch_job<'h, T, X, R, U>(
    executor: &X,
    records: &[T],
    reducer_options: ReducerOptions<R, U>,
    batching_options: BatchingOptions<'h, X::Output, X::Error>,
) -> Result<U, BatchJobError>
where
    X: BatchExecutor<T> + ?Sized,
    R: FnMut(X::Output, U) -> U,
{
    let report =
        batch_job_with_report(executor, records, reducer_options, batching_options).await?;
    Ok(report.into_value())
}

/// Same as [`batch_job`] but also returns run counters.
#[tracing::instrument(name = "batch_job", skip_all, fields(records = records.len()))]
pub async fn batch_job_with_report<'h, T, X, R, U>(
    executor: &X,
    records: &[T],
    reducer_options: ReducerOptions<R, U>,
    batching_options: BatchingOptions<'h, X::Output, X::Error>,
) -> Result<BatchReport<U>, BatchJobError>
where
    X: BatchExecutor<T> + ?Sized,
    R: FnMut(X::Output, U) -> U,
{
    let (config, hooks, telemetry) = batching_options.into_parts();
    config.validate()?;

    let transaction_size = config.transaction_size();
    let total = records.len();
    let ReducerOptions {
        reducer,
        accumulator,
    } = reducer_options;

    let mut accumulator = accumulator;
    let mut progress = ProgressTracker::new(total, transaction_size);
    let mut fold = FoldStep::new(reducer, hooks, telemetry);
    let mut retry = RetryBackoff::from_config(&config);
    let mut halted = false;

    tracing::debug!(
        target: "batchjob::sequential",
        total,
        transaction_size,
        retry = config.retry(),
        "starting sequential batch job"
    );

    while progress.remaining() > 0 {
        let transaction = transaction_at(records, transaction_size, progress.step());
        if transaction.is_empty() {
            break;
        }

        match executor.execute(transaction.records()).await {
            BatchOutcome::Success(result) => {
                let snapshot = progress.mark_folded(transaction.index(), transaction.len());
                accumulator = fold.fold_success(result, accumulator, &snapshot, transaction.len());
                progress.advance();
                retry.reset();

                tracing::trace!(
                    target: "batchjob::sequential",
                    step = snapshot.step,
                    remaining = snapshot.remaining,
                    "transaction folded"
                );
            }
            BatchOutcome::Failure(error) => {
                fold.report_failure(error.as_ref());

                match retry.on_failure() {
                    RetryDisposition::Abort => {
                        tracing::warn!(
                            target: "batchjob::sequential",
                            step = transaction.index(),
                            attempt = retry.attempt(),
                            remaining = progress.remaining(),
                            "transaction failed; halting batch job"
                        );
                        halted = true;
                        break;
                    }
                    RetryDisposition::Retry => {
                        tracing::debug!(
                            target: "batchjob::sequential",
                            step = transaction.index(),
                            attempt = retry.attempt(),
                            delay = ?retry.current_delay(),
                            "transaction failed; retrying"
                        );
                        fold.record_retry();
                        retry.wait().await;
                    }
                }
            }
        }
    }

    let stats = fold.stats();
    tracing::debug!(
        target: "batchjob::sequential",
        succeeded = stats.succeeded,
        failed = stats.failed,
        retries = stats.retries,
        halted,
        "sequential batch job finished"
    );

    Ok(BatchReport::new(
        accumulator,
        transaction_count(total, transaction_size),
        stats,
        halted,
    ))
}
