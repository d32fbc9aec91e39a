//! Concurrent driver: every transaction in flight at once, folded in input order after the join.

use super::fold::{FoldStep, ReducerOptions};
use super::report::BatchReport;
use crate::chunking::chunker::chunk_records;
use crate::runtime::config::BatchingOptions;
use crate::runtime::error::BatchJobError;
use crate::runtime::executor::BatchExecutor;
use crate::runtime::outcome::BatchOutcome;
use crate::runtime::progress::ProgressTracker;
use futures::future::join_all;
use futures::stream::{self, StreamExt};

/// Splits `records` into transactions, runs the executor on all of them concurrently, and folds
/// the successes in transaction order once every invocation has settled.
///
/// Failed transactions are reported through `on_batch_error` and left out of the fold. There is
/// no retry in this mode. All executor futures are polled on the calling task; nothing is
/// spawned.
pub async fn concurrent_batch_job<'h, T, X, R, U>(
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
        concurrent_batch_job_with_report(executor, records, reducer_options, batching_options)
            .await?;
    Ok(report.into_value())
}

/// Same as [`concurrent_batch_job`] but also returns run counters.
#[tracing::instrument(name = "concurrent_batch_job", skip_all, fields(records = records.len()))]
pub async fn concurrent_batch_job_with_report<'h, T, X, R, U>(
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
    let transactions = chunk_records(records, transaction_size)?;

    if config.retry() {
        tracing::debug!(
            target: "batchjob::concurrent",
            "retry is not supported by the concurrent runner; failed transactions are skipped"
        );
    }

    tracing::debug!(
        target: "batchjob::concurrent",
        total = records.len(),
        transactions = transactions.len(),
        max_concurrency = ?config.max_concurrency(),
        "launching concurrent batch job"
    );

    let pending = transactions
        .iter()
        .map(|transaction| executor.execute(transaction.records()));

    let outcomes: Vec<BatchOutcome<X::Output, X::Error>> = match config.max_concurrency() {
        None => join_all(pending).await,
        Some(limit) => stream::iter(pending).buffered(limit).collect().await,
    };

    let ReducerOptions {
        reducer,
        accumulator,
    } = reducer_options;
    let mut accumulator = accumulator;
    let mut progress = ProgressTracker::new(records.len(), transaction_size);
    let mut fold = FoldStep::new(reducer, hooks, telemetry);

    for (transaction, outcome) in transactions.iter().zip(outcomes) {
        match outcome {
            BatchOutcome::Success(result) => {
                let snapshot = progress.mark_folded(transaction.index(), transaction.len());
                accumulator = fold.fold_success(result, accumulator, &snapshot, transaction.len());
            }
            BatchOutcome::Failure(error) => {
                tracing::warn!(
                    target: "batchjob::concurrent",
                    transaction = transaction.index(),
                    records = transaction.len(),
                    "transaction failed; excluded from fold"
                );
                fold.report_failure(error.as_ref());
            }
        }
    }

    let stats = fold.stats();
    tracing::debug!(
        target: "batchjob::concurrent",
        succeeded = stats.succeeded,
        failed = stats.failed,
        "concurrent batch job finished"
    );

    Ok(BatchReport::new(
        accumulator,
        transactions.len(),
        stats,
        false,
    ))
}
