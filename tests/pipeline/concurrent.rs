use std::sync::Mutex;
use std::time::Duration;

use crate::support::{
    executors::{DelayedSum, ScriptedSum},
    helpers::{add, assert_ascending, init_tracing, sequence, CallbackLog},
};
use anyhow::Result;
use batchjob::{
    batch_job, concurrent_batch_job, concurrent_batch_job_with_report, BatchProgress,
    BatchingOptions, ReducerOptions,
};
use tokio::time::Instant;

#[tokio::test]
async fn sums_two_million_records_concurrently() -> Result<()> {
    init_tracing();
    let records = sequence(2_000_000);
    let executor = DelayedSum::new(Duration::from_millis(10));
    let log = CallbackLog::default();

    let result = concurrent_batch_job(
        &executor,
        &records,
        ReducerOptions::new(add, 0),
        log.options(50_000).build()?,
    )
    .await?;

    assert_eq!(result, 1_999_999_000_000);
    assert_eq!(log.success_count(), 40);
    assert_eq!(log.error_count(), 0);
    assert_eq!(log.steps(), (0..40).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn launches_every_transaction_before_joining() -> Result<()> {
    init_tracing();
    let records = sequence(1_000);
    let executor = DelayedSum::new(Duration::from_millis(100));

    let started = Instant::now();
    let result = concurrent_batch_job(
        &executor,
        &records,
        ReducerOptions::new(add, 0),
        CallbackLog::default().options(10).build()?,
    )
    .await?;

    assert_eq!(result, 499_500);
    assert_eq!(executor.calls(), 100);
    assert!(
        started.elapsed() < Duration::from_millis(200),
        "transactions should overlap, took {:?}",
        started.elapsed()
    );
    Ok(())
}

#[tokio::test]
async fn skips_failed_transaction_and_keeps_folding() -> Result<()> {
    init_tracing();
    let records = sequence(20);
    let executor = ScriptedSum::new(4).failing(2);
    let log = CallbackLog::default();

    let report = concurrent_batch_job_with_report(
        &executor,
        &records,
        ReducerOptions::new(add, 0),
        log.options(4).build()?,
    )
    .await?;

    let skipped: u64 = (8..12).sum();
    assert_eq!(*report.value(), 190 - skipped);
    assert_eq!(report.transactions(), 5);
    assert_eq!(report.succeeded(), 4);
    assert_eq!(report.failed(), 1);
    assert_eq!(log.steps(), vec![0, 1, 3, 4]);
    assert_eq!(log.errors(), vec![Some("transaction 2 rejected".to_string())]);
    assert_ascending(&log.steps());
    Ok(())
}

#[tokio::test]
async fn retry_flag_is_ignored_concurrently() -> Result<()> {
    init_tracing();
    let records = sequence(12);
    let executor = ScriptedSum::new(4).flaky(1, 1);
    let log = CallbackLog::default();

    let report = concurrent_batch_job_with_report(
        &executor,
        &records,
        ReducerOptions::new(add, 0),
        log.options(4).retry(true).build()?,
    )
    .await?;

    assert_eq!(*report.value(), 66 - (4 + 5 + 6 + 7));
    assert_eq!(report.retries(), 0);
    assert_eq!(executor.attempts().len(), 3);
    assert_eq!(log.error_count(), 1);
    Ok(())
}

#[tokio::test]
async fn matches_sequential_result() -> Result<()> {
    init_tracing();
    let records = sequence(1_003);
    let executor = DelayedSum::new(Duration::ZERO);

    for size in [1, 7, 100, 1_003, 5_000] {
        let sequential = batch_job(
            &executor,
            &records,
            ReducerOptions::new(add, 0),
            CallbackLog::default().options(size).build()?,
        )
        .await?;
        let concurrent = concurrent_batch_job(
            &executor,
            &records,
            ReducerOptions::new(add, 0),
            CallbackLog::default().options(size).build()?,
        )
        .await?;

        assert_eq!(sequential, concurrent, "transaction size {size}");
        assert_eq!(concurrent, 1_003 * 1_002 / 2);
    }
    Ok(())
}

#[tokio::test]
async fn singleton_transactions_fold_in_input_order() -> Result<()> {
    let records = sequence(6);
    let executor = DelayedSum::new(Duration::ZERO);
    let log = CallbackLog::default();

    let order = concurrent_batch_job(
        &executor,
        &records,
        ReducerOptions::new(
            |value: u64, mut acc: Vec<u64>| {
                acc.push(value);
                acc
            },
            Vec::new(),
        ),
        log.options(1).build()?,
    )
    .await?;

    assert_eq!(order, records);
    assert_eq!(log.success_count(), 6);
    Ok(())
}

#[tokio::test]
async fn reducer_folds_before_success_callback() -> Result<()> {
    init_tracing();
    let records = sequence(4);
    let events = Mutex::new(Vec::new());

    let options = BatchingOptions::builder()
        .transaction_size(2)
        .on_batch_success(|_: &u64, progress: &BatchProgress| {
            events.lock().unwrap().push(format!("cb{}", progress.step));
        })
        .build()?;
    let result = concurrent_batch_job(
        &DelayedSum::new(Duration::ZERO),
        &records,
        ReducerOptions::new(
            |value: u64, acc: u64| {
                events.lock().unwrap().push("reduce".to_string());
                value + acc
            },
            0,
        ),
        options,
    )
    .await?;

    assert_eq!(result, 6);
    assert_eq!(
        events.into_inner().unwrap(),
        vec!["reduce", "cb0", "reduce", "cb1"]
    );
    Ok(())
}
