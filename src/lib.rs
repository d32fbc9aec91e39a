pub mod chunking;
pub mod processor;
pub mod runtime;

pub use chunking::chunker::{chunk_records, transaction_count, transactions, Transactions};
pub use chunking::transaction::Transaction;
pub use processor::concurrent::{concurrent_batch_job, concurrent_batch_job_with_report};
pub use processor::fold::ReducerOptions;
pub use processor::report::{BatchReport, RunStats};
pub use processor::sequential::{batch_job, batch_job_with_report};
pub use runtime::config::{
    BatchingConfig, BatchingConfigBuilder, BatchingConfigParams, BatchingOptions,
    BatchingOptionsBuilder,
};
pub use runtime::error::BatchJobError;
pub use runtime::executor::{executor_fn, AnyOutcome, BatchExecutor, ExecutorFuture, FnExecutor};
pub use runtime::hooks::{BatchErrorCallback, BatchHooks, BatchSuccessCallback};
pub use runtime::outcome::BatchOutcome;
pub use runtime::progress::BatchProgress;
pub use runtime::telemetry::{
    init_tracing, spawn_metrics_reporter, RunTelemetry, TelemetrySnapshot,
};
