use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio::{select, time};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs a basic tracing subscriber (if one is not already active).
///
/// The subscriber honours `RUST_LOG` if it is present, otherwise it falls back to `info`.
/// Calling this function multiple times is harmless.
pub fn init_tracing() {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();

    let _ = TRACING_INIT.set(());
}

/// Rolling counters shared by every run that was handed the same instance.
#[derive(Default, Debug)]
pub struct RunTelemetry {
    transactions_succeeded: AtomicU64,
    transactions_failed: AtomicU64,
    retries: AtomicU64,
    records_folded: AtomicU64,
}

impl RunTelemetry {
    pub fn record_success(&self, records: usize) {
        self.transactions_succeeded.fetch_add(1, Ordering::Relaxed);
        self.records_folded
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.transactions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            transactions_succeeded: self.transactions_succeeded.load(Ordering::Relaxed),
            transactions_failed: self.transactions_failed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            records_folded: self.records_folded.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub transactions_succeeded: u64,
    pub transactions_failed: u64,
    pub retries: u64,
    pub records_folded: u64,
}

impl TelemetrySnapshot {
    /// Counter growth since `earlier`.
    pub fn since(&self, earlier: &TelemetrySnapshot) -> TelemetrySnapshot {
        TelemetrySnapshot {
            transactions_succeeded: self
                .transactions_succeeded
                .saturating_sub(earlier.transactions_succeeded),
            transactions_failed: self
                .transactions_failed
                .saturating_sub(earlier.transactions_failed),
            retries: self.retries.saturating_sub(earlier.retries),
            records_folded: self.records_folded.saturating_sub(earlier.records_folded),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == TelemetrySnapshot::default()
    }
}

/// Spawns a task that logs how far the shared counters moved in each `interval`.
///
/// Idle intervals are logged at debug level only. Once `shutdown` fires the task logs the
/// totals and resolves to the last snapshot it took.
pub fn spawn_metrics_reporter(
    telemetry: Arc<RunTelemetry>,
    shutdown: CancellationToken,
    interval: Duration,
) -> JoinHandle<TelemetrySnapshot> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut previous = telemetry.snapshot();
        let mut window_start = Instant::now();

        loop {
            select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let current = telemetry.snapshot();
                    let window = current.since(&previous);
                    let elapsed = window_start.elapsed().as_secs_f64();

                    if window.is_idle() {
                        tracing::debug!(target: "batchjob::metrics", "no transactions settled");
                    } else {
                        let records_per_sec = if elapsed <= f64::EPSILON {
                            0.0
                        } else {
                            window.records_folded as f64 / elapsed
                        };
                        tracing::info!(
                            target: "batchjob::metrics",
                            records_per_sec = format!("{records_per_sec:.2}"),
                            folded = window.records_folded,
                            succeeded = window.transactions_succeeded,
                            failed = window.transactions_failed,
                            retries = window.retries,
                            "batch job progress"
                        );
                    }

                    previous = current;
                    window_start = Instant::now();
                }
            }
        }

        let last = telemetry.snapshot();
        tracing::info!(
            target: "batchjob::metrics",
            records_folded = last.records_folded,
            succeeded = last.transactions_succeeded,
            failed = last.transactions_failed,
            retries = last.retries,
            "metrics reporter stopped"
        );
        last
    })
}
