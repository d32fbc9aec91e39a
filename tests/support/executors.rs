use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use batchjob::{BatchExecutor, BatchOutcome, ExecutorFuture};
use tokio::time::sleep;

/// Sums each transaction after a fixed delay, the way a slow downstream write would.
pub struct DelayedSum {
    delay: Duration,
    calls: AtomicUsize,
}

impl DelayedSum {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BatchExecutor<u64> for DelayedSum {
    type Output = u64;
    type Error = String;

    fn execute<'a>(&'a self, records: &'a [u64]) -> ExecutorFuture<'a, u64, String> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(self.delay).await;
            BatchOutcome::Success(records.iter().sum())
        })
    }
}

/// Sums transactions over `[0, N)` but fails the ones whose index is listed.
///
/// A transaction marked `flaky` fails its own number of times before succeeding.
pub struct ScriptedSum {
    transaction_size: usize,
    failing: Vec<usize>,
    flaky: Vec<FlakyTransaction>,
    attempts: Mutex<Vec<usize>>,
}

struct FlakyTransaction {
    index: usize,
    failures: usize,
    failed: AtomicUsize,
}

impl ScriptedSum {
    pub fn new(transaction_size: usize) -> Self {
        Self {
            transaction_size,
            failing: Vec::new(),
            flaky: Vec::new(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, index: usize) -> Self {
        self.failing.push(index);
        self
    }

    pub fn flaky(mut self, index: usize, failures: usize) -> Self {
        self.flaky.push(FlakyTransaction {
            index,
            failures,
            failed: AtomicUsize::new(0),
        });
        self
    }

    /// Transaction indices in the order the executor saw them.
    pub fn attempts(&self) -> Vec<usize> {
        self.attempts.lock().unwrap().clone()
    }
}

impl BatchExecutor<u64> for ScriptedSum {
    type Output = u64;
    type Error = String;

    fn execute<'a>(&'a self, records: &'a [u64]) -> ExecutorFuture<'a, u64, String> {
        Box::pin(async move {
            let index = records[0] as usize / self.transaction_size;
            self.attempts.lock().unwrap().push(index);
            tokio::task::yield_now().await;

            if self.failing.contains(&index) {
                return BatchOutcome::failure(format!("transaction {index} rejected"));
            }

            let flaked = self.flaky.iter().any(|flaky| {
                flaky.index == index && flaky.failed.fetch_add(1, Ordering::SeqCst) < flaky.failures
            });
            if flaked {
                return BatchOutcome::failure(format!("transaction {index} flaked"));
            }

            BatchOutcome::Success(records.iter().sum())
        })
    }
}

/// Never succeeds; failures carry no payload.
#[derive(Default)]
pub struct AlwaysFails {
    calls: AtomicUsize,
}

impl AlwaysFails {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BatchExecutor<u64> for AlwaysFails {
    type Output = u64;
    type Error = String;

    fn execute<'a>(&'a self, _records: &'a [u64]) -> ExecutorFuture<'a, u64, String> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(1)).await;
            BatchOutcome::failed()
        })
    }
}
