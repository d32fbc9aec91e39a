/// Counters collected while a run folds outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
    pub retries: usize,
    pub records_folded: usize,
}

/// Final accumulator of a run along with what happened on the way there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<U> {
    value: U,
    transactions: usize,
    stats: RunStats,
    halted: bool,
}

impl<U> BatchReport<U> {
    pub(crate) fn new(value: U, transactions: usize, stats: RunStats, halted: bool) -> Self {
        Self {
            value,
            transactions,
            stats,
            halted,
        }
    }

    pub fn value(&self) -> &U {
        &self.value
    }

    pub fn into_value(self) -> U {
        self.value
    }

    /// Number of transactions the input was split into.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    pub fn succeeded(&self) -> usize {
        self.stats.succeeded
    }

    /// Executor failures observed, including ones that were later retried successfully.
    pub fn failed(&self) -> usize {
        self.stats.failed
    }

    pub fn retries(&self) -> usize {
        self.stats.retries
    }

    pub fn records_folded(&self) -> usize {
        self.stats.records_folded
    }

    /// True when a sequential run stopped on a failure before exhausting the input.
    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }
}
