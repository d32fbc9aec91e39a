/// Snapshot handed to `on_batch_success` right after a transaction is folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Records not yet folded into the accumulator.
    pub remaining: usize,
    /// Index of the transaction that just succeeded.
    pub step: usize,
    pub transaction_size: usize,
    /// Number of records in the whole run.
    pub total: usize,
}

impl BatchProgress {
    pub fn processed(&self) -> usize {
        self.total.saturating_sub(self.remaining)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Tracks `{step, remaining}` for a single run.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    step: usize,
    remaining: usize,
    total: usize,
    transaction_size: usize,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize, transaction_size: usize) -> Self {
        Self {
            step: 0,
            remaining: total,
            total,
            transaction_size,
        }
    }

    pub(crate) fn step(&self) -> usize {
        self.step
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// Records a successful transaction of `len` records at `step` and returns the
    /// post-fold snapshot.
    pub(crate) fn mark_folded(&mut self, step: usize, len: usize) -> BatchProgress {
        self.remaining = self.remaining.saturating_sub(len);
        self.step = step;
        BatchProgress {
            remaining: self.remaining,
            step,
            transaction_size: self.transaction_size,
            total: self.total,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.step += 1;
    }
}
