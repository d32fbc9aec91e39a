use super::transaction::Transaction;
use crate::runtime::error::BatchJobError;
use std::iter::FusedIterator;

/// Number of transactions produced for `total` records, i.e. `ceil(total / transaction_size)`.
#[must_use]
pub fn transaction_count(total: usize, transaction_size: usize) -> usize {
    if transaction_size == 0 {
        return 0;
    }
    total.div_ceil(transaction_size)
}

/// Derives the transaction at `step`, clipped to the input bounds.
///
/// Steps past the end yield an empty transaction, which the sequential runner treats as
/// exhaustion.
pub fn transaction_at<T>(records: &[T], transaction_size: usize, step: usize) -> Transaction<'_, T> {
    let start = step.saturating_mul(transaction_size).min(records.len());
    let end = start.saturating_add(transaction_size).min(records.len());
    Transaction::new(step, start, &records[start..end])
}

/// Lazily splits `records` into ordered transactions of `transaction_size` records.
pub fn transactions<T>(
    records: &[T],
    transaction_size: usize,
) -> Result<Transactions<'_, T>, BatchJobError> {
    if transaction_size == 0 {
        return Err(BatchJobError::invalid(
            "transaction_size",
            "must be greater than 0",
        ));
    }
    Ok(Transactions {
        records,
        transaction_size,
        next_step: 0,
    })
}

/// Eagerly splits `records` into ordered transactions of `transaction_size` records.
pub fn chunk_records<T>(
    records: &[T],
    transaction_size: usize,
) -> Result<Vec<Transaction<'_, T>>, BatchJobError> {
    Ok(transactions(records, transaction_size)?.collect())
}

/// Iterator returned by [`transactions`].
#[derive(Debug)]
pub struct Transactions<'a, T> {
    records: &'a [T],
    transaction_size: usize,
    next_step: usize,
}

impl<'a, T> Iterator for Transactions<'a, T> {
    type Item = Transaction<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let transaction = transaction_at(self.records, self.transaction_size, self.next_step);
        if transaction.is_empty() {
            return None;
        }
        self.next_step += 1;
        Some(transaction)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = transaction_count(self.records.len(), self.transaction_size)
            .saturating_sub(self.next_step);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Transactions<'_, T> {}

impl<T> FusedIterator for Transactions<'_, T> {}
