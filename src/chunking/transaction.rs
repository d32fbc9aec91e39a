use std::ops::Range;

/// A contiguous slice of the input that the executor processes as one unit.
#[derive(Debug, PartialEq, Eq)]
pub struct Transaction<'a, T> {
    index: usize,
    offset: usize,
    records: &'a [T],
}

impl<'a, T> Transaction<'a, T> {
    pub(crate) fn new(index: usize, offset: usize, records: &'a [T]) -> Self {
        Self {
            index,
            offset,
            records,
        }
    }

    /// Position of this transaction among all transactions of the run.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the first record of this transaction in the full input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn records(&self) -> &'a [T] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Input indices covered by this transaction.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.records.len()
    }
}

impl<T> Clone for Transaction<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Transaction<'_, T> {}
