use anyhow::Error as AnyError;

/// Result of running the executor on a single transaction.
///
/// Failures are values, not errors of the run: the runners report them through
/// `on_batch_error` and then decide whether to retry, halt, or skip the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome<K, E = AnyError> {
    Success(K),
    Failure(Option<E>),
}

impl<K, E> BatchOutcome<K, E> {
    /// Failure carrying a caller-defined error payload.
    pub fn failure(error: E) -> Self {
        Self::Failure(Some(error))
    }

    /// Failure without any payload.
    pub fn failed() -> Self {
        Self::Failure(None)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn success(self) -> Option<K> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => error.as_ref(),
        }
    }

    pub fn map<V, F>(self, f: F) -> BatchOutcome<V, E>
    where
        F: FnOnce(K) -> V,
    {
        match self {
            Self::Success(value) => BatchOutcome::Success(f(value)),
            Self::Failure(error) => BatchOutcome::Failure(error),
        }
    }
}

impl<K, E> From<Result<K, E>> for BatchOutcome<K, E> {
    fn from(result: Result<K, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(Some(error)),
        }
    }
}
