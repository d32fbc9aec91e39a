/// Errors that stop a batch job before any transaction runs.
///
/// Executor failures are never surfaced here; they are reported through the error callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchJobError {
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
}

impl BatchJobError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending option.
    pub fn field(&self) -> &'static str {
        match self {
            BatchJobError::InvalidConfiguration { field, .. } => *field,
        }
    }
}

impl std::fmt::Display for BatchJobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchJobError::InvalidConfiguration { field, reason } => {
                write!(f, "invalid batching configuration: {field} {reason}")
            }
        }
    }
}

impl std::error::Error for BatchJobError {}
