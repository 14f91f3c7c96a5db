use core::fmt::{Display, Formatter};
use core::time::Duration;
use std::sync::Arc;

/// Why a single repository could not be analysed.
///
/// Every variant is scoped to one batch entry; none of them stop the rest of the batch.
#[derive(Debug, Clone)]
pub enum FailureReason {
    /// The input could not be turned into an `owner/name` pair.
    InvalidReference { input: Arc<str>, problem: &'static str },

    /// One of the upstream queries failed or returned a non-success status.
    Fetch(Arc<ohno::AppError>),

    /// The upstream queries did not all complete within the per-repository time budget.
    Timeout(Duration),

    /// The upstream answered successfully but a required field was absent.
    MalformedSnapshot { field: &'static str },
}

impl FailureReason {
    pub(crate) fn fetch(error: ohno::AppError) -> Self {
        Self::Fetch(Arc::new(error))
    }

    /// Returns `true` if the failure happened before any request was made.
    #[must_use]
    pub const fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference { .. })
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidReference { input, problem } => write!(f, "invalid repository reference '{input}': {problem}"),
            Self::Fetch(e) => write!(f, "{e:#}"),
            Self::Timeout(after) => write!(f, "fetch timed out after {}s", after.as_secs()),
            Self::MalformedSnapshot { field } => write!(f, "malformed repository data: missing '{field}'"),
        }
    }
}
