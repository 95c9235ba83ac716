//! Error types for the qs-core crate.

use qs_config::Mode;
use thiserror::Error;

/// Failures reported by a data provider.
///
/// Collectors never propagate these: a failing provider yields an empty list for its mode.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The provider does not offer this kind of data.
    #[error("{0} not available from this source")]
    Unavailable(&'static str),

    /// A mode needs a source file but none is set.
    #[error("{0} needs a source file but none is selected")]
    NoSourceFile(Mode),

    /// A requested item does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Anything else.
    #[error("{context}: {message}")]
    Failed {
        /// What was being loaded.
        context: String,
        /// Error message from the provider.
        message: String,
    },
}

impl SourceError {
    /// Creates a `Failed` error from any displayable error.
    pub fn failed(context: impl Into<String>, err: &impl ToString) -> Self {
        Self::Failed {
            context: context.into(),
            message: err.to_string(),
        }
    }
}
