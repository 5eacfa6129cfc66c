//! Normalizer errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The query cannot be embedded as an independent subexpression
    #[error("Unsupported {kind} query: {reason}")]
    UnsupportedQueryShape { kind: &'static str, reason: String },
    /// A query in a batch failed to normalize
    #[error("Query {index}: {source}")]
    AtPosition {
        index: usize,
        #[source]
        source: Box<NormalizeError>,
    },
}

impl NormalizeError {
    pub(crate) fn unsupported(kind: &'static str, reason: impl Into<String>) -> Self {
        NormalizeError::UnsupportedQueryShape {
            kind,
            reason: reason.into(),
        }
    }
}
