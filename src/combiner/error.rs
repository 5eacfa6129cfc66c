//! Combiner errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CombineError {
    /// No sub-queries were given
    #[error("Nothing to combine: the batch is empty")]
    EmptyBatch,
    /// The sub-query cannot be placed inside a derived table
    #[error("Query {index} cannot be embedded: {reason}")]
    Unembeddable { index: usize, reason: String },
    /// Placeholders and bound parameters disagree
    #[error("Query {index} references {highest} parameters but binds {bound}")]
    ParameterMismatch {
        index: usize,
        highest: usize,
        bound: usize,
    },
}

impl CombineError {
    pub(crate) fn unembeddable(index: usize, reason: impl Into<String>) -> Self {
        CombineError::Unembeddable {
            index,
            reason: reason.into(),
        }
    }
}
