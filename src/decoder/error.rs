//! Decoder errors

use thiserror::Error;

/// A raw value that does not fit its declared semantic type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("expected {expected}, found {found}")]
    Mismatch { expected: String, found: String },
    #[error("'{value}' is not a member of enum '{name}'")]
    UnknownEnumValue { name: String, value: String },
}

/// Errors decoding the combined row; any of them fails the whole batch
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The row does not carry one column per embedded sub-query
    #[error("Combined row has {actual} columns, expected {expected}")]
    ColumnCount { expected: usize, actual: usize },
    /// The aggregate has the wrong JSON shape
    #[error("Query {query}: expected a JSON {expected}, found {found}")]
    InvalidAggregate {
        query: usize,
        expected: &'static str,
        found: String,
    },
    /// The aggregate arrived as text that does not parse
    #[error("Query {query}: aggregate is not valid JSON: {source}")]
    InvalidJson {
        query: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Query {query}: row {row} has no column '{column}'")]
    MissingColumn { query: usize, row: usize, column: String },
    #[error("Query {query}: column '{column}' is not nullable but decoded null")]
    UnexpectedNull { query: usize, column: String },
    #[error("Query {query}: column '{column}': {source}")]
    Coerce {
        query: usize,
        column: String,
        #[source]
        source: CoerceError,
    },
    /// Raised by materialization hooks
    #[error("Column '{column}': {message}")]
    Materialize { column: String, message: String },
    #[error("Expected a {expected} result, found {found}")]
    WrongResultKind {
        expected: &'static str,
        found: &'static str,
    },
}
