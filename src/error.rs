//! Error types for single-query-fetch

use thiserror::Error;

use crate::combiner::CombineError;
use crate::decoder::DecodeError;
use crate::fetch::ContractViolation;
use crate::normalizer::NormalizeError;

/// Errors that can occur while loading a schema
#[derive(Debug, Error)]
pub enum ParseError {
    /// IO error reading file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// YAML deserialization error
    #[error("Invalid YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
    /// The schema parsed but does not resolve
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors resolving names against a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Model '{0}' is not defined in the schema")]
    UnknownModel(String),
    #[error("Column '{model}.{column}' references undefined enum '{name}'")]
    UnknownEnum {
        model: String,
        column: String,
        name: String,
    },
}

/// Errors surfaced by a whole fetch
///
/// Every stage fails the entire batch; there is no partial result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Combine(#[from] CombineError),
    /// Error from the database client, unchanged
    #[error("Database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
