//! Schema parser (verb module)
//!
//! Transforms YAML files into a validated Schema.

use std::path::Path;
use tracing::debug;
use crate::error::ParseError;
use crate::semantic_model::Schema;

/// Parse a schema from a YAML file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Schema, ParseError> {
    let path_str = path.as_ref().display().to_string();
    let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
        path: path_str,
        source: e,
    })?;
    parse_str(&contents)
}

/// Parse a schema from a YAML string
///
/// Every `enum(name)` column reference must resolve.
pub fn parse_str(yaml: &str) -> Result<Schema, ParseError> {
    let schema: Schema = serde_yaml::from_str(yaml)?;
    schema.validate()?;
    debug!(
        dialect = ?schema.dialect,
        models = schema.models.len(),
        enums = schema.enums.len(),
        "Parsed schema"
    );
    Ok(schema)
}
