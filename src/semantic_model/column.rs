//! Column definitions for sub-query projections

use serde::Deserialize;
use super::types::SemanticType;

/// A projected column with its semantic type
///
/// Order and types must match the sub-query's projection exactly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    /// Semantic type (e.g., integer, decimal, datetime, enum(status))
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnSpec {
    /// A non-nullable column
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            nullable: false,
        }
    }

    /// A nullable column
    pub fn nullable(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            nullable: true,
        }
    }

    /// Get the semantic type of this column
    pub fn semantic_type(&self) -> &SemanticType {
        &self.semantic_type
    }
}
