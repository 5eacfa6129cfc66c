//! Normalized sub-query specifications

use super::param::Param;
use crate::semantic_model::{ColumnSpec, SemanticType};

/// How the rows of a row set are handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowShape {
    /// Column name → value mappings
    #[default]
    Rows,
    /// Ordered value lists
    Tuples,
    /// First column of each row
    Flat,
}

/// What a sub-query's embedded expression produces
#[derive(Debug, Clone, PartialEq)]
pub enum OutputKind {
    /// Zero or more rows, aggregated into one JSON array
    RowSet(RowShape),
    /// One value
    Scalar { semantic_type: SemanticType, nullable: bool },
    /// At most one row, as a JSON object or null
    Object,
}

/// One caller query, ready to embed
///
/// Built by the normalizer, read by the combiner and the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct SubQuerySpec {
    pub raw_sql: String,
    pub parameters: Vec<Param>,
    pub output_kind: OutputKind,
    /// Projection of row-producing kinds; empty for scalars
    pub column_specs: Vec<ColumnSpec>,
    /// Known to match nothing: never embedded, decoded without a column
    pub always_empty: bool,
}

impl SubQuerySpec {
    /// Whether the combiner embeds this spec as a column
    pub fn is_embedded(&self) -> bool {
        !self.always_empty
    }
}
