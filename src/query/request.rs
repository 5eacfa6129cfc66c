//! Caller queries
//!
//! A `Query` is what the query-definition layer hands the engine: SQL text
//! with positional parameters for the query's unmodified semantics, plus the
//! shape of what it produces. Variants are dispatched once, by the normalizer.

use super::param::Param;
use super::spec::RowShape;
use crate::semantic_model::{ColumnSpec, SemanticType};

/// Where a query's rows come from
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    /// Rendered SQL with positional placeholders and their bind values
    Sql { sql: String, params: Vec<Param> },
    /// The query-definition layer already knows nothing can match
    /// (e.g. `id IN ()`); no SQL is ever sent for it
    Empty,
}

/// A read query to be fetched as part of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Row-producing query
    Rows {
        source: QuerySource,
        /// Projection, matched to the select list by position
        columns: Vec<ColumnSpec>,
        shape: RowShape,
        /// Related lookups to prefetch with separate result sets (not embeddable)
        prefetch: Vec<String>,
    },
    /// Query producing one pre-aggregated value (first column of its single row)
    Scalar {
        source: QuerySource,
        semantic_type: SemanticType,
        nullable: bool,
    },
    /// Number of rows a row query would return
    Count(Box<Query>),
    /// First row of a row query, or nothing
    GetOrNone(Box<Query>),
    /// Single-row aggregate query whose columns form one mapping
    Aggregate {
        source: QuerySource,
        columns: Vec<ColumnSpec>,
    },
}

impl Query {
    /// A row query returning row mappings
    pub fn rows(sql: impl Into<String>, params: Vec<Param>, columns: Vec<ColumnSpec>) -> Self {
        Query::Rows {
            source: QuerySource::Sql { sql: sql.into(), params },
            columns,
            shape: RowShape::Rows,
            prefetch: Vec::new(),
        }
    }

    /// A scalar query
    pub fn scalar(
        sql: impl Into<String>,
        params: Vec<Param>,
        semantic_type: SemanticType,
        nullable: bool,
    ) -> Self {
        Query::Scalar {
            source: QuerySource::Sql { sql: sql.into(), params },
            semantic_type,
            nullable,
        }
    }

    /// An aggregate query, e.g. `SELECT SUM(price) AS total, COUNT(*) AS n FROM product`
    pub fn aggregate(sql: impl Into<String>, params: Vec<Param>, columns: Vec<ColumnSpec>) -> Self {
        Query::Aggregate {
            source: QuerySource::Sql { sql: sql.into(), params },
            columns,
        }
    }

    /// Count the rows of a row query
    pub fn count(inner: Query) -> Self {
        Query::Count(Box::new(inner))
    }

    /// First row of a row query, or `None`
    ///
    /// The inner query must return row mappings; a `values_list` or `flat`
    /// inner query is rejected when normalized.
    pub fn get_or_none(inner: Query) -> Self {
        Query::GetOrNone(Box::new(inner))
    }

    /// Return rows as ordered value lists instead of mappings
    pub fn values_list(self) -> Self {
        self.with_shape(RowShape::Tuples)
    }

    /// Return only the first column of each row
    pub fn flat(self) -> Self {
        self.with_shape(RowShape::Flat)
    }

    /// Set the row shape (row queries only)
    pub fn with_shape(mut self, new_shape: RowShape) -> Self {
        if let Query::Rows { shape, .. } = &mut self {
            *shape = new_shape;
        }
        self
    }

    /// Add a prefetch lookup (row queries only)
    pub fn with_prefetch(mut self, lookup: impl Into<String>) -> Self {
        if let Query::Rows { prefetch, .. } = &mut self {
            prefetch.push(lookup.into());
        }
        self
    }

    /// Mark the query as matching nothing, dropping its SQL
    pub fn always_empty(self) -> Self {
        match self {
            Query::Rows { columns, shape, prefetch, .. } => Query::Rows {
                source: QuerySource::Empty,
                columns,
                shape,
                prefetch,
            },
            Query::Scalar { semantic_type, nullable, .. } => Query::Scalar {
                source: QuerySource::Empty,
                semantic_type,
                nullable,
            },
            Query::Aggregate { columns, .. } => Query::Aggregate {
                source: QuerySource::Empty,
                columns,
            },
            Query::Count(inner) => Query::Count(Box::new(inner.always_empty())),
            Query::GetOrNone(inner) => Query::GetOrNone(Box::new(inner.always_empty())),
        }
    }

    /// Variant name, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Query::Rows { .. } => "rows",
            Query::Scalar { .. } => "scalar",
            Query::Count(_) => "count",
            Query::GetOrNone(_) => "get_or_none",
            Query::Aggregate { .. } => "aggregate",
        }
    }
}
