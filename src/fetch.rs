//! Single-round-trip fetch
//!
//! Runs the whole pipeline around a borrowed database client: normalize every
//! query, combine them into one statement, execute it once, decode the one row
//! back into per-query results.

use thiserror::Error;
use tracing::debug;

use crate::combiner::{combine, CombinedStatement, Dialect};
use crate::decoder::decode;
use crate::error::FetchError;
use crate::normalizer::normalize_all;
use crate::query::{Param, Query, SubQuerySpec};
use crate::result::BatchResult;
use crate::semantic_model::Schema;

/// One raw result row, one JSON value per column
pub type RawRow = Vec<serde_json::Value>;

/// A database client able to run one parameterized statement
///
/// Implementations bind `params` positionally and hand back every column as
/// JSON: aggregates as arrays or objects (or their text), scalars as the
/// closest JSON value. Errors are surfaced to the caller unchanged.
pub trait Execute {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_rows(&mut self, sql: &str, params: &[Param]) -> Result<Vec<RawRow>, Self::Error>;
}

impl<E: Execute + ?Sized> Execute for &mut E {
    type Error = E::Error;

    fn fetch_rows(&mut self, sql: &str, params: &[Param]) -> Result<Vec<RawRow>, Self::Error> {
        (**self).fetch_rows(sql, params)
    }
}

/// The database answered the combined statement with the wrong shape
#[derive(Debug, Error)]
pub enum ContractViolation {
    #[error("Combined statement returned {0} rows, expected exactly 1")]
    RowCount(usize),
    #[error("Combined statement returned {actual} columns, expected {expected}")]
    ColumnCount { expected: usize, actual: usize },
}

/// A batch of independent read queries fetched in one round trip
#[derive(Debug, Clone, Copy)]
pub struct SingleQueryFetch<'q> {
    queries: &'q [Query],
    dialect: Dialect,
}

impl<'q> SingleQueryFetch<'q> {
    pub fn new(queries: &'q [Query], dialect: Dialect) -> Self {
        Self { queries, dialect }
    }

    /// Use the dialect a schema declares
    pub fn for_schema(queries: &'q [Query], schema: &Schema) -> Self {
        Self::new(queries, schema.dialect)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Normalize and combine without executing
    pub fn prepare(&self) -> Result<(Vec<SubQuerySpec>, CombinedStatement), FetchError> {
        let specs = normalize_all(self.queries, self.dialect)?;
        let statement = combine(&specs, self.dialect)?;
        Ok((specs, statement))
    }

    /// Fetch every query with at most one statement execution
    ///
    /// `results[i]` corresponds to `queries[i]`. Nothing is executed when
    /// every query is known to match nothing.
    pub fn execute<E: Execute>(&self, executor: &mut E) -> Result<BatchResult, FetchError> {
        let (specs, statement) = self.prepare()?;

        let raw_row = if statement.is_noop() {
            debug!(queries = specs.len(), "Every query is empty, skipping execution");
            RawRow::new()
        } else {
            run(executor, &statement)?
        };

        Ok(decode(&specs, &raw_row)?)
    }
}

/// Fetch a batch in one round trip
pub fn fetch<E: Execute>(queries: &[Query], dialect: Dialect, executor: &mut E) -> Result<BatchResult, FetchError> {
    SingleQueryFetch::new(queries, dialect).execute(executor)
}

fn run<E: Execute>(executor: &mut E, statement: &CombinedStatement) -> Result<RawRow, FetchError> {
    debug!(
        columns = statement.columns.len(),
        parameters = statement.parameters.len(),
        "Executing combined statement"
    );

    let mut rows = executor
        .fetch_rows(&statement.sql, &statement.parameters)
        .map_err(|e| FetchError::Database(Box::new(e)))?;

    if rows.len() != 1 {
        return Err(ContractViolation::RowCount(rows.len()).into());
    }
    let row = rows.swap_remove(0);
    if row.len() != statement.columns.len() {
        return Err(ContractViolation::ColumnCount {
            expected: statement.columns.len(),
            actual: row.len(),
        }
        .into());
    }
    Ok(row)
}
