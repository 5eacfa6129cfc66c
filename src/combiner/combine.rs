//! Query combination
//!
//! Builds one statement that embeds every sub-query as an independent
//! subexpression and yields exactly one row.

use tracing::{debug, trace};

use super::dialect::Dialect;
use super::error::CombineError;
use super::placeholder::renumber;
use super::sql::{emit_expression, emit_statement};
use crate::query::{Param, SubQuerySpec};

/// The single statement sent to the database
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedStatement {
    pub sql: String,
    /// Every embedded spec's parameters, in spec order
    pub parameters: Vec<Param>,
    /// Input position of the spec behind each output column
    pub columns: Vec<usize>,
}

impl CombinedStatement {
    /// True when every spec was resolved without SQL; nothing to execute
    pub fn is_noop(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Combine normalized sub-queries into one statement
pub fn combine(specs: &[SubQuerySpec], dialect: Dialect) -> Result<CombinedStatement, CombineError> {
    if specs.is_empty() {
        return Err(CombineError::EmptyBatch);
    }

    let mut expressions = Vec::with_capacity(specs.len());
    let mut parameters = Vec::new();
    let mut columns = Vec::with_capacity(specs.len());

    for (index, spec) in specs.iter().enumerate() {
        if !spec.is_embedded() {
            continue;
        }

        let renumbered = renumber(index, &spec.raw_sql, dialect, parameters.len())?;
        if renumbered.highest != spec.parameters.len() {
            return Err(CombineError::ParameterMismatch {
                index,
                highest: renumbered.highest,
                bound: spec.parameters.len(),
            });
        }

        expressions.push((index, emit_expression(spec, &renumbered.sql, dialect)));
        parameters.extend(spec.parameters.iter().cloned());
        columns.push(index);
    }

    let sql = if expressions.is_empty() {
        String::new()
    } else {
        emit_statement(&expressions)
    };

    debug!(
        queries = specs.len(),
        embedded = columns.len(),
        parameters = parameters.len(),
        ?dialect,
        "Combined sub-queries"
    );
    trace!(sql = %sql, "Combined statement");

    Ok(CombinedStatement { sql, parameters, columns })
}
