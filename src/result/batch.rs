//! Per-query results

use std::ops::Index;

use super::materialize::{FromRow, FromValue};
use super::row::Row;
use super::value::Value;
use crate::decoder::DecodeError;

/// What one query produced, exactly as if it had run alone
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Row mappings
    Rows(Vec<Row>),
    /// Rows as ordered value lists
    Tuples(Vec<Vec<Value>>),
    /// First column of each row
    Flat(Vec<Value>),
    /// At most one row (get-or-none, aggregate)
    Object(Option<Row>),
    /// One value (count, scalar)
    Scalar(Value),
}

impl QueryResult {
    /// Variant name, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            QueryResult::Rows(_) => "rows",
            QueryResult::Tuples(_) => "tuples",
            QueryResult::Flat(_) => "flat",
            QueryResult::Object(_) => "object",
            QueryResult::Scalar(_) => "scalar",
        }
    }

    pub fn as_rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            QueryResult::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<Option<&Row>> {
        match self {
            QueryResult::Object(row) => Some(row.as_ref()),
            _ => None,
        }
    }

    /// Materialize every row through the caller's `FromRow`
    pub fn into_objects<T: FromRow>(self) -> Result<Vec<T>, DecodeError> {
        match self {
            QueryResult::Rows(rows) => rows.iter().map(T::from_row).collect(),
            other => Err(other.wrong_kind("rows")),
        }
    }

    /// Materialize the single row, if any
    pub fn into_object<T: FromRow>(self) -> Result<Option<T>, DecodeError> {
        match self {
            QueryResult::Object(row) => row.as_ref().map(T::from_row).transpose(),
            other => Err(other.wrong_kind("object")),
        }
    }

    /// Read the scalar as a Rust type
    pub fn into_scalar<T: FromValue>(self) -> Result<T, DecodeError> {
        match self {
            QueryResult::Scalar(value) => T::from_value(&value).ok_or_else(|| DecodeError::Materialize {
                column: "value".to_string(),
                message: format!("cannot read {} as {}", value.type_name(), std::any::type_name::<T>()),
            }),
            other => Err(other.wrong_kind("scalar")),
        }
    }

    fn wrong_kind(&self, expected: &'static str) -> DecodeError {
        DecodeError::WrongResultKind {
            expected,
            found: self.kind_name(),
        }
    }
}

/// Results of a batch; `results[i]` belongs to input query `i`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    results: Vec<QueryResult>,
}

impl BatchResult {
    pub fn new(results: Vec<QueryResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueryResult> {
        self.results.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryResult> {
        self.results.iter()
    }

    pub fn into_vec(self) -> Vec<QueryResult> {
        self.results
    }
}

impl Index<usize> for BatchResult {
    type Output = QueryResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.results[index]
    }
}

impl IntoIterator for BatchResult {
    type Item = QueryResult;
    type IntoIter = std::vec::IntoIter<QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
