//! Combined-row decoding

use std::borrow::Cow;

use serde_json::Value as Json;
use tracing::{debug, trace};

use super::coerce::coerce;
use super::error::DecodeError;
use crate::query::{OutputKind, RowShape, SubQuerySpec};
use crate::result::{BatchResult, QueryResult, Row, Value};
use crate::semantic_model::{ColumnSpec, SemanticType};

/// Split the combined row back into one result per spec
///
/// `raw_row` holds one value per embedded spec, in spec order; always-empty
/// specs have no column and decode to their empty result.
pub fn decode(specs: &[SubQuerySpec], raw_row: &[Json]) -> Result<BatchResult, DecodeError> {
    let expected = specs.iter().filter(|s| s.is_embedded()).count();
    if raw_row.len() != expected {
        return Err(DecodeError::ColumnCount {
            expected,
            actual: raw_row.len(),
        });
    }

    let mut columns = raw_row.iter();
    let mut results = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        let result = if spec.always_empty {
            empty_result(index, spec)?
        } else {
            let Some(raw) = columns.next() else {
                return Err(DecodeError::ColumnCount {
                    expected,
                    actual: raw_row.len(),
                });
            };
            decode_column(index, spec, raw)?
        };
        results.push(result);
    }

    debug!(queries = results.len(), columns = expected, "Decoded combined row");
    Ok(BatchResult::new(results))
}

/// Result of a query known to match nothing
///
/// A non-nullable integer scalar is a count and reads 0.
fn empty_result(index: usize, spec: &SubQuerySpec) -> Result<QueryResult, DecodeError> {
    Ok(match &spec.output_kind {
        OutputKind::RowSet(shape) => shape_rows(*shape, Vec::new()),
        OutputKind::Object => QueryResult::Object(None),
        OutputKind::Scalar { semantic_type, nullable } => match (semantic_type, nullable) {
            (_, true) => QueryResult::Scalar(Value::Null),
            (SemanticType::Integer, false) => QueryResult::Scalar(Value::Integer(0)),
            (_, false) => {
                return Err(DecodeError::UnexpectedNull {
                    query: index,
                    column: "value".to_string(),
                })
            }
        },
    })
}

fn decode_column(index: usize, spec: &SubQuerySpec, raw: &Json) -> Result<QueryResult, DecodeError> {
    match &spec.output_kind {
        OutputKind::RowSet(shape) => {
            let document = parse_document(index, raw)?;
            let Json::Array(items) = document.as_ref() else {
                return Err(invalid(index, "array", &document));
            };
            let rows = items
                .iter()
                .enumerate()
                .map(|(row, item)| decode_row(index, row, &spec.column_specs, item))
                .collect::<Result<Vec<_>, _>>()?;
            trace!(query = index, rows = rows.len(), "Decoded row set");
            Ok(shape_rows(*shape, rows))
        }
        OutputKind::Object => {
            let document = parse_document(index, raw)?;
            match document.as_ref() {
                Json::Null => Ok(QueryResult::Object(None)),
                item @ Json::Object(_) => Ok(QueryResult::Object(Some(decode_row(index, 0, &spec.column_specs, item)?))),
                other => Err(invalid(index, "object", other)),
            }
        }
        OutputKind::Scalar { semantic_type, nullable } => {
            let value = coerce_column(index, "value", semantic_type, *nullable, raw)?;
            Ok(QueryResult::Scalar(value))
        }
    }
}

/// Aggregates handed back as text are parsed; JSON values are borrowed
fn parse_document(index: usize, raw: &Json) -> Result<Cow<'_, Json>, DecodeError> {
    match raw {
        Json::String(text) => serde_json::from_str(text)
            .map(Cow::Owned)
            .map_err(|source| DecodeError::InvalidJson { query: index, source }),
        other => Ok(Cow::Borrowed(other)),
    }
}

fn decode_row(index: usize, row: usize, columns: &[ColumnSpec], item: &Json) -> Result<Row, DecodeError> {
    let Json::Object(map) = item else {
        return Err(invalid(index, "object", item));
    };
    let mut decoded = Row::with_capacity(columns.len());
    for column in columns {
        let raw = map.get(&column.name).ok_or_else(|| DecodeError::MissingColumn {
            query: index,
            row,
            column: column.name.clone(),
        })?;
        let value = coerce_column(index, &column.name, column.semantic_type(), column.nullable, raw)?;
        decoded.push(column.name.clone(), value);
    }
    Ok(decoded)
}

fn coerce_column(
    index: usize,
    name: &str,
    semantic_type: &SemanticType,
    nullable: bool,
    raw: &Json,
) -> Result<Value, DecodeError> {
    let value = coerce(semantic_type, raw).map_err(|source| DecodeError::Coerce {
        query: index,
        column: name.to_string(),
        source,
    })?;
    if value.is_null() && !nullable {
        return Err(DecodeError::UnexpectedNull {
            query: index,
            column: name.to_string(),
        });
    }
    Ok(value)
}

fn shape_rows(shape: RowShape, rows: Vec<Row>) -> QueryResult {
    match shape {
        RowShape::Rows => QueryResult::Rows(rows),
        RowShape::Tuples => QueryResult::Tuples(rows.into_iter().map(Row::into_values).collect()),
        RowShape::Flat => QueryResult::Flat(
            rows.into_iter()
                .filter_map(|row| row.into_values().into_iter().next())
                .collect(),
        ),
    }
}

fn invalid(index: usize, expected: &'static str, found: &Json) -> DecodeError {
    let found = match found {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    };
    DecodeError::InvalidAggregate {
        query: index,
        expected,
        found: found.to_string(),
    }
}
