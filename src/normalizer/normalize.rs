//! Query normalization
//!
//! Extracts SQL, bind parameters and the decode spec from each caller query.
//! Wrapper variants (count, get-or-none) are rewritten over their inner row
//! query here, so the combiner only ever sees three output kinds.

use std::collections::HashSet;

use super::error::NormalizeError;
use crate::combiner::Dialect;
use crate::query::{OutputKind, Query, QuerySource, RowShape, SubQuerySpec};
use crate::semantic_model::{ColumnSpec, SemanticType};
use crate::sql;

/// Statements that may open an embeddable read query
const READ_KEYWORDS: &[&str] = &["SELECT", "WITH", "VALUES", "TABLE"];

/// Keywords that change state wherever they appear
const WRITE_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "MERGE", "TRUNCATE", "DROP", "ALTER", "CREATE", "GRANT", "REVOKE",
];

/// Normalize one query
pub fn normalize(query: &Query, dialect: Dialect) -> Result<SubQuerySpec, NormalizeError> {
    let kind = query.kind_name();
    match query {
        Query::Rows { source, columns, shape, prefetch } => {
            if !prefetch.is_empty() {
                return Err(NormalizeError::unsupported(
                    kind,
                    format!("prefetch lookups [{}] need separate result sets", prefetch.join(", ")),
                ));
            }
            check_columns(kind, columns)?;
            from_source(kind, source, OutputKind::RowSet(*shape), columns.clone(), dialect)
        }
        Query::Scalar { source, semantic_type, nullable } => {
            check_type(kind, "value", semantic_type)?;
            let output_kind = OutputKind::Scalar {
                semantic_type: semantic_type.clone(),
                nullable: *nullable,
            };
            from_source(kind, source, output_kind, Vec::new(), dialect)
        }
        Query::Aggregate { source, columns } => {
            check_columns(kind, columns)?;
            from_source(kind, source, OutputKind::Object, columns.clone(), dialect)
        }
        Query::Count(inner) => {
            let inner = normalize_wrapped(kind, inner, dialect)?;
            let raw_sql = if inner.always_empty {
                String::new()
            } else {
                format!("SELECT COUNT(*) FROM (\n{}\n) AS counted", inner.raw_sql)
            };
            Ok(SubQuerySpec {
                raw_sql,
                parameters: inner.parameters,
                output_kind: OutputKind::Scalar {
                    semantic_type: SemanticType::Integer,
                    nullable: false,
                },
                column_specs: Vec::new(),
                always_empty: inner.always_empty,
            })
        }
        Query::GetOrNone(inner) => {
            let inner = normalize_wrapped(kind, inner, dialect)?;
            if inner.output_kind != OutputKind::RowSet(RowShape::Rows) {
                return Err(NormalizeError::unsupported(
                    kind,
                    "the first row is returned as a mapping; drop values_list/flat from the inner query",
                ));
            }
            Ok(SubQuerySpec {
                output_kind: OutputKind::Object,
                ..inner
            })
        }
    }
}

/// Normalize a batch, keeping positions
pub fn normalize_all(queries: &[Query], dialect: Dialect) -> Result<Vec<SubQuerySpec>, NormalizeError> {
    queries
        .iter()
        .enumerate()
        .map(|(index, query)| {
            normalize(query, dialect).map_err(|e| NormalizeError::AtPosition {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Wrappers only apply to plain row queries
fn normalize_wrapped(kind: &'static str, inner: &Query, dialect: Dialect) -> Result<SubQuerySpec, NormalizeError> {
    match inner {
        Query::Rows { .. } => normalize(inner, dialect),
        other => Err(NormalizeError::unsupported(
            kind,
            format!("wraps a {} query; only row queries can be wrapped", other.kind_name()),
        )),
    }
}

fn from_source(
    kind: &'static str,
    source: &QuerySource,
    output_kind: OutputKind,
    column_specs: Vec<ColumnSpec>,
    dialect: Dialect,
) -> Result<SubQuerySpec, NormalizeError> {
    match source {
        QuerySource::Sql { sql, params } => {
            check_read_only(kind, sql, dialect)?;
            Ok(SubQuerySpec {
                raw_sql: sql.clone(),
                parameters: params.clone(),
                output_kind,
                column_specs,
                always_empty: false,
            })
        }
        QuerySource::Empty => Ok(SubQuerySpec {
            raw_sql: String::new(),
            parameters: Vec::new(),
            output_kind,
            column_specs,
            always_empty: true,
        }),
    }
}

/// Reject anything but a single read-only statement
fn check_read_only(kind: &'static str, sql: &str, dialect: Dialect) -> Result<(), NormalizeError> {
    let lexemes = sql::tokenize(sql, dialect)
        .map_err(|e| NormalizeError::unsupported(kind, format!("unreadable SQL: {}", e)))?;

    if sql::is_blank(&lexemes) {
        return Err(NormalizeError::unsupported(kind, "SQL is empty"));
    }

    let mut words = sql::words(&lexemes).peekable();
    match words.peek() {
        Some(first) if READ_KEYWORDS.iter().any(|k| first.eq_ignore_ascii_case(k)) => {}
        Some(first) => {
            return Err(NormalizeError::unsupported(
                kind,
                format!("`{}` statements are not read queries", first.to_uppercase()),
            ));
        }
        None => return Err(NormalizeError::unsupported(kind, "SQL has no statement keyword")),
    }

    let mut previous: Option<&str> = None;
    for word in words {
        if let Some(write) = WRITE_KEYWORDS.iter().find(|k| word.eq_ignore_ascii_case(k)) {
            return Err(NormalizeError::unsupported(kind, format!("`{}` modifies state", write)));
        }
        // FOR SHARE / FOR NO KEY UPDATE / FOR KEY SHARE row locks
        if previous.is_some_and(|p| p.eq_ignore_ascii_case("FOR"))
            && ["SHARE", "NO", "KEY"].iter().any(|k| word.eq_ignore_ascii_case(k))
        {
            return Err(NormalizeError::unsupported(kind, "row-locking clauses take locks"));
        }
        previous = Some(word);
    }

    Ok(())
}

fn check_columns(kind: &'static str, columns: &[ColumnSpec]) -> Result<(), NormalizeError> {
    if columns.is_empty() {
        return Err(NormalizeError::unsupported(kind, "no columns declared"));
    }
    let mut seen = HashSet::new();
    for column in columns {
        // Row objects are keyed by column name
        if !seen.insert(column.name.as_str()) {
            return Err(NormalizeError::unsupported(
                kind,
                format!("column '{}' is projected more than once; alias it", column.name),
            ));
        }
        check_type(kind, &column.name, &column.semantic_type)?;
    }
    Ok(())
}

fn check_type(kind: &'static str, column: &str, semantic_type: &SemanticType) -> Result<(), NormalizeError> {
    match semantic_type {
        SemanticType::Enum(e) if !e.is_resolved() => Err(NormalizeError::unsupported(
            kind,
            format!("column '{}' references enum '{}' with no declared values", column, e.name),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Param;
    use crate::semantic_model::EnumType;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", SemanticType::Integer),
            ColumnSpec::nullable("name", SemanticType::Text),
        ]
    }

    fn reason(err: NormalizeError) -> String {
        match err {
            NormalizeError::UnsupportedQueryShape { reason, .. } => reason,
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_normalize_rows() {
        let query = Query::rows("SELECT id, name FROM t WHERE id = $1", vec![Param::Int(7)], columns());
        let spec = normalize(&query, Dialect::Postgres).unwrap();
        assert_eq!(spec.raw_sql, "SELECT id, name FROM t WHERE id = $1");
        assert_eq!(spec.parameters, vec![Param::Int(7)]);
        assert_eq!(spec.output_kind, OutputKind::RowSet(RowShape::Rows));
        assert_eq!(spec.column_specs.len(), 2);
        assert!(!spec.always_empty);
    }

    #[test]
    fn test_normalize_flat_keeps_shape() {
        let query = Query::rows("SELECT id FROM t", vec![], columns()).flat();
        let spec = normalize(&query, Dialect::Postgres).unwrap();
        assert_eq!(spec.output_kind, OutputKind::RowSet(RowShape::Flat));
    }

    #[test]
    fn test_normalize_count_wraps_inner_sql() {
        let inner = Query::rows("SELECT id, name FROM t WHERE id > $1", vec![Param::Int(1)], columns());
        let spec = normalize(&Query::count(inner), Dialect::Postgres).unwrap();
        assert_eq!(spec.raw_sql, "SELECT COUNT(*) FROM (\nSELECT id, name FROM t WHERE id > $1\n) AS counted");
        assert_eq!(spec.parameters, vec![Param::Int(1)]);
        assert_eq!(
            spec.output_kind,
            OutputKind::Scalar { semantic_type: SemanticType::Integer, nullable: false }
        );
    }

    #[test]
    fn test_normalize_get_or_none_is_object() {
        let inner = Query::rows("SELECT id, name FROM t", vec![], columns());
        let spec = normalize(&Query::get_or_none(inner), Dialect::Postgres).unwrap();
        assert_eq!(spec.output_kind, OutputKind::Object);
        assert_eq!(spec.column_specs, columns());
    }

    #[test]
    fn test_get_or_none_rejects_shaped_inner_query() {
        let inner = Query::rows("SELECT id, name FROM t", vec![], columns()).values_list();
        let err = normalize(&Query::get_or_none(inner), Dialect::Postgres).unwrap_err();
        assert!(reason(err).contains("values_list"));

        let inner = Query::rows("SELECT id FROM t", vec![], columns()).flat();
        assert!(normalize(&Query::get_or_none(inner), Dialect::Sqlite).is_err());

        // Counting ignores the shape
        let inner = Query::rows("SELECT id FROM t", vec![], columns()).flat();
        assert!(normalize(&Query::count(inner), Dialect::Postgres).is_ok());
    }

    #[test]
    fn test_normalize_always_empty() {
        let query = Query::count(Query::rows("SELECT id FROM t WHERE id IN ()", vec![], columns())).always_empty();
        let spec = normalize(&query, Dialect::Postgres).unwrap();
        assert!(spec.always_empty);
        assert!(spec.raw_sql.is_empty());
    }

    #[test]
    fn test_rejects_mutations() {
        let query = Query::rows("DELETE FROM t RETURNING id, name", vec![], columns());
        let err = normalize(&query, Dialect::Postgres).unwrap_err();
        assert!(reason(err).contains("DELETE"));

        let query = Query::rows("WITH gone AS (DELETE FROM t RETURNING *) SELECT id, name FROM gone", vec![], columns());
        assert!(normalize(&query, Dialect::Postgres).is_err());
    }

    #[test]
    fn test_rejects_row_locks() {
        let query = Query::rows("SELECT id, name FROM t FOR UPDATE", vec![], columns());
        assert!(normalize(&query, Dialect::Postgres).is_err());
        let query = Query::rows("SELECT id, name FROM t FOR SHARE", vec![], columns());
        assert!(normalize(&query, Dialect::Postgres).is_err());
    }

    #[test]
    fn test_keywords_inside_literals_are_fine() {
        let query = Query::rows("SELECT id, name FROM t WHERE name = 'DELETE me'", vec![], columns());
        assert!(normalize(&query, Dialect::Postgres).is_ok());
    }

    #[test]
    fn test_rejects_prefetch() {
        let query = Query::rows("SELECT id, name FROM t", vec![], columns()).with_prefetch("products");
        let err = normalize(&query, Dialect::Postgres).unwrap_err();
        assert!(reason(err).contains("products"));
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let cols = vec![
            ColumnSpec::new("id", SemanticType::Integer),
            ColumnSpec::new("id", SemanticType::Integer),
        ];
        let query = Query::rows("SELECT a.id, b.id FROM a JOIN b ON true", vec![], cols);
        let err = normalize(&query, Dialect::Postgres).unwrap_err();
        assert!(reason(err).contains("more than once"));
    }

    #[test]
    fn test_rejects_unresolved_enum() {
        let cols = vec![ColumnSpec::new("status", SemanticType::Enum(EnumType::named("status")))];
        let query = Query::rows("SELECT status FROM t", vec![], cols);
        assert!(normalize(&query, Dialect::Postgres).is_err());
    }

    #[test]
    fn test_rejects_count_of_scalar() {
        let inner = Query::scalar("SELECT 1", vec![], SemanticType::Integer, false);
        assert!(normalize(&Query::count(inner), Dialect::Postgres).is_err());
    }

    #[test]
    fn test_normalize_all_reports_position() {
        let queries = vec![
            Query::rows("SELECT id, name FROM t", vec![], columns()),
            Query::rows("", vec![], columns()),
        ];
        let err = normalize_all(&queries, Dialect::Postgres).unwrap_err();
        assert!(matches!(err, NormalizeError::AtPosition { index: 1, .. }));
    }
}
