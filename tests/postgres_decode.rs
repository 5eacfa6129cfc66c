//! Integration tests for decoding PostgreSQL-shaped results
//!
//! The executor replays a row recorded from PostgreSQL for the combined
//! statement: `json_agg` / `row_to_json` documents with bare `numeric`
//! numbers, and `to_json` scalars that arrive as JSON strings.

mod common;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{json, Value as Json};
use thiserror::Error;
use uuid::Uuid;

use common::{load_fixture, PRODUCT_COLUMNS};
use single_query_fetch::{
    fetch, ColumnSpec, DecodeError, Dialect, Execute, FetchError, Param, Query, QueryResult, RawRow,
    SemanticType, Value,
};

/// One row as a PostgreSQL driver hands back the combined statement
const RECORDED_ROW: &str = r#"[
    [
        {"id": 1, "store_id": 1, "name": "Espresso", "price": 2.50, "in_stock": true,
         "sku": "67e55044-10b1-426f-9247-bb680e5fe0c8", "added_at": "2024-01-05T08:30:00+00:00",
         "attributes": {"roast": "dark", "sizes": [1, 2]}},
        {"id": 2, "store_id": 1, "name": "Grinder", "price": 12345678901234567890.123456789, "in_stock": false,
         "sku": "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11", "added_at": "2024-02-10T14:00:00+01:00",
         "attributes": null}
    ],
    "2024-03-01T10:30:00.25+00:00",
    "3f333df6-90a4-4fda-8dd3-9485d27cee36",
    "NaN",
    3,
    {"total": 12345678901234567892.623456789, "stocked": 1, "first_added": "2024-01-05T08:30:00"},
    "2019-04-01"
]"#;

#[derive(Debug, Error)]
#[error("replay exhausted")]
struct Exhausted;

/// Replays recorded rows and keeps the statement it was asked to run
#[derive(Default)]
struct Replay {
    rows: Vec<RawRow>,
    calls: Vec<(String, Vec<Param>)>,
}

impl Replay {
    fn recorded(text: &str) -> Self {
        let row: RawRow = serde_json::from_str(text).expect("Recorded row should be a JSON array");
        Self {
            rows: vec![row],
            ..Default::default()
        }
    }
}

impl Execute for Replay {
    type Error = Exhausted;

    fn fetch_rows(&mut self, sql: &str, params: &[Param]) -> Result<Vec<RawRow>, Exhausted> {
        self.calls.push((sql.to_string(), params.to_vec()));
        if self.rows.is_empty() {
            return Err(Exhausted);
        }
        Ok(std::mem::take(&mut self.rows))
    }
}

fn batch_queries() -> Vec<Query> {
    let schema = load_fixture("store.yaml");
    vec![
        schema
            .rows(
                "product",
                format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE store_id = $1 ORDER BY id"),
                vec![1.into()],
            )
            .unwrap(),
        Query::scalar("SELECT MAX(added_at) FROM product", vec![], SemanticType::DateTime, true),
        Query::scalar("SELECT sku FROM product WHERE id = $1", vec![3.into()], SemanticType::Uuid, false),
        Query::scalar("SELECT 'NaN'::float8", vec![], SemanticType::Float, false),
        Query::count(schema.rows("store", "SELECT id, name, opened_on, status, rating FROM store", vec![]).unwrap()),
        Query::aggregate(
            "SELECT SUM(price) AS total, SUM(in_stock::int) AS stocked, MIN(added_at) AS first_added \
             FROM product WHERE store_id = $1",
            vec![1.into()],
            vec![
                ColumnSpec::nullable("total", SemanticType::Decimal),
                ColumnSpec::nullable("stocked", SemanticType::Integer),
                ColumnSpec::nullable("first_added", SemanticType::DateTime),
            ],
        ),
        Query::scalar("SELECT opened_on FROM store WHERE id = $1", vec![1.into()], SemanticType::Date, false),
    ]
}

// =============================================================================
// Recorded row
// =============================================================================

#[test]
fn test_recorded_row_decodes() {
    let queries = batch_queries();
    let mut db = Replay::recorded(RECORDED_ROW);
    let batch = fetch(&queries, Dialect::Postgres, &mut db).expect("Batch should decode");

    assert_eq!(db.calls.len(), 1);
    let (sql, params) = &db.calls[0];
    assert!(sql.contains("store_id = $1 ORDER BY id"));
    assert!(sql.contains("WHERE id = $2"));
    assert!(sql.contains("WHERE store_id = $3"));
    assert!(sql.contains("WHERE id = $4"));
    assert_eq!(params, &vec![Param::Int(1), Param::Int(3), Param::Int(1), Param::Int(1)]);

    let rows = batch[0].as_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("price"), Some(&Value::Decimal(Decimal::new(250, 2))));
    assert_eq!(
        rows[1].get("price"),
        Some(&Value::Decimal(Decimal::from_str("12345678901234567890.123456789").unwrap()))
    );
    assert_eq!(rows[0].get("in_stock"), Some(&Value::Boolean(true)));
    assert_eq!(rows[0].get("attributes"), Some(&Value::Json(json!({"roast": "dark", "sizes": [1, 2]}))));
    assert_eq!(rows[1].get("attributes"), Some(&Value::Null));
    assert_eq!(
        rows[1].get("added_at"),
        Some(&Value::DateTime(DateTime::parse_from_rfc3339("2024-02-10T14:00:00+01:00").unwrap()))
    );
}

#[test]
fn test_to_json_scalars_decode_from_strings() {
    let queries = batch_queries();
    let mut db = Replay::recorded(RECORDED_ROW);
    let batch = fetch(&queries, Dialect::Postgres, &mut db).unwrap();

    assert_eq!(
        batch[1],
        QueryResult::Scalar(Value::DateTime(DateTime::parse_from_rfc3339("2024-03-01T10:30:00.25+00:00").unwrap()))
    );
    assert_eq!(
        batch[2],
        QueryResult::Scalar(Value::Uuid(Uuid::parse_str("3f333df6-90a4-4fda-8dd3-9485d27cee36").unwrap()))
    );
    match &batch[3] {
        QueryResult::Scalar(Value::Float(f)) => assert!(f.is_nan()),
        other => panic!("Expected a NaN float, got {:?}", other),
    }
    assert_eq!(batch[4], QueryResult::Scalar(Value::Integer(3)));
    assert_eq!(
        batch[6],
        QueryResult::Scalar(Value::Date(NaiveDate::from_ymd_opt(2019, 4, 1).unwrap()))
    );
}

#[test]
fn test_numeric_aggregate_is_exact() {
    let queries = batch_queries();
    let mut db = Replay::recorded(RECORDED_ROW);
    let batch = fetch(&queries, Dialect::Postgres, &mut db).unwrap();

    let totals = batch[5].as_object().unwrap().unwrap();
    assert_eq!(
        totals.try_get::<Decimal>("total").unwrap().to_string(),
        "12345678901234567892.623456789"
    );
    assert_eq!(totals.get("stocked"), Some(&Value::Integer(1)));
    assert_eq!(
        totals.get("first_added"),
        Some(&Value::Timestamp(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(8, 30, 0).unwrap()))
    );
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_numeric_outside_decimal_range_fails() {
    let queries = vec![Query::scalar("SELECT 1e40::numeric", vec![], SemanticType::Decimal, false)];
    let mut db = Replay {
        rows: vec![vec![Json::Number(serde_json::Number::from_str("1e40").unwrap())]],
        ..Default::default()
    };
    let err = fetch(&queries, Dialect::Postgres, &mut db).unwrap_err();
    assert!(matches!(err, FetchError::Decode(DecodeError::Coerce { query: 0, .. })), "Got {:?}", err);
}
