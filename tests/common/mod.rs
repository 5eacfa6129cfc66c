//! Shared test utilities for integration tests

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{json, Value as Json};

use single_query_fetch::{
    coerce, parser, ColumnSpec, Execute, Param, Query, QueryResult, QuerySource, RawRow, Row,
    RowShape, Schema, SemanticType, Value,
};

const SEED: &str = r#"
CREATE TABLE store (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    opened_on TEXT NOT NULL,
    status TEXT,
    rating REAL
);
CREATE TABLE product (
    id INTEGER PRIMARY KEY,
    store_id INTEGER NOT NULL REFERENCES store(id),
    name TEXT NOT NULL,
    price TEXT NOT NULL,
    in_stock INTEGER NOT NULL,
    sku TEXT NOT NULL,
    added_at TEXT NOT NULL,
    attributes TEXT
);
INSERT INTO store VALUES
    (1, 'Downtown', '2019-04-01', 'open', 4.5),
    (2, 'Harbor', '2021-09-15', 'renovating', NULL),
    (3, 'Airport', '2023-01-10', NULL, 3.75);
INSERT INTO product VALUES
    (1, 1, 'Espresso', '2.50', 1, '67e55044-10b1-426f-9247-bb680e5fe0c8', '2024-01-05 08:30:00', '{"roast": "dark", "sizes": [1, 2]}'),
    (2, 1, 'Grinder', '12345678901234567890.123456789', 0, 'a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11', '2024-02-10T14:00:00+01:00', NULL),
    (3, 2, 'Kettle', '39.99', 1, '3f333df6-90a4-4fda-8dd3-9485d27cee36', '2024-03-15 09:45:30.250', NULL),
    (4, 1, 'Filter ''Pro''', '0.10', 1, 'c9bf9e57-1685-4c89-bafb-ff5af830be8a', '2024-03-20 10:00:00', '[]');
"#;

/// Load a test fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> Schema {
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Product projection, in select-list order
pub const PRODUCT_COLUMNS: &str = "id, store_id, name, price, in_stock, sku, added_at, attributes";

/// Product rows of one store
pub fn products_of_store(schema: &Schema, store_id: i64) -> Query {
    schema
        .rows(
            "product",
            format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE store_id = ? ORDER BY id"),
            vec![store_id.into()],
        )
        .unwrap()
}

// =============================================================================
// SQLite executor
// =============================================================================

/// In-memory SQLite database recording every statement it executes
pub struct SqliteExecutor {
    conn: Connection,
    pub statements: Vec<String>,
}

impl SqliteExecutor {
    /// A database seeded with the store catalogue
    pub fn seeded() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SEED).unwrap();
        Self {
            conn,
            statements: Vec::new(),
        }
    }

    fn query_raw(&self, sql: &str, params: &[Param]) -> rusqlite::Result<Vec<RawRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(params.iter().map(to_sqlite)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut raw = Vec::with_capacity(width);
            for i in 0..width {
                raw.push(to_json(row.get_ref(i)?));
            }
            out.push(raw);
        }
        Ok(out)
    }

    /// Run one query on its own, without the combiner, and coerce its rows
    ///
    /// This is the reference a batched fetch must be equivalent to.
    pub fn independent(&self, query: &Query) -> QueryResult {
        match query {
            Query::Rows { source, columns, shape, .. } => {
                shape_rows(*shape, self.source_rows(source, columns))
            }
            Query::Scalar { source, semantic_type, .. } => {
                let value = match source {
                    QuerySource::Sql { sql, params } => self
                        .query_raw(sql, params)
                        .unwrap()
                        .into_iter()
                        .next()
                        .and_then(|row| row.into_iter().next())
                        .unwrap_or(Json::Null),
                    QuerySource::Empty => Json::Null,
                };
                QueryResult::Scalar(coerce(semantic_type, &value).unwrap())
            }
            Query::Count(inner) => match inner.as_ref() {
                Query::Rows { source, columns, .. } => {
                    QueryResult::Scalar(Value::Integer(self.source_rows(source, columns).len() as i64))
                }
                other => panic!("Cannot count a {} query", other.kind_name()),
            },
            Query::GetOrNone(inner) => match inner.as_ref() {
                Query::Rows { source, columns, .. } => {
                    QueryResult::Object(self.source_rows(source, columns).into_iter().next())
                }
                other => panic!("Cannot get from a {} query", other.kind_name()),
            },
            Query::Aggregate { source, columns } => {
                QueryResult::Object(self.source_rows(source, columns).into_iter().next())
            }
        }
    }

    fn source_rows(&self, source: &QuerySource, columns: &[ColumnSpec]) -> Vec<Row> {
        let QuerySource::Sql { sql, params } = source else {
            return Vec::new();
        };
        self.query_raw(sql, params)
            .unwrap()
            .into_iter()
            .map(|raw| {
                columns
                    .iter()
                    .zip(raw)
                    .map(|(column, value)| {
                        let value = match (&column.semantic_type, value) {
                            // Stored as text; the combined path nests it with json()
                            (SemanticType::Json, Json::String(text)) => serde_json::from_str(&text).unwrap(),
                            (_, value) => value,
                        };
                        (column.name.clone(), coerce(&column.semantic_type, &value).unwrap())
                    })
                    .collect()
            })
            .collect()
    }
}

impl Execute for SqliteExecutor {
    type Error = rusqlite::Error;

    fn fetch_rows(&mut self, sql: &str, params: &[Param]) -> Result<Vec<RawRow>, Self::Error> {
        self.statements.push(sql.to_string());
        self.query_raw(sql, params)
    }
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

fn to_sqlite(param: &Param) -> SqlValue {
    match param {
        Param::Null => SqlValue::Null,
        Param::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Param::Int(i) => SqlValue::Integer(*i),
        Param::Float(f) => SqlValue::Real(*f),
        Param::Text(s) => SqlValue::Text(s.clone()),
        Param::Decimal(d) => SqlValue::Text(d.to_string()),
        Param::Uuid(u) => SqlValue::Text(u.hyphenated().to_string()),
        Param::Date(d) => SqlValue::Text(d.format("%Y-%m-%d").to_string()),
        Param::DateTime(dt) => SqlValue::Text(dt.to_rfc3339()),
        Param::Timestamp(ts) => SqlValue::Text(ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        Param::Json(j) => SqlValue::Text(j.to_string()),
    }
}

fn to_json(value: ValueRef<'_>) -> Json {
    match value {
        ValueRef::Null => Json::Null,
        ValueRef::Integer(i) => json!(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map(Json::Number).unwrap_or(Json::Null),
        ValueRef::Text(bytes) => Json::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Json::Array(bytes.iter().map(|b| json!(b)).collect()),
    }
}
