//! single-query-fetch - Fetch many independent read queries in one round trip
//!
//! This library provides:
//! - Column and schema definition types (SemanticType, ColumnSpec, Schema)
//! - Schema parsing from YAML
//! - Query normalization (caller query → SubQuerySpec)
//! - Query combination (N sub-queries → one SQL statement yielding one row)
//! - Result decoding (one row → N typed results)
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `semantic_model/` - column types and the schema catalogue (SemanticType, ColumnSpec, Schema)
//! - `query/` - caller queries and their normalized form (Query, Param, SubQuerySpec)
//! - `result/` - decoded values and per-query results (Value, Row, QueryResult, BatchResult)
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML → Schema
//! - `normalizer/` - Query → SubQuerySpec
//! - `combiner/` - SubQuerySpec × N → CombinedStatement
//! - `decoder/` - SubQuerySpec × N + one row → BatchResult
//! - `fetch` - the whole pipeline around a borrowed database client
//!
//! # Example
//!
//! ```ignore
//! use single_query_fetch::{ColumnSpec, Dialect, Query, SemanticType, SingleQueryFetch};
//!
//! let products = Query::rows(
//!     "SELECT id, name FROM product WHERE store_id = $1 ORDER BY id",
//!     vec![store_id.into()],
//!     vec![
//!         ColumnSpec::new("id", SemanticType::Integer),
//!         ColumnSpec::new("name", SemanticType::Text),
//!     ],
//! );
//! let stores = Query::count(Query::rows("SELECT id FROM store", vec![], vec![ColumnSpec::new("id", SemanticType::Integer)]));
//!
//! let results = SingleQueryFetch::new(&[products, stores], Dialect::Postgres).execute(&mut client)?;
//! let mut results = results.into_iter();
//! let products: Vec<Product> = results.next().unwrap().into_objects()?;
//! let store_count: i64 = results.next().unwrap().into_scalar()?;
//! ```

pub mod semantic_model;
pub mod query;
pub mod result;
pub mod sql;
pub mod parser;
pub mod normalizer;
pub mod combiner;
pub mod decoder;
pub mod fetch;
pub mod error;

// Re-export commonly used types
pub use semantic_model::{Schema, Model, SemanticType, EnumType, ColumnSpec};
pub use query::{Query, QuerySource, Param, SubQuerySpec, OutputKind, RowShape};
pub use result::{Value, Row, QueryResult, BatchResult, FromRow, FromValue};
pub use normalizer::{normalize, normalize_all, NormalizeError};
pub use combiner::{combine, CombinedStatement, CombineError, Dialect};
pub use decoder::{decode, coerce, CoerceError, DecodeError};
pub use fetch::{fetch, Execute, RawRow, SingleQueryFetch, ContractViolation};
pub use error::{FetchError, ParseError, SchemaError};
pub use parser::{parse_file, parse_str};
