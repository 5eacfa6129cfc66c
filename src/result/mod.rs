//! Result types (nouns)
//!
//! Decoded values, rows, per-query results and the materialization traits.

mod batch;
mod materialize;
mod row;
mod value;

pub use batch::{QueryResult, BatchResult};
pub use materialize::{FromRow, FromValue};
pub use row::Row;
pub use value::Value;
