//! Result decoder (verb module)
//!
//! Splits the combined row into per-query results and coerces every value
//! back to its semantic type. Pure: no I/O, no partial results.

mod coerce;
mod decode;
mod error;

pub use coerce::coerce;
pub use decode::decode;
pub use error::{CoerceError, DecodeError};
