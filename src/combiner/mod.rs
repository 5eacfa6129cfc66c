//! Query combiner (verb module)
//!
//! Transforms N SubQuerySpecs into one SQL statement returning one row.

mod combine;
mod dialect;
mod error;
mod placeholder;
mod sql;

pub use combine::{combine, CombinedStatement};
pub use dialect::Dialect;
pub use error::CombineError;
