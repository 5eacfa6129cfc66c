//! Query types (nouns)
//!
//! Caller-supplied queries and their normalized sub-query form.

mod param;
mod request;
mod spec;

pub use param::Param;
pub use request::{Query, QuerySource};
pub use spec::{SubQuerySpec, OutputKind, RowShape};
