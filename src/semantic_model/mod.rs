//! Semantic model types (nouns)
//!
//! Column types, enumerations and the schema catalogue that declares
//! the projections of row-producing queries.

mod column;
mod enumeration;
mod schema;
mod types;

pub use column::ColumnSpec;
pub use enumeration::EnumType;
pub use schema::{Schema, Model};
pub use types::{SemanticType, ParseSemanticTypeError};
