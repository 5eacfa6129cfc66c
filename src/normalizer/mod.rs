//! Sub-query normalizer (verb module)
//!
//! Transforms caller queries into SubQuerySpecs without executing them.

mod error;
mod normalize;

pub use error::NormalizeError;
pub use normalize::{normalize, normalize_all};
