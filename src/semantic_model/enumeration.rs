//! Enumeration value spaces

use serde::Deserialize;

/// A caller-declared enumeration
///
/// `values` holds the raw database representation of every member. An enum
/// parsed from a column type reference (`enum(name)`) starts with an empty
/// value space until the schema resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumType {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// An unresolved reference to an enum by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Whether the value space has been declared
    pub fn is_resolved(&self) -> bool {
        !self.values.is_empty()
    }

    /// Look up a raw value, returning the declared member
    pub fn member(&self, raw: &str) -> Option<&str> {
        self.values.iter().find(|v| v.as_str() == raw).map(String::as_str)
    }
}
