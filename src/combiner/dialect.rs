//! Target database dialects

use serde::Deserialize;

/// Database dialect the combined statement is written for
///
/// Both dialects have a JSON aggregation primitive; engines without one
/// are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL: `json_agg`, `row_to_json`, `$n` placeholders
    #[default]
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    /// SQLite (JSON1): `json_group_array`, `json_object`, `?n` placeholders
    #[serde(alias = "sqlite3")]
    Sqlite,
}

impl Dialect {
    /// Render the positional placeholder for 1-based parameter `n`
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", n),
            Dialect::Sqlite => format!("?{}", n),
        }
    }
}
