//! Semantic column types
//!
//! A semantic type is the caller-declared logical type of a column, as
//! opposed to whatever representation the aggregation format or the wire
//! protocol hands back. The decoder uses it to undo that lossy transport.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use super::enumeration::EnumType;

/// Supported semantic types for decoded columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    /// Variable-length string
    Text,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Exact decimal, never routed through a binary float
    Decimal,
    /// Boolean
    Boolean,
    /// Timestamp, with or without a UTC offset
    DateTime,
    /// Calendar date
    Date,
    /// Canonical hyphenated UUID
    Uuid,
    /// Arbitrary JSON document
    Json,
    /// Closed value space declared by the caller
    Enum(EnumType),
    /// Identifier of a related row, passed through without coercion
    ForeignKey,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Text => write!(f, "text"),
            SemanticType::Integer => write!(f, "integer"),
            SemanticType::Float => write!(f, "float"),
            SemanticType::Decimal => write!(f, "decimal"),
            SemanticType::Boolean => write!(f, "boolean"),
            SemanticType::DateTime => write!(f, "datetime"),
            SemanticType::Date => write!(f, "date"),
            SemanticType::Uuid => write!(f, "uuid"),
            SemanticType::Json => write!(f, "json"),
            SemanticType::Enum(e) => write!(f, "enum({})", e.name),
            SemanticType::ForeignKey => write!(f, "foreign_key"),
        }
    }
}

/// Error when parsing a semantic type string
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid semantic type '{input}': {message}")]
pub struct ParseSemanticTypeError {
    pub input: String,
    pub message: String,
}

impl FromStr for SemanticType {
    type Err = ParseSemanticTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();

        // Enum references carry the enum name: "enum(order_status)"
        if lower.starts_with("enum(") && lower.ends_with(')') {
            return parse_enum_reference(s.trim());
        }

        // Precision/scale are irrelevant for decoding: "decimal(10, 2)"
        if (lower.starts_with("decimal(") || lower.starts_with("numeric(")) && lower.ends_with(')') {
            return Ok(SemanticType::Decimal);
        }

        match lower.as_str() {
            "text" | "string" | "varchar" | "char" => Ok(SemanticType::Text),
            "integer" | "int" | "bigint" | "smallint" | "i32" | "i64" => Ok(SemanticType::Integer),
            "float" | "double" | "real" | "f32" | "f64" => Ok(SemanticType::Float),
            "decimal" | "numeric" => Ok(SemanticType::Decimal),
            "boolean" | "bool" => Ok(SemanticType::Boolean),
            "datetime" | "timestamp" | "timestamptz" => Ok(SemanticType::DateTime),
            "date" => Ok(SemanticType::Date),
            "uuid" => Ok(SemanticType::Uuid),
            "json" | "jsonb" => Ok(SemanticType::Json),
            "foreign_key" | "fk" | "foreign_model_field" => Ok(SemanticType::ForeignKey),
            _ => Err(ParseSemanticTypeError {
                input: s.to_string(),
                message: "unknown type".to_string(),
            }),
        }
    }
}

fn parse_enum_reference(s: &str) -> Result<SemanticType, ParseSemanticTypeError> {
    // "enum(order_status)" -> "order_status"
    let name = s[5..s.len() - 1].trim();
    if name.is_empty() {
        return Err(ParseSemanticTypeError {
            input: s.to_string(),
            message: "enum requires a name, e.g., enum(order_status)".to_string(),
        });
    }
    Ok(SemanticType::Enum(EnumType::named(name)))
}

// Custom deserialize from string
impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SemanticType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SemanticType methods
// ============================================================================

impl SemanticType {
    /// The enum definition, if this is an enum type
    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            SemanticType::Enum(e) => Some(e),
            _ => None,
        }
    }
}
