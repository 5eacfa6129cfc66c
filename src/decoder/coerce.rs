//! Semantic-type coercion
//!
//! Undoes what the JSON transport did to a value: decimals and timestamps
//! arrive as numbers or text, booleans may arrive as 0/1, enums as their raw
//! database representation.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value as Json;
use uuid::Uuid;

use super::error::CoerceError;
use crate::result::Value;
use crate::semantic_model::{EnumType, SemanticType};

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Coerce one raw JSON value to its semantic type
///
/// JSON null always coerces to `Value::Null`; nullability is the caller's
/// concern.
pub fn coerce(semantic_type: &SemanticType, raw: &Json) -> Result<Value, CoerceError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let coerced = match semantic_type {
        SemanticType::Text => raw.as_str().map(|s| Value::Text(s.to_string())),
        SemanticType::Integer => coerce_integer(raw),
        SemanticType::Float => coerce_float(raw),
        SemanticType::Decimal => coerce_decimal(raw),
        SemanticType::Boolean => coerce_boolean(raw),
        SemanticType::DateTime => raw.as_str().and_then(parse_datetime),
        SemanticType::Date => raw
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .map(Value::Date),
        SemanticType::Uuid => raw
            .as_str()
            .filter(|s| s.len() == 36)
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(Value::Uuid),
        SemanticType::Json => Some(Value::Json(raw.clone())),
        SemanticType::Enum(e) => return coerce_enum(e, raw),
        SemanticType::ForeignKey => Some(coerce_identifier(raw)),
    };
    coerced.ok_or_else(|| mismatch(semantic_type, raw))
}

fn coerce_integer(raw: &Json) -> Option<Value> {
    match raw {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .map(Value::Integer)
}

fn coerce_float(raw: &Json) -> Option<Value> {
    match raw {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => match s.trim() {
            "NaN" => Some(f64::NAN),
            "Infinity" | "Inf" => Some(f64::INFINITY),
            "-Infinity" | "-Inf" => Some(f64::NEG_INFINITY),
            other => other.parse::<f64>().ok().filter(|f| f.is_finite()),
        },
        _ => None,
    }
    .map(Value::Float)
}

fn coerce_decimal(raw: &Json) -> Option<Value> {
    // Number::to_string keeps the digits as written under arbitrary_precision
    let text: Cow<'_, str> = match raw {
        Json::Number(n) => Cow::Owned(n.to_string()),
        Json::String(s) => Cow::Borrowed(s.trim()),
        _ => return None,
    };
    parse_decimal(&text).map(Value::Decimal)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str_exact(text).ok()
    }
}

fn coerce_boolean(raw: &Json) -> Option<Value> {
    match raw {
        Json::Bool(b) => Some(*b),
        Json::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
    .map(Value::Boolean)
}

fn parse_datetime(text: &str) -> Option<Value> {
    let text = text.trim();
    let text: Cow<'_, str> = if text.as_bytes().get(10) == Some(&b' ') {
        Cow::Owned(format!("{}T{}", &text[..10], &text[11..]))
    } else {
        Cow::Borrowed(text)
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(Value::DateTime(dt));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&text, format).ok())
    {
        return Some(Value::DateTime(dt));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
        .map(Value::Timestamp)
}

fn coerce_enum(e: &EnumType, raw: &Json) -> Result<Value, CoerceError> {
    let text = match raw {
        Json::String(s) => s.clone(),
        Json::Number(n) => n.to_string(),
        _ => return Err(mismatch(&SemanticType::Enum(e.clone()), raw)),
    };
    match e.member(&text) {
        Some(member) => Ok(Value::Enum(member.to_string())),
        None => Err(CoerceError::UnknownEnumValue {
            name: e.name.clone(),
            value: text,
        }),
    }
}

/// Identifiers of related rows are opaque
fn coerce_identifier(raw: &Json) -> Value {
    match raw {
        Json::Number(n) => n.as_i64().map(Value::Integer).unwrap_or_else(|| Value::Json(raw.clone())),
        Json::String(s) => Value::Text(s.clone()),
        other => Value::Json(other.clone()),
    }
}

fn mismatch(semantic_type: &SemanticType, raw: &Json) -> CoerceError {
    let mut found = raw.to_string();
    if found.chars().count() > 48 {
        found = found.chars().take(45).collect::<String>() + "...";
    }
    CoerceError::Mismatch {
        expected: semantic_type.to_string(),
        found,
    }
}
