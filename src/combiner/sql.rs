//! SQL emitter for the combined statement
//!
//! Each sub-query becomes one self-contained subexpression. Sub-query text is
//! placed verbatim on its own lines: re-indenting it could alter multi-line
//! literals, and the line break after it closes any trailing `--` comment.

use super::dialect::Dialect;
use crate::query::{OutputKind, SubQuerySpec};
use crate::semantic_model::{ColumnSpec, SemanticType};

/// Alias of the output column for input position `index`
pub(crate) fn column_alias(index: usize) -> String {
    format!("q{}", index)
}

/// Emit the outer statement: one row, one column per expression
pub(crate) fn emit_statement(expressions: &[(usize, String)]) -> String {
    let items: Vec<String> = expressions
        .iter()
        .map(|(index, expr)| format!("{} AS \"{}\"", expr, column_alias(*index)))
        .collect();
    format!("SELECT\n{}", items.join(",\n"))
}

/// Emit the subexpression for one spec around its (renumbered) SQL
///
/// Row sets and objects rename the sub-query's output columns by position to
/// the declared column names, so a join projecting `p.id, s.id` still yields
/// one key per column.
pub(crate) fn emit_expression(spec: &SubQuerySpec, inner: &str, dialect: Dialect) -> String {
    let p = pad(1);
    let item = format!("item({})", column_list(&spec.column_specs));
    match (&spec.output_kind, dialect) {
        (OutputKind::RowSet(_), Dialect::Postgres) => format!(
            "{p}(SELECT COALESCE(json_agg(item), '[]'::json)\n{p}FROM (\n{inner}\n{p}) AS {item})"
        ),
        (OutputKind::RowSet(_), Dialect::Sqlite) => format!(
            "{p}(WITH {item} AS (\n{inner}\n{p})\n{p}SELECT COALESCE(json_group_array({obj}), '[]')\n{p}FROM item)",
            obj = sqlite_object(&spec.column_specs),
        ),
        (OutputKind::Object, Dialect::Postgres) => format!(
            "{p}(SELECT row_to_json(item)\n{p}FROM (\n{inner}\n{p}) AS {item}\n{p}LIMIT 1)"
        ),
        (OutputKind::Object, Dialect::Sqlite) => format!(
            "{p}(WITH {item} AS (\n{inner}\n{p})\n{p}SELECT {obj}\n{p}FROM item\n{p}LIMIT 1)",
            obj = sqlite_object(&spec.column_specs),
        ),
        (OutputKind::Scalar { .. }, Dialect::Postgres) => format!("{p}to_json((\n{inner}\n{p}))"),
        (OutputKind::Scalar { .. }, Dialect::Sqlite) => format!("{p}(\n{inner}\n{p})"),
    }
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

/// `"a", "b", ...`
fn column_list(columns: &[ColumnSpec]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `json_object('a', item."a", ...)`
///
/// JSON columns are re-parsed so they nest. REAL values are printed with 17
/// significant digits; `json_object` alone keeps only 15.
fn sqlite_object(columns: &[ColumnSpec]) -> String {
    let pairs: Vec<String> = columns
        .iter()
        .map(|c| {
            let value = format!("item.{}", quote_ident(&c.name));
            let value = match c.semantic_type {
                SemanticType::Json => format!("json({})", value),
                SemanticType::Float => format!(
                    "CASE typeof({v}) WHEN 'real' THEN printf('%!.17g', {v}) ELSE {v} END",
                    v = value
                ),
                _ => value,
            };
            format!("{}, {}", quote_literal(&c.name), value)
        })
        .collect();
    format!("json_object({})", pairs.join(", "))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
