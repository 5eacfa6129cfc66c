//! Placeholder renumbering
//!
//! Every sub-query numbers its parameters from 1. Once the sub-queries share
//! one statement, sub-query `k`'s placeholders are shifted by the number of
//! parameters bound before it.

use super::dialect::Dialect;
use super::error::CombineError;
use crate::sql::{self, Placeholder};

/// SQL with shifted placeholders
#[derive(Debug)]
pub(crate) struct Renumbered {
    pub sql: String,
    /// Highest parameter number the unshifted SQL references
    pub highest: usize,
}

/// Shift every positional placeholder in `sql` by `offset`
///
/// Only placeholder tokens are rewritten; every other token keeps its source
/// text.
pub(crate) fn renumber(index: usize, sql: &str, dialect: Dialect, offset: usize) -> Result<Renumbered, CombineError> {
    let lexemes = sql::tokenize(sql, dialect).map_err(|e| CombineError::unembeddable(index, e.to_string()))?;

    if sql::is_blank(&lexemes) {
        return Err(CombineError::unembeddable(index, "SQL is empty"));
    }
    if sql::has_terminator(&lexemes) {
        return Err(CombineError::unembeddable(index, "SQL contains a statement terminator"));
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut highest = 0;
    for (i, lexeme) in lexemes.iter().enumerate() {
        match lexeme.placeholder(lexemes.get(i + 1), dialect) {
            None => out.push_str(lexeme.text),
            Some(Placeholder::Numbered(0)) => {
                return Err(CombineError::unembeddable(index, "parameter numbers start at 1"));
            }
            Some(Placeholder::Numbered(n)) => {
                highest = highest.max(n);
                out.push_str(&dialect.placeholder(n + offset));
            }
            // A bare `?` takes the number after the largest one assigned so far
            Some(Placeholder::Anonymous) => {
                highest += 1;
                out.push_str(&dialect.placeholder(highest + offset));
            }
            Some(Placeholder::Named(name)) => {
                return Err(CombineError::unembeddable(
                    index,
                    format!("named parameter {} cannot be renumbered", name),
                ));
            }
        }
    }

    Ok(Renumbered { sql: out, highest })
}
