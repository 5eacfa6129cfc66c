//! SQL tokens paired with their source text
//!
//! The sqlparser tokenizer knows each dialect's literals, quoted identifiers,
//! dollar-quoted bodies and comments. Every token is kept together with the
//! exact slice of input it was read from, so SQL can be rewritten one token at
//! a time without disturbing anything else.

use sqlparser::dialect::{PostgreSqlDialect, SQLiteDialect};
use sqlparser::tokenizer::{Location, Token, Tokenizer, TokenizerError};

use crate::combiner::Dialect;

/// One token and the source text it covers
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'a> {
    pub token: Token,
    pub text: &'a str,
}

/// Parameter marker forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `$n` (PostgreSQL) or `?n` (SQLite)
    Numbered(usize),
    /// Bare `?` (SQLite)
    Anonymous,
    /// `:name`, `@name` or `$name` (SQLite)
    Named(String),
}

/// Tokenize `sql` with `dialect`'s quoting rules
pub fn tokenize(sql: &str, dialect: Dialect) -> Result<Vec<Lexeme<'_>>, TokenizerError> {
    let tokens = match dialect {
        Dialect::Postgres => Tokenizer::new(&PostgreSqlDialect {}, sql).tokenize_with_location()?,
        Dialect::Sqlite => Tokenizer::new(&SQLiteDialect {}, sql).tokenize_with_location()?,
    };

    let lines = LineIndex::new(sql);
    let starts: Vec<usize> = tokens.iter().map(|t| lines.offset(sql, t.span.start)).collect();

    Ok(tokens
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let end = starts.get(i + 1).copied().unwrap_or(sql.len());
            Lexeme {
                token: t.token,
                text: &sql[starts[i]..end],
            }
        })
        .collect())
}

/// Unquoted words in order (keywords and bare identifiers)
pub fn words<'a>(lexemes: &'a [Lexeme<'a>]) -> impl Iterator<Item = &'a str> + 'a {
    lexemes.iter().filter_map(|l| match &l.token {
        Token::Word(w) if w.quote_style.is_none() => Some(w.value.as_str()),
        _ => None,
    })
}

/// Whether a `;` appears outside literals and comments
pub fn has_terminator(lexemes: &[Lexeme<'_>]) -> bool {
    lexemes.iter().any(|l| l.token == Token::SemiColon)
}

/// Whether there is nothing but whitespace and comments
pub fn is_blank(lexemes: &[Lexeme<'_>]) -> bool {
    lexemes.iter().all(|l| matches!(l.token, Token::Whitespace(_)))
}

impl Lexeme<'_> {
    /// The parameter marker this token opens, if any
    ///
    /// `next` is the token right after this one. SQLite `:name` and `@name`
    /// arrive as a separator followed by a word.
    pub fn placeholder(&self, next: Option<&Lexeme<'_>>, dialect: Dialect) -> Option<Placeholder> {
        match (&self.token, dialect) {
            (Token::Placeholder(p), Dialect::Postgres) => {
                let digits = p.strip_prefix('$')?;
                Some(numbered(digits).unwrap_or_else(|| Placeholder::Named(p.clone())))
            }
            (Token::Placeholder(p), Dialect::Sqlite) => match p.strip_prefix('?') {
                Some("") => Some(Placeholder::Anonymous),
                Some(digits) => Some(numbered(digits).unwrap_or_else(|| Placeholder::Named(p.clone()))),
                None => Some(Placeholder::Named(p.clone())),
            },
            (Token::Colon | Token::AtSign, Dialect::Sqlite) => match next.map(|n| &n.token) {
                Some(Token::Word(w)) if w.quote_style.is_none() => {
                    Some(Placeholder::Named(format!("{}{}", self.text, w.value)))
                }
                _ => None,
            },
            (Token::Word(w), Dialect::Sqlite) if w.quote_style.is_none() && w.value.starts_with('$') => {
                Some(Placeholder::Named(w.value.clone()))
            }
            _ => None,
        }
    }
}

fn numbered(digits: &str) -> Option<Placeholder> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(Placeholder::Numbered)
}

/// Byte offset of every line start
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(sql: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(sql.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    /// Byte offset of a 1-based line and character column
    fn offset(&self, sql: &str, location: Location) -> usize {
        let line = (location.line as usize).saturating_sub(1);
        let Some(&start) = self.starts.get(line) else {
            return sql.len();
        };
        let column = (location.column as usize).saturating_sub(1);
        sql[start..]
            .char_indices()
            .nth(column)
            .map_or(sql.len(), |(i, _)| start + i)
    }
}
