//! SQL text utilities shared by the normalizer and the combiner

mod tokens;

pub use tokens::{has_terminator, is_blank, tokenize, words, Lexeme, Placeholder};
