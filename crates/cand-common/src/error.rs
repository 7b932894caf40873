//! Lexer error types.
//!
//! Lexing is fail-fast: the first byte the dispatcher cannot place stops
//! the scan and becomes a [`LexError`] carrying the position at which
//! dispatch failed.

use std::fmt;

use serde::Serialize;

/// A fatal lexer error with 1-based line/column of the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub col: u32,
}

impl LexError {
    pub fn new(kind: LexErrorKind, line: u32, col: u32) -> Self {
        Self { kind, line, col }
    }
}

/// The specific kind of lexer error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LexErrorKind {
    /// No sub-lexer accepts the byte at the scan position.
    UnknownChar(char),
    /// `#word` does not spell any known directive.
    UnknownDirective(String),
    /// A recognized opening was never completed (e.g. an unterminated
    /// string literal).
    UnknownElement(String),
    /// A `///` block comment ran to end of input.
    UnclosedComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChar('"') => {
                write!(
                    f,
                    "unknown character: '\"' (C& strings are single-quoted: 'like this')"
                )
            }
            Self::UnknownChar(c) => write!(f, "unknown character: {c:?}"),
            Self::UnknownDirective(d) => write!(f, "unknown directive: {d}"),
            Self::UnknownElement(what) => write!(f, "{what}"),
            Self::UnclosedComment => write!(f, "unterminated block comment"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.kind)
    }
}

impl std::error::Error for LexError {}
