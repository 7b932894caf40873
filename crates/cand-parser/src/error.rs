//! Parse error types for the C& parser.
//!
//! Two families share one type: user-facing syntax errors, and
//! implementation-impossible conditions that indicate a bug in the
//! parser itself. The latter capture the source location of the failing
//! parser function via `#[track_caller]`.

use std::fmt;
use std::panic::Location;

use cand_common::span::Span;

/// A parse error with the source span it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The parser reached a token it dispatched on incorrectly. This is
    /// a compiler bug, not a user error; the caller's location is
    /// recorded for the report.
    #[track_caller]
    pub fn impl_expected(expected: &'static str, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::ImplExpectedToken {
                expected,
                at: Location::caller(),
            },
            span,
        }
    }

    /// A token that is not a singular operand reached the operand
    /// parser. The rewriter filters these out, so this too is a
    /// compiler bug.
    #[track_caller]
    pub fn invalid_singular_operand(span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSingularOperand {
                at: Location::caller(),
            },
            span,
        }
    }
}

/// The specific kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An opener has no matching closer.
    MismatchedScope,
    /// Top level or class/lib body expected a modifier or declarative
    /// keyword.
    ExpectedPragmaticDeclaration,
    /// An expression position holds a token that cannot open one.
    ExpectedPrimaryExpression,
    /// A specific token (or small set) was required.
    ExpectedToken {
        expected: &'static str,
        got: String,
    },
    /// The `for` header does not have the `init; cond; step` shape.
    InvalidForLoopSyntax(String),
    /// Catch-all user syntax error with a message.
    UserSyntaxError(String),
    /// A recognized construct that has no semantics yet (named `main`).
    NotImplemented(&'static str),
    /// Compiler bug: a dispatch invariant did not hold.
    ImplExpectedToken {
        expected: &'static str,
        at: &'static Location<'static>,
    },
    /// Compiler bug: non-operand token survived rewriting.
    InvalidSingularOperand { at: &'static Location<'static> },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedScope => write!(f, "mismatched scope"),
            Self::ExpectedPragmaticDeclaration => {
                write!(f, "expected a declaration or modifier")
            }
            Self::ExpectedPrimaryExpression => write!(f, "expected a primary expression"),
            Self::ExpectedToken { expected, got } if got.is_empty() => {
                write!(f, "expected {expected}, got end of input")
            }
            Self::ExpectedToken { expected, got } => {
                write!(f, "expected {expected}, got `{got}`")
            }
            Self::InvalidForLoopSyntax(msg) => write!(f, "invalid for loop: {msg}"),
            Self::UserSyntaxError(msg) => write!(f, "{msg}"),
            Self::NotImplemented(what) => write!(f, "{what} is not implemented"),
            Self::ImplExpectedToken { expected, at } => {
                write!(f, "compiler bug at {at}: expected {expected}")
            }
            Self::InvalidSingularOperand { at } => {
                write!(f, "compiler bug at {at}: invalid singular operand")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.span.line, self.span.col, self.kind)
    }
}

impl std::error::Error for ParseError {}
