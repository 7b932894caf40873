//! Shared building blocks of the C& compiler.
//!
//! Everything the pipeline stages agree on lives here: source spans,
//! the character classifier, the closed token-kind set with its grammar
//! tables (priority, arity, associativity, category flags), the token
//! type itself, and lexer errors.

pub mod chars;
pub mod error;
pub mod grammar;
pub mod span;
pub mod token;
