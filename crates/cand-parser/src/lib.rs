//! C& parser: flattened token stream to concrete syntax tree.
//!
//! Declarations and statements are parsed by recursive descent
//! ([`items`]); expressions go through a shift-reduce rewriting phase
//! that normalizes them to fully parenthesized form before descent
//! ([`expressions`]). The resulting tree is an arena-backed CST
//! ([`cst`]) owned by the returned [`Parse`].
//!
//! The parser never touches the file system and never prints; it
//! receives tokens by shared reference and returns the tree or the
//! first error.

pub mod closure;
pub mod cst;
pub mod cursor;
pub mod error;
mod expressions;
mod items;
pub mod scope;

pub use cst::{Cst, NodeId, NodeKind};
pub use error::{ParseError, ParseErrorKind};

use cand_common::token::Token;
use cursor::TokenCursor;

/// Result of a successful parse: the arena and the root node.
#[derive(Debug)]
pub struct Parse {
    cst: Cst,
    root: NodeId,
}

impl Parse {
    pub fn cst(&self) -> &Cst {
        &self.cst
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The root's subtree as an indented kind/text listing.
    pub fn debug_tree(&self) -> String {
        self.cst.debug_tree(self.root)
    }
}

/// Parse a whole program from a flattened token stream.
pub fn parse_tokens(tokens: &[Token]) -> Result<Parse, ParseError> {
    let mut cst = Cst::new();
    let root = items::parse_program(&mut cst, TokenCursor::new(tokens))?;
    Ok(Parse { cst, root })
}

/// Parse a single primary expression spanning the whole token slice.
///
/// Used by tests and tooling; programs go through [`parse_tokens`].
pub fn parse_expr_tokens(tokens: &[Token]) -> Result<Parse, ParseError> {
    let mut cst = Cst::new();
    let root = expressions::parse_primary_expr(&mut cst, TokenCursor::new(tokens))?;
    Ok(Parse { cst, root })
}
