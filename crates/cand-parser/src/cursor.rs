//! A read-only cursor over a token slice.
//!
//! Three indices `(begin, at, end)` into an immutable slice. Cursors
//! are `Copy`; parse functions take one by value and hand back the
//! advanced copy, so backtracking is simply keeping the old value.
//! Reading past `end` yields a sentinel EOF token.

use std::sync::OnceLock;

use cand_common::grammar::{Arity, Assoc, Priority};
use cand_common::span::Span;
use cand_common::token::{Token, TokenKind};

fn eof_token() -> &'static Token {
    static EOF: OnceLock<Token> = OnceLock::new();
    EOF.get_or_init(|| Token::new(TokenKind::Eof))
}

#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    begin: usize,
    end: usize,
    at: usize,
}

impl<'t> TokenCursor<'t> {
    /// A cursor over the whole slice.
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            begin: 0,
            end: tokens.len(),
            at: 0,
        }
    }

    /// A cursor restricted to `[begin, end)`, positioned at `begin`.
    ///
    /// Bounds must lie within the slice and be ordered; violating this
    /// is a caller bug.
    pub fn range(tokens: &'t [Token], begin: usize, end: usize) -> Self {
        assert!(
            begin <= end && end <= tokens.len(),
            "token cursor range {begin}..{end} out of bounds for {} tokens",
            tokens.len()
        );
        Self {
            tokens,
            begin,
            end,
            at: begin,
        }
    }

    /// A sub-cursor of this one over `[begin, end)` absolute indices.
    pub fn subrange(&self, begin: usize, end: usize) -> Self {
        Self::range(self.tokens, begin, end)
    }

    // ── Position ───────────────────────────────────────────────────────

    pub fn index(&self) -> usize {
        self.at
    }

    pub fn begin_index(&self) -> usize {
        self.begin
    }

    pub fn end_index(&self) -> usize {
        self.end
    }

    pub fn at_end(&self) -> bool {
        self.at >= self.end || self.tokens[self.at].kind == TokenKind::Eof
    }

    // ── Reading ────────────────────────────────────────────────────────

    /// The token at the cursor, or a sentinel EOF token past the end.
    pub fn get(&self) -> &Token {
        if self.at >= self.end {
            eof_token()
        } else {
            &self.tokens[self.at]
        }
    }

    /// The kind of the token `n` positions ahead (clamped to the range).
    pub fn peek_kind(&self, n: i64) -> TokenKind {
        self.next_by(n).get().kind
    }

    pub fn kind(&self) -> TokenKind {
        self.get().kind
    }

    pub fn text(&self) -> &str {
        &self.get().text
    }

    pub fn span(&self) -> Span {
        self.get().span
    }

    // ── Movement ───────────────────────────────────────────────────────

    /// Advance by `n` (may be negative), clamped to `[begin, end]`.
    pub fn advance_by(&mut self, n: i64) -> &mut Self {
        let target = self.at as i64 + n;
        self.at = target.clamp(self.begin as i64, self.end as i64) as usize;
        self
    }

    /// Move to an absolute index. Out-of-range targets are a logic
    /// error in the parser.
    pub fn advance_to(&mut self, index: usize) -> &mut Self {
        assert!(
            index >= self.begin && index <= self.end,
            "token cursor advanced to {index}, outside {}..{}",
            self.begin,
            self.end
        );
        self.at = index;
        self
    }

    /// A copy advanced by `n`.
    pub fn next_by(&self, n: i64) -> Self {
        let mut next = *self;
        next.advance_by(n);
        next
    }

    /// A copy positioned at an absolute index.
    pub fn next_at(&self, index: usize) -> Self {
        let mut next = *self;
        next.advance_to(index);
        next
    }

    // ── Searching ──────────────────────────────────────────────────────

    /// Index of the first token of `kind` at or after the cursor.
    pub fn find_forward(&self, kind: TokenKind) -> Option<usize> {
        (self.at..self.end).find(|&i| self.tokens[i].kind == kind)
    }

    /// Whether the tokens starting at the cursor match `pattern`'s
    /// kinds exactly.
    pub fn matches(&self, pattern: &[TokenKind]) -> bool {
        if self.at + pattern.len() > self.end {
            return false;
        }
        pattern
            .iter()
            .zip(&self.tokens[self.at..])
            .all(|(k, t)| t.kind == *k)
    }

    // ── Grammar queries, delegated to the catalogue ────────────────────

    pub fn kind_is(&self, kind: TokenKind) -> bool {
        self.get().kind == kind
    }

    pub fn kind_isnt(&self, kind: TokenKind) -> bool {
        self.get().kind != kind
    }

    pub fn priority(&self) -> Priority {
        self.get().priority()
    }

    pub fn arity(&self) -> Arity {
        self.get().arity()
    }

    pub fn assoc(&self) -> Assoc {
        self.get().assoc()
    }

    pub fn is_modifier(&self) -> bool {
        self.get().is_modifier()
    }

    pub fn is_declarative(&self) -> bool {
        self.get().is_declarative()
    }

    pub fn is_operand(&self) -> bool {
        self.get().is_operand()
    }

    pub fn is_prefix_operator(&self) -> bool {
        self.get().is_prefix_operator()
    }

    pub fn is_primary(&self) -> bool {
        self.get().is_primary()
    }

    pub fn is_pragmatic(&self) -> bool {
        self.get().is_pragmatic()
    }

    pub fn line(&self) -> u32 {
        self.get().span.line
    }

    pub fn col(&self) -> u32 {
        self.get().span.col
    }
}
