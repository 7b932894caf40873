//! The primary-expression parser.
//!
//! Parsing happens in two phases. Phase one is a shift-reduce rewrite:
//! walking the infix token range left to right, operands are streamed
//! into a [`ClosureBuffer`] and operators become closures; whenever the
//! head token binds less tightly than the newest closure, closures are
//! *resolved* (wrapped in synthetic parentheses) until it does not.
//! At end of input a sentinel of empty priority drains the rest. The
//! result is the same expression, fully parenthesized.
//!
//! Phase two is a plain recursive descent over the parenthesized form,
//! where every parenthesis level contains one operand and at most one
//! operator, so no precedence decisions remain.

use cand_common::grammar::{Arity, Assoc, Priority};
use cand_common::span::Span;
use cand_common::token::{Token, TokenKind};

use crate::closure::{ClosureBuffer, ClosureId};
use crate::cst::{Cst, NodeId, NodeKind};
use crate::cursor::TokenCursor;
use crate::error::{ParseError, ParseErrorKind};
use crate::scope;

/// Parse one primary expression spanning the cursor's whole range.
pub(crate) fn parse_primary_expr(cst: &mut Cst, c: TokenCursor) -> Result<NodeId, ParseError> {
    let rewritten = Rewriter::rewrite(c)?;
    parse_parenthesized(cst, TokenCursor::new(&rewritten))
}

fn mismatched(c: &TokenCursor) -> ParseError {
    ParseError::new(ParseErrorKind::MismatchedScope, c.span())
}

fn open_paren() -> Token {
    Token::new(TokenKind::LParen)
}

fn close_paren() -> Token {
    Token::new(TokenKind::RParen)
}

// ── Phase 1: shift-reduce rewriting ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Operative,
    Operator,
}

struct Rewriter {
    buf: ClosureBuffer,
    expect: Expect,
    first_operator: bool,
    resolved: bool,
}

impl Rewriter {
    /// Rewrite the cursor's range into fully parenthesized form.
    fn rewrite(mut c: TokenCursor) -> Result<Vec<Token>, ParseError> {
        if c.at_end() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedPrimaryExpression,
                c.span(),
            ));
        }
        let mut rw = Rewriter {
            buf: ClosureBuffer::new(),
            expect: Expect::Operative,
            first_operator: true,
            resolved: false,
        };
        while !rw.resolved {
            rw.step(&mut c)?;
        }
        Ok(rw.buf.stream_to_vec())
    }

    /// Dispatch one head token (or the end of input).
    fn step(&mut self, c: &mut TokenCursor) -> Result<(), ParseError> {
        if c.at_end() {
            self.check(c)?;
            self.resolved = true;
            return Ok(());
        }
        match self.expect {
            Expect::Operative => {
                if c.arity() == Arity::None
                    || c.kind_is(TokenKind::LParen)
                    || c.kind_is(TokenKind::Minus)
                {
                    self.skip_operand(c)?;
                    self.expect = Expect::Operator;
                } else if c.arity() == Arity::Prefix {
                    if self.first_operator {
                        self.store(c)?;
                    } else {
                        self.check(c)?;
                    }
                    self.first_operator = false;
                    self.expect = Expect::Operative;
                } else {
                    return Err(ParseError::new(
                        ParseErrorKind::UserSyntaxError(
                            "expected an operand, found an operator".into(),
                        ),
                        c.span(),
                    ));
                }
            }
            Expect::Operator => {
                let trailer = matches!(
                    c.kind(),
                    TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
                );
                if trailer || c.arity() == Arity::Postfix {
                    if self.first_operator {
                        self.store(c)?;
                    } else {
                        self.check(c)?;
                    }
                    self.first_operator = false;
                } else if c.arity() == Arity::Binary {
                    if self.first_operator {
                        self.store(c)?;
                    } else {
                        self.check(c)?;
                    }
                    self.first_operator = false;
                    self.expect = Expect::Operative;
                } else if c.arity() == Arity::Prefix {
                    return Err(ParseError::new(
                        ParseErrorKind::UserSyntaxError(
                            "prefix operator directly after an operand".into(),
                        ),
                        c.span(),
                    ));
                } else {
                    return Err(ParseError::new(
                        ParseErrorKind::UserSyntaxError(
                            "operand directly after an operand".into(),
                        ),
                        c.span(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Stream an operand: a parenthesized subexpression (resolved
    /// recursively, not descended), a negative numeric literal, or a
    /// singular operand token.
    fn skip_operand(&mut self, c: &mut TokenCursor) -> Result<(), ParseError> {
        if c.kind_is(TokenKind::LParen) {
            let scope = scope::find_scope(*c).ok_or_else(|| mismatched(c))?;
            let inner = Rewriter::rewrite(c.subrange(scope.contained_begin, scope.contained_end))?;
            for token in inner {
                self.buf.stream_push_back(token);
            }
            c.advance_to(scope.end);
            return Ok(());
        }
        if c.kind_is(TokenKind::Minus) {
            // Unary minus binds into the literal itself.
            c.advance_by(1);
            if matches!(c.kind(), TokenKind::IntLiteral | TokenKind::RealLiteral) {
                let literal = c.get();
                let negated =
                    Token::with_span(literal.kind, format!("-{}", literal.text), literal.span);
                self.buf.stream_push_back(negated);
                c.advance_by(1);
                return Ok(());
            }
            return Err(ParseError::new(
                ParseErrorKind::UserSyntaxError(
                    "unary minus must be followed by a numeric literal".into(),
                ),
                c.span(),
            ));
        }
        if c.is_operand() {
            self.buf.stream_push_back(c.get().clone());
            c.advance_by(1);
            return Ok(());
        }
        Err(ParseError::new(
            ParseErrorKind::ExpectedPrimaryExpression,
            c.span(),
        ))
    }

    /// Shift the head: stream it and open a closure for it. A trailer
    /// opener swallows its whole scope into a single closure; its
    /// contents are descended in phase two.
    fn store(&mut self, c: &mut TokenCursor) -> Result<(), ParseError> {
        match c.kind() {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                let scope = scope::find_scope(*c).ok_or_else(|| mismatched(c))?;
                self.buf.stream_push_back(c.get().clone());
                let front = self.buf.last_streamed();
                c.advance_by(1);
                while c.index() < scope.end {
                    self.buf.stream_push_back(c.get().clone());
                    c.advance_by(1);
                }
                self.buf
                    .push_back_closure_span(front, self.buf.last_streamed());
                Ok(())
            }
            _ if c.arity() != Arity::None => {
                self.buf.stream_push_back(c.get().clone());
                self.buf.push_back_closure(self.buf.last_streamed());
                c.advance_by(1);
                Ok(())
            }
            _ => Err(ParseError::impl_expected("an operator token", c.span())),
        }
    }

    /// Compare the head against the newest closure; resolve closures
    /// until the head binds at least as tightly, then shift it. At end
    /// of input, drain every closure.
    fn check(&mut self, c: &mut TokenCursor) -> Result<(), ParseError> {
        if c.at_end() {
            while self.buf.closure_count() > 0 {
                self.resolve_last(c.span())?;
            }
            return Ok(());
        }
        while c.priority() < self.buf.priority(self.buf.last_closure()) {
            self.resolve_last(c.span())?;
        }
        self.store(c)
    }

    /// Reduce the newest closure according to its arity.
    fn resolve_last(&mut self, span: Span) -> Result<(), ParseError> {
        match self.buf.arity(self.buf.last_closure()) {
            Arity::Prefix => {
                self.resolve_prefix();
                Ok(())
            }
            Arity::Postfix => {
                self.resolve_postfix();
                Ok(())
            }
            Arity::Binary => self.resolve_binary(span),
            Arity::None => Err(ParseError::impl_expected("an operator closure", span)),
        }
    }

    fn same_operator(buf: &ClosureBuffer, newer: ClosureId, older: ClosureId) -> bool {
        buf.priority(newer) == buf.priority(older) && buf.arity(newer) == buf.arity(older)
    }

    /// Wrap the newest run of equal prefix closures and their operand:
    /// `!!x` becomes `(!(!x))`.
    fn resolve_prefix(&mut self) {
        let run = self.buf.find_closure_reverse_consecutive(Self::same_operator);
        let count = run.len();
        let mut remaining = count;
        while remaining > 0 {
            let target = self
                .buf
                .nth_prev_closure(self.buf.last_closure(), remaining - 1);
            self.buf.stream_insert_before_closure(target, open_paren());
            self.buf.stream_push_back(close_paren());
            remaining -= 1;
        }
        for _ in 0..count {
            self.buf.pop_closure();
        }
    }

    /// Dual of [`Self::resolve_prefix`]: `x++--` becomes `((x++)--)`.
    fn resolve_postfix(&mut self) {
        let run = self.buf.find_closure_reverse_consecutive(Self::same_operator);
        let count = run.len();
        let mut remaining = count;
        while remaining > 0 {
            let before = self.buf.nth_prev_closure(self.buf.last_closure(), count);
            self.buf.stream_insert_after_closure(before, open_paren());
            let after = self
                .buf
                .nth_prev_closure(self.buf.last_closure(), remaining - 1);
            self.buf.stream_insert_after_closure(after, close_paren());
            remaining -= 1;
        }
        for _ in 0..count {
            self.buf.pop_closure();
        }
    }

    /// Reduce the newest binary closure. A run of equal-priority
    /// neighbours resolves as one associative group; otherwise a single
    /// binary step is wrapped, keeping any prefix/postfix closures
    /// inside the new parentheses.
    fn resolve_binary(&mut self, span: Span) -> Result<(), ParseError> {
        let last = self.buf.last_closure();
        let prev = self.buf.nth_prev_closure(last, 1);
        if self.buf.priority(last) == self.buf.priority(prev) {
            return match self.buf.assoc(last) {
                Assoc::Left => {
                    self.resolve_binary_left();
                    Ok(())
                }
                Assoc::Right => {
                    self.resolve_binary_right();
                    Ok(())
                }
                Assoc::None => Err(ParseError::impl_expected(
                    "a left- or right-associative binary operator",
                    span,
                )),
            };
        }

        let mut loc = self.buf.nth_prev_closure(last, 1);
        if self.buf.priority(last) < Priority::Postfix {
            while self.buf.priority(loc) == Priority::Postfix {
                loc = self.buf.nth_prev_closure(loc, 1);
            }
            while self.buf.priority(loc) == Priority::Prefix {
                loc = self.buf.nth_prev_closure(loc, 1);
            }
        } else {
            while self.buf.priority(loc) == Priority::Postfix {
                loc = self.buf.nth_prev_closure(loc, 1);
            }
        }
        self.buf.stream_insert_after_closure(loc, open_paren());
        self.buf.stream_push_back(close_paren());
        self.buf.pop_closure();
        Ok(())
    }

    fn binary_run(&self) -> Vec<ClosureId> {
        self.buf.find_closure_reverse_consecutive_and_ignore(
            |b, newer, older| {
                b.priority(newer) == b.priority(older)
                    && b.arity(newer) == b.arity(older)
                    && b.assoc(newer) == b.assoc(older)
            },
            |b, id| matches!(b.priority(id), Priority::Postfix | Priority::Prefix),
        )
    }

    /// `a op b op c` becomes `((a op b) op c)`.
    fn resolve_binary_left(&mut self) {
        let run = self.binary_run();
        let oldest = *run.last().expect("binary run is never empty");
        let mut open_loc = self.buf.nth_prev_closure(oldest, 1);
        while matches!(
            self.buf.priority(open_loc),
            Priority::Postfix | Priority::Prefix
        ) {
            open_loc = self.buf.nth_prev_closure(open_loc, 1);
        }
        self.buf.stream_insert_after_closure(open_loc, open_paren());
        self.buf.stream_push_back(close_paren());
        for &cid in &run[..run.len() - 1] {
            self.buf.stream_insert_after_closure(open_loc, open_paren());
            self.buf.stream_insert_before_closure(cid, close_paren());
        }
        for &cid in &run {
            self.buf.pop_closure_at(cid);
        }
    }

    /// `a op b op c` becomes `(a op (b op c))`.
    fn resolve_binary_right(&mut self) {
        let run = self.binary_run();
        let oldest = *run.last().expect("binary run is never empty");
        let anchor = self.buf.nth_prev_closure(oldest, 1);
        self.buf.stream_insert_after_closure(anchor, open_paren());
        self.buf.stream_push_back(close_paren());
        for &cid in run.iter().skip(1) {
            self.buf.stream_insert_after_closure(cid, open_paren());
            self.buf.stream_push_back(close_paren());
        }
        for &cid in &run {
            self.buf.pop_closure_at(cid);
        }
    }
}

// ── Phase 2: descent over the parenthesized form ───────────────────────

/// Parse a fully parenthesized expression range into CST nodes.
fn parse_parenthesized(cst: &mut Cst, c: TokenCursor) -> Result<NodeId, ParseError> {
    if c.at_end() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedPrimaryExpression,
            c.span(),
        ));
    }
    if c.kind_is(TokenKind::LParen) {
        let scope = scope::find_scope(c).ok_or_else(|| mismatched(&c))?;
        let inner = c.subrange(scope.contained_begin, scope.contained_end);
        if scope.end == c.end_index() {
            // Redundant outer parentheses around the whole range.
            return parse_parenthesized(cst, inner);
        }
        let lhs = parse_parenthesized(cst, inner)?;
        return parse_trailing(cst, c.next_at(scope.end), lhs);
    }
    if c.arity() == Arity::None {
        let lhs = parse_operand(cst, &c)?;
        return parse_trailing(cst, c.next_by(1), lhs);
    }
    if c.arity() == Arity::Prefix {
        let node = cst.leaf(c.get());
        let rest = c.next_by(1);
        if rest.at_end() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedPrimaryExpression,
                rest.span(),
            ));
        }
        let operand = if rest.kind_is(TokenKind::LParen) {
            let scope = scope::find_scope(rest).ok_or_else(|| mismatched(&rest))?;
            parse_parenthesized(cst, rest.subrange(scope.contained_begin, scope.contained_end))?
        } else if rest.arity() == Arity::None {
            parse_operand(cst, &rest)?
        } else {
            return Err(ParseError::new(
                ParseErrorKind::UserSyntaxError(
                    "invalid token following a prefix operator".into(),
                ),
                rest.span(),
            ));
        };
        cst.push_back(node, operand);
        return Ok(node);
    }
    Err(ParseError::new(
        ParseErrorKind::ExpectedPrimaryExpression,
        c.span(),
    ))
}

/// Parse what follows a finished operand: a call/index/list trailer, a
/// single-token postfix, a binary operator with its right-hand side, or
/// nothing.
fn parse_trailing(cst: &mut Cst, mut c: TokenCursor, lhs: NodeId) -> Result<NodeId, ParseError> {
    if c.at_end() {
        return Ok(lhs);
    }
    match c.arity() {
        Arity::Postfix => {
            let kind = match c.kind() {
                TokenKind::LParen => NodeKind::FunctionCall,
                TokenKind::LBracket => NodeKind::IndexOperator,
                TokenKind::LBrace => NodeKind::ListingOperator,
                _ => {
                    let node = cst.leaf(c.get());
                    cst.push_back(node, lhs);
                    return Ok(node);
                }
            };
            let args = parse_arguments(cst, c)?;
            let node = cst.node(kind);
            cst.push_back(node, lhs);
            cst.push_back(node, args);
            Ok(node)
        }
        Arity::Binary => {
            let node = cst.leaf(c.get());
            c.advance_by(1);
            let rhs = if c.kind_is(TokenKind::LParen) {
                let scope = scope::find_scope(c).ok_or_else(|| mismatched(&c))?;
                parse_parenthesized(cst, c.subrange(scope.contained_begin, scope.contained_end))?
            } else {
                parse_operand(cst, &c)?
            };
            cst.push_back(node, lhs);
            cst.push_back(node, rhs);
            Ok(node)
        }
        _ => Err(ParseError::new(
            ParseErrorKind::UserSyntaxError("invalid token following an operand".into()),
            c.span(),
        )),
    }
}

/// A single-token operand. Anything else here means the rewriter let a
/// non-operand through, which is a bug.
fn parse_operand(cst: &mut Cst, c: &TokenCursor) -> Result<NodeId, ParseError> {
    if c.is_operand() {
        Ok(cst.leaf(c.get()))
    } else {
        Err(ParseError::invalid_singular_operand(c.span()))
    }
}

/// Comma-separated arguments of a call, index or list trailer. The
/// cursor stands on the opener. Every argument is a complete primary
/// expression and goes through both phases itself.
pub(crate) fn parse_arguments(cst: &mut Cst, c: TokenCursor) -> Result<NodeId, ParseError> {
    if c.next_by(1).get().closes(c.kind()) {
        return Ok(cst.node(NodeKind::Arguments));
    }
    let pieces =
        scope::find_separated(c, TokenKind::Comma).ok_or_else(|| mismatched(&c))?;
    let args = cst.node(NodeKind::Arguments);
    for piece in &pieces {
        let expr = parse_primary_expr(cst, c.subrange(piece.contained_begin, piece.contained_end))?;
        cst.push_back(args, expr);
    }
    Ok(args)
}
