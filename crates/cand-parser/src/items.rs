//! Statement and declaration parsers.
//!
//! Recursive descent, one function per construct. Every function takes
//! a cursor positioned at the construct's first token (modifiers
//! included) and returns the built node together with the cursor
//! advanced past the construct. Expressions are delegated to
//! [`crate::expressions`].

use cand_common::token::TokenKind;

use crate::cst::{Cst, NodeId, NodeKind};
use crate::cursor::TokenCursor;
use crate::error::{ParseError, ParseErrorKind};
use crate::expressions::parse_primary_expr;
use crate::scope;

type ParseResult<'t> = Result<(NodeId, TokenCursor<'t>), ParseError>;

fn expected(expected: &'static str, c: &TokenCursor) -> ParseError {
    ParseError::new(
        ParseErrorKind::ExpectedToken {
            expected,
            got: c.text().to_string(),
        },
        c.span(),
    )
}

fn mismatched(c: &TokenCursor) -> ParseError {
    ParseError::new(ParseErrorKind::MismatchedScope, c.span())
}

// ── Top level ──────────────────────────────────────────────────────────

/// Parse a whole program: pragmatic statements until end of input.
pub(crate) fn parse_program(cst: &mut Cst, mut c: TokenCursor) -> Result<NodeId, ParseError> {
    let program = cst.node(NodeKind::Program);
    while !c.at_end() {
        if c.kind_is(TokenKind::Semicolon) {
            // Stray empty statement.
            c.advance_by(1);
            continue;
        }
        if !c.is_pragmatic() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedPragmaticDeclaration,
                c.span(),
            ));
        }
        let (node, rest) = parse_pragmatic_stmt(cst, c)?;
        cst.push_back(program, node);
        c = rest;
    }
    Ok(program)
}

/// A statement allowed at the top level and in class/lib bodies.
pub(crate) fn parse_pragmatic_stmt<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    // Declarations that cannot take modifiers dispatch directly.
    match c.kind() {
        TokenKind::KwUse => return parse_using_decl(cst, c),
        TokenKind::KwMain => return parse_main_decl(cst, c),
        TokenKind::KwImport => return parse_import_decl(cst, c),
        _ => {}
    }

    let mut look = c;
    while look.is_modifier() {
        look.advance_by(1);
    }
    match look.kind() {
        TokenKind::KwDef => parse_variable_decl(cst, c),
        TokenKind::KwFn => parse_method_decl(cst, c),
        TokenKind::KwClass => parse_class_decl(cst, c),
        TokenKind::KwLib => parse_lib_decl(cst, c),
        TokenKind::KwUse | TokenKind::KwMain | TokenKind::KwImport => Err(ParseError::new(
            ParseErrorKind::UserSyntaxError("this declaration cannot take modifiers".into()),
            c.span(),
        )),
        kind if kind.is_declarative() => Err(ParseError::new(
            ParseErrorKind::NotImplemented("this declaration at pragmatic level"),
            look.span(),
        )),
        _ => Err(ParseError::new(
            ParseErrorKind::ExpectedPragmaticDeclaration,
            look.span(),
        )),
    }
}

/// A statement allowed inside executable bodies.
pub(crate) fn parse_functional_stmt<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    match c.kind() {
        TokenKind::KwIf => return parse_if_decl(cst, c),
        TokenKind::KwWhile => return parse_while_decl(cst, c),
        TokenKind::KwFor => return parse_for_decl(cst, c),
        TokenKind::KwReturn => return parse_return_stmt(cst, c),
        TokenKind::KwUse => return parse_using_decl(cst, c),
        TokenKind::KwImport => return parse_import_decl(cst, c),
        _ => {}
    }

    let mut look = c;
    while look.is_modifier() {
        look.advance_by(1);
    }
    match look.kind() {
        TokenKind::KwDef => parse_variable_decl(cst, c),
        TokenKind::KwFn => parse_method_decl(cst, c),
        TokenKind::KwClass => parse_class_decl(cst, c),
        TokenKind::KwUse => Err(ParseError::new(
            ParseErrorKind::UserSyntaxError("this declaration cannot take modifiers".into()),
            c.span(),
        )),
        kind if kind.is_declarative() => Err(ParseError::new(
            ParseErrorKind::UserSyntaxError(
                "this declaration is not allowed in a functional block".into(),
            ),
            look.span(),
        )),
        _ => Err(ParseError::new(
            ParseErrorKind::ExpectedPragmaticDeclaration,
            look.span(),
        )),
    }
}

// ── Expression-shaped fragments ────────────────────────────────────────

/// A primary expression terminated by `;`. The semicolon is consumed.
pub(crate) fn parse_primary_statement<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.is_primary() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedPrimaryExpression,
            c.span(),
        ));
    }
    let scope = scope::find_statement(c).ok_or_else(|| expected("`;`", &c))?;
    let node = parse_primary_expr(cst, c.subrange(scope.begin, scope.contained_end))?;
    Ok((node, c.next_at(scope.end)))
}

/// The type expression of a `def` or parameter: everything up to the
/// `@` sigil, which is consumed. A bare `@` means an implicit `any`.
fn parse_primary_pre_identifier<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    if c.is_primary() {
        let scope = scope::find_until(c, &[TokenKind::At]).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UserSyntaxError("expected `@` introducing an identifier".into()),
                c.span(),
            )
        })?;
        let node = parse_primary_expr(cst, c.subrange(scope.begin, scope.contained_end))?;
        Ok((node, c.next_at(scope.end)))
    } else if c.kind_is(TokenKind::At) {
        Ok((cst.node(NodeKind::KwAny), c.next_by(1)))
    } else {
        Err(ParseError::new(
            ParseErrorKind::ExpectedPrimaryExpression,
            c.span(),
        ))
    }
}

/// A return-type expression: everything up to a `:` or `;`, which is
/// left for the caller.
fn parse_primary_post_identifier<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    if c.is_primary() {
        let scope = scope::find_until(c, &[TokenKind::Colon, TokenKind::Semicolon])
            .ok_or_else(|| expected("`:` or `;`", &c))?;
        let node = parse_primary_expr(cst, c.subrange(scope.begin, scope.contained_end))?;
        Ok((node, c.next_at(scope.contained_end)))
    } else if c.kind_is(TokenKind::Colon) {
        Ok((cst.node(NodeKind::KwAny), c))
    } else {
        Err(ParseError::new(
            ParseErrorKind::ExpectedPrimaryExpression,
            c.span(),
        ))
    }
}

/// A parenthesized condition. The closer is consumed.
fn parse_conditional_subexpr<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::LParen) {
        return Err(expected("`(`", &c));
    }
    let scope = scope::find_scope(c).ok_or_else(|| mismatched(&c))?;
    let inner = c.subrange(scope.contained_begin, scope.contained_end);
    if !inner.is_primary() {
        return Err(ParseError::new(
            ParseErrorKind::UserSyntaxError("invalid beginning of a condition".into()),
            inner.span(),
        ));
    }
    let node = parse_primary_expr(cst, inner)?;
    Ok((node, c.next_at(scope.end)))
}

/// Zero or more modifier keywords into a `Modifiers` node.
fn parse_modifiers<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.is_modifier() {
        return Err(ParseError::impl_expected("a modifier keyword", c.span()));
    }
    let mods = cst.node(NodeKind::Modifiers);
    while c.is_modifier() {
        let leaf = cst.leaf(c.get());
        cst.push_back(mods, leaf);
        c.advance_by(1);
    }
    Ok((mods, c))
}

/// Modifiers if present, an empty `Modifiers` node otherwise.
fn parse_optional_modifiers<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    if c.is_modifier() {
        parse_modifiers(cst, c)
    } else {
        Ok((cst.node(NodeKind::Modifiers), c))
    }
}

// ── Bodies ─────────────────────────────────────────────────────────────

/// A `{ ... }` block of functional statements. The closer is consumed;
/// any trailing `;` is the caller's concern.
fn parse_functional_block<'t>(
    cst: &mut Cst,
    c: TokenCursor<'t>,
    kind: NodeKind,
) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::LBrace) {
        return Err(expected("`{`", &c));
    }
    let scope = scope::find_scope(c).ok_or_else(|| mismatched(&c))?;
    let node = cst.node(kind);
    let mut at = c.next_at(scope.contained_begin);
    while at.index() < scope.contained_end {
        if at.kind_is(TokenKind::Semicolon) {
            at.advance_by(1);
            continue;
        }
        let (stmt, rest) = if at.is_pragmatic() {
            parse_functional_stmt(cst, at)?
        } else if at.is_primary() {
            parse_primary_statement(cst, at)?
        } else {
            return Err(ParseError::new(
                ParseErrorKind::UserSyntaxError("invalid statement in a functional block".into()),
                at.span(),
            ));
        };
        cst.push_back(node, stmt);
        at = rest;
    }
    Ok((node, at.next_at(scope.end)))
}

/// A `{ ... }` block of pragmatic statements, followed by a mandatory
/// `;` that is consumed.
fn parse_pragmatic_block<'t>(cst: &mut Cst, c: TokenCursor<'t>, kind: NodeKind) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::LBrace) {
        return Err(expected("`{`", &c));
    }
    let scope = scope::find_scope(c).ok_or_else(|| mismatched(&c))?;
    let node = cst.node(kind);
    let mut at = c.next_at(scope.contained_begin);
    while at.index() < scope.contained_end {
        if at.kind_is(TokenKind::Semicolon) {
            at.advance_by(1);
            continue;
        }
        if !at.is_pragmatic() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedPragmaticDeclaration,
                at.span(),
            ));
        }
        let (stmt, rest) = parse_pragmatic_stmt(cst, at)?;
        cst.push_back(node, stmt);
        at = rest;
    }
    let mut after = at.next_at(scope.end);
    if !after.kind_is(TokenKind::Semicolon) {
        return Err(expected("`;`", &after));
    }
    after.advance_by(1);
    Ok((node, after))
}

fn parse_method_def<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    parse_functional_block(cst, c, NodeKind::MethodDefinition)
}

fn parse_main_def<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    parse_functional_block(cst, c, NodeKind::MainDefinition)
}

fn parse_class_def<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    parse_pragmatic_block(cst, c, NodeKind::ClassDefinition)
}

fn parse_lib_def<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    parse_pragmatic_block(cst, c, NodeKind::LibraryDefinition)
}

// ── Control flow ───────────────────────────────────────────────────────

fn parse_return_stmt<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::KwReturn) {
        return Err(ParseError::impl_expected("`return`", c.span()));
    }
    let node = cst.leaf(c.get());
    c.advance_by(1);
    if c.kind_is(TokenKind::Semicolon) {
        c.advance_by(1);
        return Ok((node, c));
    }
    let (value, rest) = parse_primary_statement(cst, c)?;
    cst.push_back(node, value);
    Ok((node, rest))
}

/// `if (cond) { .. }` with optional `elif` arms and an optional `else`,
/// all under a single `IfStatement` node.
fn parse_if_decl<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::KwIf) {
        return Err(ParseError::impl_expected("`if`", c.span()));
    }
    let chain = cst.node(NodeKind::IfStatement);

    let (arm, mut c) = parse_if_arm(cst, c, NodeKind::KwIf)?;
    cst.push_back(chain, arm);

    if c.kind_is(TokenKind::Semicolon) {
        c.advance_by(1);
        return Ok((chain, c));
    }

    while c.kind_is(TokenKind::KwElif) {
        let (arm, rest) = parse_if_arm(cst, c, NodeKind::KwElif)?;
        cst.push_back(chain, arm);
        c = rest;
    }
    if c.kind_is(TokenKind::KwElse) {
        let (arm, rest) = parse_if_arm(cst, c, NodeKind::KwElse)?;
        cst.push_back(chain, arm);
        c = rest;
    }
    if c.kind_is(TokenKind::Semicolon) {
        c.advance_by(1);
    }
    Ok((chain, c))
}

/// One arm of an if chain: `if`/`elif` take a condition and body,
/// `else` a body only.
fn parse_if_arm<'t>(cst: &mut Cst, mut c: TokenCursor<'t>, kind: NodeKind) -> ParseResult<'t> {
    match c.kind() {
        TokenKind::KwIf | TokenKind::KwElif => {
            c.advance_by(1);
            let (cond, rest) = parse_conditional_subexpr(cst, c)?;
            let (body, rest) = parse_method_def(cst, rest)?;
            let node = cst.node(kind);
            cst.push_back(node, cond);
            cst.push_back(node, body);
            Ok((node, rest))
        }
        TokenKind::KwElse => {
            c.advance_by(1);
            let (body, rest) = parse_method_def(cst, c)?;
            let node = cst.node(kind);
            cst.push_back(node, body);
            Ok((node, rest))
        }
        _ => Err(ParseError::impl_expected("`if`, `elif` or `else`", c.span())),
    }
}

fn parse_while_decl<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::KwWhile) {
        return Err(ParseError::impl_expected("`while`", c.span()));
    }
    c.advance_by(1);
    let (cond, rest) = parse_conditional_subexpr(cst, c)?;
    let (body, mut rest) = parse_method_def(cst, rest)?;
    if !rest.kind_is(TokenKind::Semicolon) {
        return Err(expected("`;`", &rest));
    }
    rest.advance_by(1);
    let node = cst.node(NodeKind::KwWhile);
    cst.push_back(node, cond);
    cst.push_back(node, body);
    Ok((node, rest))
}

/// `for (init; cond; step) { .. };` with exactly three header pieces.
fn parse_for_decl<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::KwFor) {
        return Err(ParseError::impl_expected("`for`", c.span()));
    }
    c.advance_by(1);
    if !c.kind_is(TokenKind::LParen) {
        return Err(expected("`(`", &c));
    }
    let header = scope::find_scope(c).ok_or_else(|| mismatched(&c))?;
    let pieces = scope::find_separated(c, TokenKind::Semicolon).ok_or_else(|| mismatched(&c))?;
    if pieces.len() != 3 {
        return Err(ParseError::new(
            ParseErrorKind::InvalidForLoopSyntax(format!(
                "expected `init; condition; step`, found {} clause(s)",
                pieces.len()
            )),
            c.span(),
        ));
    }

    // The init and condition pieces own their terminating semicolons.
    let (init, _) = parse_variable_decl(cst, c.subrange(pieces[0].contained_begin, pieces[0].end))?;
    let (cond, _) =
        parse_primary_statement(cst, c.subrange(pieces[1].contained_begin, pieces[1].end))?;
    let step = parse_primary_expr(
        cst,
        c.subrange(pieces[2].contained_begin, pieces[2].contained_end),
    )?;

    let (body, mut rest) = parse_method_def(cst, c.next_at(header.end))?;
    if !rest.kind_is(TokenKind::Semicolon) {
        return Err(expected("`;`", &rest));
    }
    rest.advance_by(1);

    let node = cst.node(NodeKind::KwFor);
    cst.push_back(node, init);
    cst.push_back(node, cond);
    cst.push_back(node, step);
    cst.push_back(node, body);
    Ok((node, rest))
}

// ── Declarations ───────────────────────────────────────────────────────

/// `using` in its five shapes, keyed by the token after the keyword.
fn parse_using_decl<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::KwUse) {
        return Err(ParseError::impl_expected("`using`", c.span()));
    }
    c.advance_by(1);

    match c.kind() {
        // using @name : [lib] <expr>;  -- a (library) type alias
        TokenKind::At => {
            c.advance_by(1);
            if !c.kind_is(TokenKind::Ident) {
                return Err(expected("an identifier", &c));
            }
            let ident = cst.leaf(c.get());
            c.advance_by(1);
            if !c.kind_is(TokenKind::Colon) {
                return Err(expected("`:`", &c));
            }
            c.advance_by(1);
            let kind = if c.kind_is(TokenKind::KwLib) {
                c.advance_by(1);
                NodeKind::LibraryTypeAlias
            } else {
                NodeKind::TypeAlias
            };
            let (value, rest) = parse_primary_statement(cst, c)?;
            let node = cst.node(kind);
            cst.push_back(node, ident);
            cst.push_back(node, value);
            Ok((node, rest))
        }
        // using lib <expr>;
        TokenKind::KwLib => {
            c.advance_by(1);
            let (value, rest) = parse_primary_statement(cst, c)?;
            let node = cst.node(NodeKind::LibraryNamespaceInclusion);
            cst.push_back(node, value);
            Ok((node, rest))
        }
        // using namespace <expr>;
        TokenKind::KwNamespace => {
            c.advance_by(1);
            let (value, rest) = parse_primary_statement(cst, c)?;
            let node = cst.node(NodeKind::NamespaceInclusion);
            cst.push_back(node, value);
            Ok((node, rest))
        }
        _ if c.is_primary() => {
            let (value, rest) = parse_primary_statement(cst, c)?;
            let node = cst.node(NodeKind::NamespaceObjectInclusion);
            cst.push_back(node, value);
            Ok((node, rest))
        }
        _ => Err(expected(
            "`@`, `lib`, `namespace` or a primary expression",
            &c,
        )),
    }
}

/// `<mods> def <type>@<name>` with an optional `: <init>` definition.
fn parse_variable_decl<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    let (mods, mut c) = parse_optional_modifiers(cst, c)?;
    if !c.kind_is(TokenKind::KwDef) {
        return Err(ParseError::impl_expected("`def`", c.span()));
    }
    c.advance_by(1);

    let (what, mut c) = parse_primary_pre_identifier(cst, c)?;

    if !c.kind_is(TokenKind::Ident) {
        return Err(expected("an identifier", &c));
    }
    let ident = cst.leaf(c.get());
    c.advance_by(1);

    let node = cst.node(NodeKind::VariableDeclaration);
    cst.push_back(node, mods);
    cst.push_back(node, what);
    cst.push_back(node, ident);

    match c.kind() {
        TokenKind::Colon => {
            c.advance_by(1);
            let (value, rest) = parse_primary_statement(cst, c)?;
            let definition = cst.node(NodeKind::VariableDefinition);
            cst.push_back(definition, value);
            cst.push_back(node, definition);
            Ok((node, rest))
        }
        TokenKind::Semicolon => {
            c.advance_by(1);
            Ok((node, c))
        }
        _ => Err(expected("`:` or `;`", &c)),
    }
}

/// `<mods> fn @<name> <signature>` with an optional `: { body }`.
fn parse_method_decl<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    let (mods, mut c) = parse_optional_modifiers(cst, c)?;
    if !c.kind_is(TokenKind::KwFn) {
        return Err(ParseError::impl_expected("`fn`", c.span()));
    }
    c.advance_by(1);
    if !c.kind_is(TokenKind::At) {
        return Err(expected("`@`", &c));
    }
    c.advance_by(1);
    if !c.kind_is(TokenKind::Ident) {
        return Err(expected("an identifier", &c));
    }
    let ident = cst.leaf(c.get());
    c.advance_by(1);

    // A bare `fn @f;` has an empty signature; anything else is parsed,
    // with the cursor left on the `:` or `;` terminator.
    let (signature, mut c) = if c.kind_is(TokenKind::Semicolon) {
        (cst.node(NodeKind::MethodSignature), c)
    } else {
        parse_method_signature(cst, c)?
    };

    let node = cst.node(NodeKind::MethodDeclaration);
    cst.push_back(node, mods);
    cst.push_back(node, ident);
    cst.push_back(node, signature);

    match c.kind() {
        TokenKind::Colon => {
            c.advance_by(1);
            let (body, mut rest) = parse_method_def(cst, c)?;
            cst.push_back(node, body);
            if !rest.kind_is(TokenKind::Semicolon) {
                return Err(expected("`;`", &rest));
            }
            rest.advance_by(1);
            Ok((node, rest))
        }
        TokenKind::Semicolon => {
            c.advance_by(1);
            Ok((node, c))
        }
        _ => Err(expected("`:` or `;`", &c)),
    }
}

/// `<mods> class @<name>` with an optional `: { pragmatics };`.
fn parse_class_decl<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    let (mods, mut c) = parse_optional_modifiers(cst, c)?;
    if !c.kind_is(TokenKind::KwClass) {
        return Err(ParseError::impl_expected("`class`", c.span()));
    }
    c.advance_by(1);
    if !c.kind_is(TokenKind::At) {
        return Err(expected("`@`", &c));
    }
    c.advance_by(1);
    if !c.kind_is(TokenKind::Ident) {
        return Err(expected("an identifier", &c));
    }
    let ident = cst.leaf(c.get());
    c.advance_by(1);

    let node = cst.node(NodeKind::ClassDeclaration);
    cst.push_back(node, mods);
    cst.push_back(node, ident);

    match c.kind() {
        TokenKind::Colon => {
            c.advance_by(1);
            let (body, rest) = parse_class_def(cst, c)?;
            cst.push_back(node, body);
            Ok((node, rest))
        }
        TokenKind::Semicolon => {
            c.advance_by(1);
            Ok((node, c))
        }
        _ => Err(expected("`:` or `;`", &c)),
    }
}

/// `lib` declarations: named, named-with-body, or anonymous
/// `lib : { ... };`.
fn parse_lib_decl<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    let (mods, mut c) = parse_optional_modifiers(cst, c)?;
    if !c.kind_is(TokenKind::KwLib) {
        return Err(ParseError::impl_expected("`lib`", c.span()));
    }
    c.advance_by(1);

    let node = cst.node(NodeKind::LibraryDeclaration);
    cst.push_back(node, mods);

    // Anonymous library.
    if c.kind_is(TokenKind::Colon) {
        c.advance_by(1);
        let (body, rest) = parse_lib_def(cst, c)?;
        cst.push_back(node, body);
        return Ok((node, rest));
    }

    if !c.kind_is(TokenKind::At) {
        return Err(expected("`@` or `:`", &c));
    }
    c.advance_by(1);
    if !c.kind_is(TokenKind::Ident) {
        return Err(expected("an identifier", &c));
    }
    let ident = cst.leaf(c.get());
    c.advance_by(1);
    cst.push_back(node, ident);

    match c.kind() {
        TokenKind::Semicolon => {
            c.advance_by(1);
            Ok((node, c))
        }
        TokenKind::Colon => {
            c.advance_by(1);
            let (body, rest) = parse_lib_def(cst, c)?;
            cst.push_back(node, body);
            Ok((node, rest))
        }
        _ => Err(expected("`:` or `;`", &c)),
    }
}

/// `import <name>;`
fn parse_import_decl<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::KwImport) {
        return Err(ParseError::impl_expected("`import`", c.span()));
    }
    c.advance_by(1);
    if !c.kind_is(TokenKind::Ident) {
        return Err(expected("an identifier", &c));
    }
    let ident = cst.leaf(c.get());
    c.advance_by(1);
    if !c.kind_is(TokenKind::Semicolon) {
        return Err(expected("`;`", &c));
    }
    c.advance_by(1);
    let node = cst.node(NodeKind::ImportDeclaration);
    cst.push_back(node, ident);
    Ok((node, c))
}

/// The unnamed program entry point. Named mains are recognized and
/// rejected until they have semantics.
fn parse_main_decl<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::KwMain) {
        return Err(ParseError::impl_expected("`main`", c.span()));
    }
    c.advance_by(1);

    if c.kind_is(TokenKind::At) {
        return Err(ParseError::new(
            ParseErrorKind::NotImplemented("named `main`"),
            c.span(),
        ));
    }

    let (signature, mut c) = parse_method_signature(cst, c)?;
    if !c.kind_is(TokenKind::Colon) {
        return Err(expected("`:`", &c));
    }
    c.advance_by(1);
    let (body, mut rest) = parse_main_def(cst, c)?;
    if !rest.kind_is(TokenKind::Semicolon) {
        return Err(expected("`;`", &rest));
    }
    rest.advance_by(1);

    let node = cst.node(NodeKind::MainDeclaration);
    cst.push_back(node, signature);
    cst.push_back(node, body);
    Ok((node, rest))
}

// ── Method signatures ──────────────────────────────────────────────────

fn void_parameter_list(cst: &mut Cst) -> NodeId {
    let list = cst.node(NodeKind::MethodParameterList);
    let param = cst.node(NodeKind::MethodParameter);
    let void = cst.node(NodeKind::MethodVoid);
    cst.push_back(param, void);
    cst.push_back(list, param);
    list
}

fn return_type_of(cst: &mut Cst, kind: NodeKind) -> NodeId {
    let ret = cst.node(NodeKind::MethodReturnType);
    let inner = cst.node(kind);
    cst.push_back(ret, inner);
    ret
}

fn make_signature(cst: &mut Cst, params: NodeId, ret: NodeId) -> NodeId {
    let sig = cst.node(NodeKind::MethodSignature);
    cst.push_back(sig, params);
    cst.push_back(sig, ret);
    sig
}

/// The six signature shapes: `:`, `> :`, `> T :`, `(params) :`,
/// `(params) > :` and `(params) > T :`. The cursor is returned standing
/// on the terminating `:` or `;`, which stays with the caller: a `:`
/// introduces the body, a `;` ends a bodiless declaration.
fn parse_method_signature<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    match c.kind() {
        // @f :  -- (void) -> void
        TokenKind::Colon => {
            let params = void_parameter_list(cst);
            let ret = return_type_of(cst, NodeKind::MethodVoid);
            Ok((make_signature(cst, params, ret), c))
        }
        // @f > ...  -- void parameters with a return type
        TokenKind::Gt => {
            let mut c = c;
            c.advance_by(1);
            match c.kind() {
                TokenKind::Colon | TokenKind::Semicolon => {
                    let params = void_parameter_list(cst);
                    let ret = return_type_of(cst, NodeKind::KwAny);
                    Ok((make_signature(cst, params, ret), c))
                }
                _ => {
                    let (ret, rest) = parse_method_return(cst, c)?;
                    let params = void_parameter_list(cst);
                    Ok((make_signature(cst, params, ret), rest))
                }
            }
        }
        // @f (params) ...  -- explicit parameters
        TokenKind::LParen => {
            let (params, mut c) = parse_method_parameters(cst, c)?;
            match c.kind() {
                TokenKind::Colon | TokenKind::Semicolon => {
                    let ret = return_type_of(cst, NodeKind::MethodVoid);
                    Ok((make_signature(cst, params, ret), c))
                }
                TokenKind::Gt => {
                    c.advance_by(1);
                    match c.kind() {
                        TokenKind::Colon | TokenKind::Semicolon => {
                            let ret = return_type_of(cst, NodeKind::KwAny);
                            Ok((make_signature(cst, params, ret), c))
                        }
                        _ => {
                            let (ret, rest) = parse_method_return(cst, c)?;
                            Ok((make_signature(cst, params, ret), rest))
                        }
                    }
                }
                _ => Err(expected("`:`, `;` or `>`", &c)),
            }
        }
        _ => Err(expected("`:`, `>` or `(`", &c)),
    }
}

/// The return-type clause after `>`: optional modifiers and a type
/// expression ending at the signature terminator.
fn parse_method_return<'t>(cst: &mut Cst, mut c: TokenCursor<'t>) -> ParseResult<'t> {
    let ret = cst.node(NodeKind::MethodReturnType);
    if c.is_modifier() {
        let (mods, rest) = parse_modifiers(cst, c)?;
        cst.push_back(ret, mods);
        c = rest;
    }
    if !c.is_primary() {
        return Err(expected("a return type expression", &c));
    }
    let (ty, rest) = parse_primary_post_identifier(cst, c)?;
    cst.push_back(ret, ty);
    Ok((ret, rest))
}

/// `(a, int @b, const ref list @c)`: each parameter is
/// `MethodParameter[Modifiers, <type>, Ident]`; a parameter without
/// `@` is a bare identifier of implicit `any` type.
fn parse_method_parameters<'t>(cst: &mut Cst, c: TokenCursor<'t>) -> ParseResult<'t> {
    if !c.kind_is(TokenKind::LParen) {
        return Err(ParseError::impl_expected("`(`", c.span()));
    }
    if c.peek_kind(1) == TokenKind::RParen {
        return Ok((void_parameter_list(cst), c.next_by(2)));
    }

    let pieces = scope::find_separated(c, TokenKind::Comma).ok_or_else(|| mismatched(&c))?;
    let list = cst.node(NodeKind::MethodParameterList);
    for piece in &pieces {
        let mut pc = c.subrange(piece.contained_begin, piece.contained_end);
        let param = cst.node(NodeKind::MethodParameter);
        if pc.find_forward(TokenKind::At).is_some() {
            let (mods, rest) = parse_optional_modifiers(cst, pc)?;
            cst.push_back(param, mods);
            pc = rest;

            if pc.kind_is(TokenKind::At) {
                // Implicit any type.
                pc.advance_by(1);
                let any = cst.node(NodeKind::KwAny);
                cst.push_back(param, any);
            } else if pc.is_primary() {
                let (ty, rest) = parse_primary_pre_identifier(cst, pc)?;
                cst.push_back(param, ty);
                pc = rest;
            } else {
                return Err(expected("a parameter type expression", &pc));
            }

            if !pc.kind_is(TokenKind::Ident) {
                return Err(expected("an identifier", &pc));
            }
            let ident = cst.leaf(pc.get());
            cst.push_back(param, ident);
        } else {
            if !pc.kind_is(TokenKind::Ident) {
                return Err(expected("an identifier", &pc));
            }
            let mods = cst.node(NodeKind::Modifiers);
            cst.push_back(param, mods);
            let any = cst.node(NodeKind::KwAny);
            cst.push_back(param, any);
            let ident = cst.leaf(pc.get());
            cst.push_back(param, ident);
        }
        cst.push_back(list, param);
    }

    let last = pieces.last().expect("separated scopes are never empty");
    Ok((list, c.next_at(last.end)))
}
