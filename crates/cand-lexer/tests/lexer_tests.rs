//! Lexer integration tests: source text in, token kinds and spans out.
//!
//! Everything here goes through the public `Lexer::tokenize` entry
//! point; cursor-level arithmetic is covered by the unit tests next to
//! the cursor itself.

use cand_common::error::LexErrorKind;
use cand_common::token::TokenKind;
use cand_lexer::Lexer;

/// Tokenize source and return the token kinds.
fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize(source)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// ── Boundary inputs ────────────────────────────────────────────────────

#[test]
fn empty_input_is_empty_output() {
    assert!(Lexer::tokenize("").unwrap().is_empty());
}

#[test]
fn comment_only_input_is_empty_output() {
    assert!(Lexer::tokenize("// nothing here\n/// or here ///")
        .unwrap()
        .is_empty());
}

#[test]
fn trivia_never_escapes() {
    let trivia = [
        TokenKind::Whitespace,
        TokenKind::Newline,
        TokenKind::LineComment,
        TokenKind::BlockComment,
        TokenKind::Eof,
    ];
    for token in Lexer::tokenize("def int @x : 1 ; // done\n").unwrap() {
        assert!(!trivia.contains(&token.kind), "{:?} leaked", token.kind);
    }
}

// ── Operators ──────────────────────────────────────────────────────────

#[test]
fn longest_match_wins() {
    use TokenKind::*;
    assert_eq!(kinds("<<= << <=> <= <"), vec![ShlAssign, Shl, Spaceship, LtEq, Lt]);
    assert_eq!(kinds(">>= >> >= >"), vec![ShrAssign, Shr, GtEq, Gt]);
    assert_eq!(kinds("++ += +"), vec![PlusPlus, PlusAssign, Plus]);
    assert_eq!(kinds("&& &= &"), vec![AmpAmp, AmpAssign, Amp]);
    assert_eq!(kinds(":: :"), vec![ColonColon, Colon]);
}

#[test]
fn solidus_forms() {
    use TokenKind::*;
    assert_eq!(kinds("a / b /= c"), vec![Ident, Slash, Ident, SlashAssign, Ident]);
    // A line comment swallows to end of line only.
    assert_eq!(kinds("a // + b\nc"), vec![Ident, Ident]);
    // Block comments do not nest and may span lines.
    assert_eq!(kinds("a /// x\ny /// b"), vec![Ident, Ident]);
}

// ── Numbers ────────────────────────────────────────────────────────────

#[test]
fn number_suffixes() {
    use TokenKind::*;
    assert_eq!(
        kinds("12 34u 56c 1b 0b 7.25"),
        vec![IntLiteral, UintLiteral, ByteLiteral, BoolLiteral, BoolLiteral, RealLiteral]
    );
}

#[test]
fn number_before_ellipsis_stays_integer() {
    use TokenKind::*;
    assert_eq!(kinds("1...9"), vec![IntLiteral, Ellipsis, IntLiteral]);
}

#[test]
fn dot_without_digits_is_a_period() {
    use TokenKind::*;
    assert_eq!(kinds("1.x"), vec![IntLiteral, Dot, Ident]);
}

// ── Strings ────────────────────────────────────────────────────────────

#[test]
fn string_and_byte_literals() {
    let tokens = Lexer::tokenize(r"'hello' 'x'c").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::StrLiteral);
    assert_eq!(tokens[0].text, "'hello'");
    assert_eq!(tokens[1].kind, TokenKind::ByteLiteral);
    assert_eq!(tokens[1].text, "'x'c");
}

#[test]
fn escaped_quote_stays_inside_string() {
    let tokens = Lexer::tokenize(r"'a\'b'").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, r"'a\'b'");
}

#[test]
fn escaped_backslash_does_not_hide_the_closing_quote() {
    // '\\' is a complete literal holding one backslash.
    let tokens = Lexer::tokenize(r"'\\'").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::StrLiteral);
    assert_eq!(tokens[0].text, r"'\\'");
}

// ── Keywords and directives ────────────────────────────────────────────

#[test]
fn keywords_are_exact_spellings() {
    use TokenKind::*;
    assert_eq!(kinds("def define fn fnord"), vec![KwDef, Ident, KwFn, Ident]);
    assert_eq!(kinds("using use"), vec![KwUse, Ident]);
}

#[test]
fn directives() {
    use TokenKind::*;
    assert_eq!(
        kinds("#include 'a.cand'\n#ifdef X #endif"),
        vec![DirInclude, StrLiteral, DirIfdef, Ident, DirEndif]
    );
}

// ── Errors ─────────────────────────────────────────────────────────────

#[test]
fn unknown_directive_is_fatal() {
    let err = Lexer::tokenize("#pragma once").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnknownDirective("#pragma".into()));
    assert_eq!((err.line, err.col), (1, 1));
}

#[test]
fn unknown_char_is_fatal_with_position() {
    let err = Lexer::tokenize("def $x").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnknownChar('$'));
    assert_eq!((err.line, err.col), (1, 5));
}

#[test]
fn double_quote_reports_the_hint() {
    let err = Lexer::tokenize("def str @s : \"oops\";").unwrap_err();
    assert!(err.to_string().contains("single-quoted"));
}

#[test]
fn unterminated_string_is_fatal() {
    let err = Lexer::tokenize("'never closed").unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::UnknownElement(_)));
}

#[test]
fn unterminated_block_comment_is_fatal() {
    let err = Lexer::tokenize("/// stuck").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnclosedComment);
}

// ── Positions ──────────────────────────────────────────────────────────

#[test]
fn spans_are_byte_accurate() {
    let tokens = Lexer::tokenize("def  @x").unwrap();
    assert_eq!((tokens[0].span.start, tokens[0].span.end), (0, 3));
    assert_eq!((tokens[1].span.start, tokens[1].span.end), (5, 6));
    assert_eq!((tokens[2].span.start, tokens[2].span.end), (6, 7));
}

#[test]
fn lines_and_columns_are_one_based() {
    let tokens = Lexer::tokenize("a\n  b").unwrap();
    assert_eq!((tokens[0].span.line, tokens[0].span.col), (1, 1));
    assert_eq!((tokens[1].span.line, tokens[1].span.col), (2, 3));
}
