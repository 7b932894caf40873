//! C& lexer: source text to a token stream.
//!
//! The scanner dispatches on the head byte with a small amount of
//! lookahead for ambiguous prefixes (`<<=`, `<=>`, `//` vs `///`, the
//! `u`/`c`/`b` literal suffixes). Whitespace, newlines and comments are
//! lexed but elided from the output, so later stages never see them.
//!
//! Lexing is fail-fast: the first unknown byte, unknown directive,
//! unterminated string or unterminated block comment stops the scan and
//! is returned as a [`LexError`].

mod cursor;

use cand_common::chars;
use cand_common::error::{LexError, LexErrorKind};
use cand_common::span::Span;
use cand_common::token::{directive_from_str, keyword_from_str, Token, TokenKind};
use cursor::Cursor;

/// The C& lexer. Converts source text into a vector of tokens.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Tokenize the entire source.
    ///
    /// On success the returned vector contains no trivia (whitespace,
    /// newlines, comments) and no EOF sentinel; an empty source yields
    /// an empty vector.
    pub fn tokenize(source: &'src str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while !lexer.cursor.is_eof() {
            let token = lexer.next_token()?;
            if !is_trivia(token.kind) {
                tokens.push(token);
            }
        }
        Ok(tokens)
    }

    /// Lex one token starting at the current position.
    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.pos();
        let line = self.cursor.line();
        let col = self.cursor.col();

        let b = match self.cursor.peek() {
            Some(b) => b,
            None => {
                return Ok(self.token_from(TokenKind::Eof, start, line, col));
            }
        };

        let kind = match b {
            b'/' => self.lex_solidus(line, col)?,
            b'\'' => self.lex_quotation(line, col)?,
            b'\n' => {
                self.cursor.eat_while(|b| b == b'\n');
                TokenKind::Newline
            }
            _ if chars::is_whitespace(b) => {
                self.cursor.eat_while(|b| chars::is_whitespace(b) && b != b'\n');
                TokenKind::Whitespace
            }
            _ if chars::is_digit(b) => self.lex_number(),
            _ if chars::is_ident_start(b) => self.lex_word(start),
            b'#' => self.lex_directive(start, line, col)?,
            b'=' => self.lex_eq(),
            b'+' => self.lex_plus(),
            b'-' => self.lex_minus(),
            b'*' => self.lex_star(),
            b'%' => self.lex_percent(),
            b'&' => self.lex_amp(),
            b'|' => self.lex_pipe(),
            b'^' => self.lex_caret(),
            b'<' => self.lex_lt(),
            b'>' => self.lex_gt(),
            b'!' => self.lex_bang(),
            b'~' => self.single(TokenKind::Tilde),
            b'@' => self.single(TokenKind::At),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b';' => self.single(TokenKind::Semicolon),
            b':' => self.lex_colon(),
            b',' => self.single(TokenKind::Comma),
            b'.' => self.lex_period(),
            _ => {
                return Err(LexError::new(
                    LexErrorKind::UnknownChar(b as char),
                    line,
                    col,
                ));
            }
        };

        Ok(self.token_from(kind, start, line, col))
    }

    /// Build a token from the consumed range `[start, cursor)`.
    fn token_from(&self, kind: TokenKind, start: u32, line: u32, col: u32) -> Token {
        let text = self.cursor.slice(start, self.cursor.pos());
        Token::with_span(kind, text, Span::at(start, self.cursor.pos(), line, col))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    // ── Comments and division ──────────────────────────────────────────

    /// `//` line comment, `///`..`///` block comment, `/=`, or `/`.
    fn lex_solidus(&mut self, line: u32, col: u32) -> Result<TokenKind, LexError> {
        if self.cursor.peek_at(1) == Some(b'/') && self.cursor.peek_at(2) != Some(b'/') {
            // Line comment to end of line; the newline is not consumed.
            self.cursor.eat_while(|b| b != b'\n');
            return Ok(TokenKind::LineComment);
        }
        if self.cursor.starts_with("///") {
            self.cursor.advance_by(3);
            while !self.cursor.starts_with("///") {
                if self.cursor.is_eof() {
                    return Err(LexError::new(LexErrorKind::UnclosedComment, line, col));
                }
                self.cursor.advance();
            }
            self.cursor.advance_by(3);
            return Ok(TokenKind::BlockComment);
        }
        self.cursor.advance();
        if self.cursor.peek() == Some(b'=') {
            self.cursor.advance();
            Ok(TokenKind::SlashAssign)
        } else {
            Ok(TokenKind::Slash)
        }
    }

    // ── String and byte literals ───────────────────────────────────────

    /// A single-quoted literal. `\` escapes exactly the next byte, so
    /// `\\` is a literal backslash and cannot hide a closing quote. A
    /// `c` suffix turns the literal into a byte literal.
    fn lex_quotation(&mut self, line: u32, col: u32) -> Result<TokenKind, LexError> {
        self.cursor.advance(); // opening '
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnknownElement("unterminated string literal".into()),
                        line,
                        col,
                    ));
                }
                Some(b'\\') => {
                    self.cursor.advance();
                    if self.cursor.advance().is_none() {
                        return Err(LexError::new(
                            LexErrorKind::UnknownElement(
                                "unterminated string literal".into(),
                            ),
                            line,
                            col,
                        ));
                    }
                }
                Some(b'\'') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        if self.cursor.peek() == Some(b'c') {
            self.cursor.advance();
            Ok(TokenKind::ByteLiteral)
        } else {
            Ok(TokenKind::StrLiteral)
        }
    }

    // ── Numbers ────────────────────────────────────────────────────────

    /// Integer, unsigned (`u`), byte (`c`), bool (`0b`/`1b`) and real
    /// literals. A `...` directly after the digits belongs to the
    /// surrounding expression and is left unconsumed.
    fn lex_number(&mut self) -> TokenKind {
        let first = self.cursor.peek();
        if matches!(first, Some(b'0') | Some(b'1')) && self.cursor.peek_at(1) == Some(b'b') {
            self.cursor.advance_by(2);
            return TokenKind::BoolLiteral;
        }

        self.cursor.eat_while(chars::is_digit);

        match self.cursor.peek() {
            Some(b'u') => {
                self.cursor.advance();
                TokenKind::UintLiteral
            }
            Some(b'c') => {
                self.cursor.advance();
                TokenKind::ByteLiteral
            }
            Some(b'.') if self.cursor.starts_with("...") => TokenKind::IntLiteral,
            Some(b'.') if self.cursor.peek_at(1).is_some_and(chars::is_digit) => {
                self.cursor.advance(); // .
                self.cursor.eat_while(chars::is_digit);
                TokenKind::RealLiteral
            }
            _ => TokenKind::IntLiteral,
        }
    }

    // ── Identifiers, keywords, directives ──────────────────────────────

    /// `[A-Za-z_][A-Za-z0-9_]*`; keyword spellings win over identifiers.
    fn lex_word(&mut self, start: u32) -> TokenKind {
        self.cursor.advance();
        self.cursor.eat_while(chars::is_alnum_underscore);
        let text = self.cursor.slice(start, self.cursor.pos());
        keyword_from_str(text).unwrap_or(TokenKind::Ident)
    }

    /// `#` followed by a word; must spell a known directive.
    fn lex_directive(&mut self, start: u32, line: u32, col: u32) -> Result<TokenKind, LexError> {
        self.cursor.advance(); // #
        self.cursor.eat_while(chars::is_alnum_underscore);
        let text = self.cursor.slice(start, self.cursor.pos());
        directive_from_str(text).ok_or_else(|| {
            LexError::new(LexErrorKind::UnknownDirective(text.to_string()), line, col)
        })
    }

    // ── Operators ──────────────────────────────────────────────────────

    /// `==` or `=`.
    fn lex_eq(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.peek() == Some(b'=') {
            self.cursor.advance();
            TokenKind::EqEq
        } else {
            TokenKind::Assign
        }
    }

    /// `++`, `+=` or `+`.
    fn lex_plus(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.peek() {
            Some(b'+') => self.single(TokenKind::PlusPlus),
            Some(b'=') => self.single(TokenKind::PlusAssign),
            _ => TokenKind::Plus,
        }
    }

    /// `--`, `-=` or `-`.
    fn lex_minus(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.peek() {
            Some(b'-') => self.single(TokenKind::MinusMinus),
            Some(b'=') => self.single(TokenKind::MinusAssign),
            _ => TokenKind::Minus,
        }
    }

    /// `*=` or `*`.
    fn lex_star(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.peek() == Some(b'=') {
            self.single(TokenKind::StarAssign)
        } else {
            TokenKind::Star
        }
    }

    /// `%=` or `%`.
    fn lex_percent(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.peek() == Some(b'=') {
            self.single(TokenKind::PercentAssign)
        } else {
            TokenKind::Percent
        }
    }

    /// `&&`, `&=` or `&`.
    fn lex_amp(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.peek() {
            Some(b'&') => self.single(TokenKind::AmpAmp),
            Some(b'=') => self.single(TokenKind::AmpAssign),
            _ => TokenKind::Amp,
        }
    }

    /// `||`, `|=` or `|`.
    fn lex_pipe(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.peek() {
            Some(b'|') => self.single(TokenKind::PipePipe),
            Some(b'=') => self.single(TokenKind::PipeAssign),
            _ => TokenKind::Pipe,
        }
    }

    /// `^=` or `^`.
    fn lex_caret(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.peek() == Some(b'=') {
            self.single(TokenKind::CaretAssign)
        } else {
            TokenKind::Caret
        }
    }

    /// `<<=`, `<<`, `<=>`, `<=` or `<`.
    fn lex_lt(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.peek() {
            Some(b'<') => {
                self.cursor.advance();
                if self.cursor.peek() == Some(b'=') {
                    self.single(TokenKind::ShlAssign)
                } else {
                    TokenKind::Shl
                }
            }
            Some(b'=') => {
                self.cursor.advance();
                if self.cursor.peek() == Some(b'>') {
                    self.single(TokenKind::Spaceship)
                } else {
                    TokenKind::LtEq
                }
            }
            _ => TokenKind::Lt,
        }
    }

    /// `>>=`, `>>`, `>=` or `>`.
    fn lex_gt(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.peek() {
            Some(b'>') => {
                self.cursor.advance();
                if self.cursor.peek() == Some(b'=') {
                    self.single(TokenKind::ShrAssign)
                } else {
                    TokenKind::Shr
                }
            }
            Some(b'=') => self.single(TokenKind::GtEq),
            _ => TokenKind::Gt,
        }
    }

    /// `!=` or `!`.
    fn lex_bang(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.peek() == Some(b'=') {
            self.single(TokenKind::NotEq)
        } else {
            TokenKind::Bang
        }
    }

    /// `::` or `:`.
    fn lex_colon(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.peek() == Some(b':') {
            self.single(TokenKind::ColonColon)
        } else {
            TokenKind::Colon
        }
    }

    /// `...` or `.`.
    fn lex_period(&mut self) -> TokenKind {
        if self.cursor.starts_with("...") {
            self.cursor.advance_by(3);
            TokenKind::Ellipsis
        } else {
            self.cursor.advance();
            TokenKind::Dot
        }
    }
}

/// Kinds the lexer produces but never emits to callers.
fn is_trivia(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Whitespace
            | TokenKind::Newline
            | TokenKind::LineComment
            | TokenKind::BlockComment
            | TokenKind::Eof
    )
}
