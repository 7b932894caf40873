//! Token kinds and the token type for C& source.

use std::fmt;

use serde::Serialize;

use crate::grammar::{Arity, Assoc, Priority};
use crate::span::Span;

/// Every kind of token the lexer can produce, plus the trivia kinds it
/// elides and a handful of punctuators that are reserved but never
/// emitted (`Hash`, `Dollar`, `Question`, `Backtick`, `Backslash`).
///
/// The set is closed: the grammar tables in [`crate::grammar`] are total
/// over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Trivia and sentinels ───────────────────────────────────────────
    Eof,
    Newline,
    Whitespace,
    LineComment,
    BlockComment,

    // ── Literals ───────────────────────────────────────────────────────
    IntLiteral,
    UintLiteral,
    RealLiteral,
    BoolLiteral,
    CharLiteral,
    ByteLiteral,
    StrLiteral,
    Ident,

    // ── Assignment operators ───────────────────────────────────────────
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShlAssign,
    ShrAssign,

    // ── Increment / decrement ──────────────────────────────────────────
    PlusPlus,
    MinusMinus,

    // ── Arithmetic and bitwise ─────────────────────────────────────────
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,

    // ── Prefix operators ───────────────────────────────────────────────
    Bang,
    Tilde,

    // ── Logical ────────────────────────────────────────────────────────
    AmpAmp,
    PipePipe,

    // ── Comparison ─────────────────────────────────────────────────────
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Spaceship,

    // ── Scopes ─────────────────────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // ── Punctuation ────────────────────────────────────────────────────
    Semicolon,
    Colon,
    ColonColon,
    Comma,
    Dot,
    Ellipsis,
    At,
    Hash,
    Dollar,
    Question,
    Backtick,
    Backslash,

    // ── Keywords ───────────────────────────────────────────────────────
    KwDef,
    KwFn,
    KwClass,
    KwMain,
    KwImport,
    KwNamespace,
    KwUse,
    KwLib,
    KwDll,
    KwIf,
    KwElif,
    KwElse,
    KwCxif,
    KwCxelif,
    KwCxelse,
    KwSwitch,
    KwCase,
    KwDefault,
    KwWhile,
    KwFor,
    KwReturn,
    KwBreak,
    KwContinue,
    KwInt,
    KwUint,
    KwReal,
    KwBool,
    KwChar,
    KwByte,
    KwCstr,
    KwStr,
    KwPtr,
    KwList,
    KwArray,
    KwTrue,
    KwFalse,
    KwNone,
    KwVoid,
    KwIn,
    KwAs,
    KwCin,
    KwCout,
    KwNative,
    KwConst,
    KwRef,
    KwPrivate,
    KwPublic,
    KwStatic,
    KwAny,
    KwAuto,
    KwType,
    KwValue,
    KwTemplate,

    // ── Preprocessor directives ────────────────────────────────────────
    DirInclude,
    DirDefmacro,
    DirEndmacro,
    DirIf,
    DirElse,
    DirElif,
    DirEndif,
    DirIfdef,
    DirIfndef,
    DirUndef,
}

impl TokenKind {
    /// Canonical spelling for fixed-spelling kinds; `None` for kinds
    /// whose text varies (literals, identifiers) and for trivia.
    pub fn spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        let s = match self {
            Assign => "=",
            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            SlashAssign => "/=",
            PercentAssign => "%=",
            AmpAssign => "&=",
            PipeAssign => "|=",
            CaretAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            PlusPlus => "++",
            MinusMinus => "--",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Shl => "<<",
            Shr => ">>",
            Bang => "!",
            Tilde => "~",
            AmpAmp => "&&",
            PipePipe => "||",
            EqEq => "==",
            NotEq => "!=",
            Lt => "<",
            Gt => ">",
            LtEq => "<=",
            GtEq => ">=",
            Spaceship => "<=>",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Semicolon => ";",
            Colon => ":",
            ColonColon => "::",
            Comma => ",",
            Dot => ".",
            Ellipsis => "...",
            At => "@",
            Hash => "#",
            Dollar => "$",
            Question => "?",
            Backtick => "`",
            Backslash => "\\",
            KwDef => "def",
            KwFn => "fn",
            KwClass => "class",
            KwMain => "main",
            KwImport => "import",
            KwNamespace => "namespace",
            KwUse => "using",
            KwLib => "lib",
            KwDll => "dll",
            KwIf => "if",
            KwElif => "elif",
            KwElse => "else",
            KwCxif => "cxif",
            KwCxelif => "cxelif",
            KwCxelse => "cxelse",
            KwSwitch => "switch",
            KwCase => "case",
            KwDefault => "default",
            KwWhile => "while",
            KwFor => "for",
            KwReturn => "return",
            KwBreak => "break",
            KwContinue => "continue",
            KwInt => "int",
            KwUint => "uint",
            KwReal => "real",
            KwBool => "bool",
            KwChar => "char",
            KwByte => "byte",
            KwCstr => "cstr",
            KwStr => "str",
            KwPtr => "ptr",
            KwList => "list",
            KwArray => "array",
            KwTrue => "true",
            KwFalse => "false",
            KwNone => "none",
            KwVoid => "void",
            KwIn => "in",
            KwAs => "as",
            KwCin => "cin",
            KwCout => "cout",
            KwNative => "native",
            KwConst => "const",
            KwRef => "ref",
            KwPrivate => "private",
            KwPublic => "public",
            KwStatic => "static",
            KwAny => "any",
            KwAuto => "auto",
            KwType => "type",
            KwValue => "value",
            KwTemplate => "template",
            DirInclude => "#include",
            DirDefmacro => "#defmacro",
            DirEndmacro => "#endmacro",
            DirIf => "#if",
            DirElse => "#else",
            DirElif => "#elif",
            DirEndif => "#endif",
            DirIfdef => "#ifdef",
            DirIfndef => "#ifndef",
            DirUndef => "#undef",
            _ => return None,
        };
        Some(s)
    }
}

/// Resolve a lexed word to its keyword kind, if it is one.
pub fn keyword_from_str(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match text {
        "def" => KwDef,
        "fn" => KwFn,
        "class" => KwClass,
        "main" => KwMain,
        "import" => KwImport,
        "namespace" => KwNamespace,
        "using" => KwUse,
        "lib" => KwLib,
        "dll" => KwDll,
        "if" => KwIf,
        "elif" => KwElif,
        "else" => KwElse,
        "cxif" => KwCxif,
        "cxelif" => KwCxelif,
        "cxelse" => KwCxelse,
        "switch" => KwSwitch,
        "case" => KwCase,
        "default" => KwDefault,
        "while" => KwWhile,
        "for" => KwFor,
        "return" => KwReturn,
        "break" => KwBreak,
        "continue" => KwContinue,
        "int" => KwInt,
        "uint" => KwUint,
        "real" => KwReal,
        "bool" => KwBool,
        "char" => KwChar,
        "byte" => KwByte,
        "cstr" => KwCstr,
        "str" => KwStr,
        "ptr" => KwPtr,
        "list" => KwList,
        "array" => KwArray,
        "true" => KwTrue,
        "false" => KwFalse,
        "none" => KwNone,
        "void" => KwVoid,
        "in" => KwIn,
        "as" => KwAs,
        "cin" => KwCin,
        "cout" => KwCout,
        "native" => KwNative,
        "const" => KwConst,
        "ref" => KwRef,
        "private" => KwPrivate,
        "public" => KwPublic,
        "static" => KwStatic,
        "any" => KwAny,
        "auto" => KwAuto,
        "type" => KwType,
        "value" => KwValue,
        "template" => KwTemplate,
        _ => return None,
    };
    Some(kind)
}

/// Resolve a lexed `#word` to its directive kind, if it is one. The
/// argument includes the leading `#`.
pub fn directive_from_str(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match text {
        "#include" => DirInclude,
        "#defmacro" => DirDefmacro,
        "#endmacro" => DirEndmacro,
        "#if" => DirIf,
        "#else" => DirElse,
        "#elif" => DirElif,
        "#endif" => DirEndif,
        "#ifdef" => DirIfdef,
        "#ifndef" => DirIfndef,
        "#undef" => DirUndef,
        _ => return None,
    };
    Some(kind)
}

/// A C& source token: a kind, the verbatim source text, and a span.
///
/// Two tokens compare equal iff their kinds and texts match; the span is
/// not part of a token's identity. The orchestrator rewrites spans when
/// flattening files, which is why the position setters exist.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// A token of a fixed-spelling kind; adopts the canonical spelling.
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            text: kind.spelling().unwrap_or("").to_string(),
            span: Span::none(),
        }
    }

    /// A token with explicit text and no position.
    pub fn with_text(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span::none(),
        }
    }

    /// A token with explicit text and span.
    pub fn with_span(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn set_line(&mut self, line: u32) {
        self.span.line = line;
    }

    pub fn set_col(&mut self, col: u32) {
        self.span.col = col;
    }

    pub fn set_file(&mut self, file: u32) {
        self.span.file = file;
    }

    // ── Grammar queries, delegated to the catalogue ────────────────────

    pub fn priority(&self) -> Priority {
        self.kind.priority()
    }

    pub fn arity(&self) -> Arity {
        self.kind.arity()
    }

    pub fn assoc(&self) -> Assoc {
        self.kind.assoc()
    }

    pub fn kind_is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    pub fn is_modifier(&self) -> bool {
        self.kind.is_modifier()
    }

    pub fn is_declarative(&self) -> bool {
        self.kind.is_declarative()
    }

    pub fn is_operand(&self) -> bool {
        self.kind.is_operand()
    }

    pub fn is_prefix_operator(&self) -> bool {
        self.kind.is_prefix_operator()
    }

    pub fn is_opener(&self) -> bool {
        self.kind.is_opener()
    }

    pub fn is_closer(&self) -> bool {
        self.kind.is_closer()
    }

    pub fn closes(&self, opener: TokenKind) -> bool {
        crate::grammar::is_closer_of(opener, self.kind)
    }

    pub fn is_primary(&self) -> bool {
        self.kind.is_primary()
    }

    pub fn is_pragmatic(&self) -> bool {
        self.kind.is_pragmatic()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_spelling_adopted() {
        let tk = Token::new(TokenKind::ShlAssign);
        assert_eq!(tk.text, "<<=");
        assert_eq!(Token::new(TokenKind::KwUse).text, "using");
    }

    #[test]
    fn equality_ignores_location() {
        let a = Token::with_span(TokenKind::Ident, "x", Span::at(0, 1, 1, 1));
        let b = Token::with_span(TokenKind::Ident, "x", Span::at(40, 41, 3, 9));
        assert_eq!(a, b);
        let c = Token::with_text(TokenKind::Ident, "y");
        assert_ne!(a, c);
    }

    #[test]
    fn keyword_lookup_is_exact() {
        assert_eq!(keyword_from_str("int"), Some(TokenKind::KwInt));
        assert_eq!(keyword_from_str("integer"), None);
        assert_eq!(keyword_from_str("use"), None);
        assert_eq!(keyword_from_str("using"), Some(TokenKind::KwUse));
    }

    #[test]
    fn directive_lookup() {
        assert_eq!(directive_from_str("#include"), Some(TokenKind::DirInclude));
        assert_eq!(directive_from_str("#pragma"), None);
    }
}
