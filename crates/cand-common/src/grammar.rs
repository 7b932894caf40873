//! The grammar catalogue: static traits of every token kind.
//!
//! The expression parser drives its shift-reduce loop entirely off these
//! tables (priority, arity, associativity), and the statement parser off
//! the category predicates (modifier, declarative, operand, primary).
//! All tables are total over [`TokenKind`].

use serde::Serialize;

use crate::token::TokenKind;

/// Operator precedence, lowest binding first. Operands, keyword types,
/// identifiers and statement punctuation sit at `Max` so they always win
/// a priority comparison against any pending operator closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    None,
    Assignment,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    ThreeWayEquality,
    Comparison,
    Bitshift,
    Term,
    Factor,
    Prefix,
    Postfix,
    Functional,
    Access,
    Max,
}

/// How an operator takes its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Arity {
    /// Not an operator (operands, keywords, trivia).
    None,
    Binary,
    Prefix,
    Postfix,
}

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Assoc {
    None,
    Left,
    Right,
}

impl TokenKind {
    pub fn priority(self) -> Priority {
        use TokenKind::*;
        match self {
            Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign
            | AmpAssign | PipeAssign | CaretAssign | ShlAssign | ShrAssign => {
                Priority::Assignment
            }
            PipePipe => Priority::LogicalOr,
            AmpAmp => Priority::LogicalAnd,
            Pipe => Priority::BitwiseOr,
            Caret => Priority::BitwiseXor,
            Amp => Priority::BitwiseAnd,
            EqEq | NotEq => Priority::Equality,
            Spaceship => Priority::ThreeWayEquality,
            Lt | Gt | LtEq | GtEq => Priority::Comparison,
            Shl | Shr => Priority::Bitshift,
            Plus | Minus => Priority::Term,
            Star | Slash | Percent => Priority::Factor,
            Bang | Tilde => Priority::Prefix,
            PlusPlus | MinusMinus => Priority::Postfix,
            LParen | RParen | LBrace | RBrace | LBracket | RBracket => Priority::Postfix,
            Dot | ColonColon => Priority::Access,
            IntLiteral | UintLiteral | RealLiteral | BoolLiteral | CharLiteral | ByteLiteral
            | StrLiteral | Ident => Priority::Max,
            Semicolon | Colon | Comma | Ellipsis | At => Priority::Max,
            k if k.is_keyword() => Priority::Max,
            _ => Priority::None,
        }
    }

    pub fn arity(self) -> Arity {
        use TokenKind::*;
        match self {
            Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign
            | AmpAssign | PipeAssign | CaretAssign | ShlAssign | ShrAssign => Arity::Binary,
            Plus | Minus | Star | Slash | Percent | Amp | Pipe | Caret | Shl | Shr => {
                Arity::Binary
            }
            AmpAmp | PipePipe | EqEq | NotEq | Lt | Gt | LtEq | GtEq | Spaceship => Arity::Binary,
            Dot | ColonColon | Ellipsis => Arity::Binary,
            Bang | Tilde | At => Arity::Prefix,
            PlusPlus | MinusMinus => Arity::Postfix,
            LParen | RParen | LBrace | RBrace | LBracket | RBracket => Arity::Postfix,
            _ => Arity::None,
        }
    }

    pub fn assoc(self) -> Assoc {
        use TokenKind::*;
        match self {
            Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign
            | AmpAssign | PipeAssign | CaretAssign | ShlAssign | ShrAssign => Assoc::Right,
            Bang | Tilde | Ellipsis | At => Assoc::Right,
            Plus | Minus | Star | Slash | Percent | Amp | Pipe | Caret | Shl | Shr => Assoc::Left,
            AmpAmp | PipePipe | EqEq | NotEq | Lt | Gt | LtEq | GtEq | Spaceship => Assoc::Left,
            PlusPlus | MinusMinus | Dot | ColonColon => Assoc::Left,
            _ => Assoc::None,
        }
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwDef | KwFn
                | KwClass
                | KwMain
                | KwImport
                | KwNamespace
                | KwUse
                | KwLib
                | KwDll
                | KwIf
                | KwElif
                | KwElse
                | KwCxif
                | KwCxelif
                | KwCxelse
                | KwSwitch
                | KwCase
                | KwDefault
                | KwWhile
                | KwFor
                | KwReturn
                | KwBreak
                | KwContinue
                | KwInt
                | KwUint
                | KwReal
                | KwBool
                | KwChar
                | KwByte
                | KwCstr
                | KwStr
                | KwPtr
                | KwList
                | KwArray
                | KwTrue
                | KwFalse
                | KwNone
                | KwVoid
                | KwIn
                | KwAs
                | KwCin
                | KwCout
                | KwNative
                | KwConst
                | KwRef
                | KwPrivate
                | KwPublic
                | KwStatic
                | KwAny
                | KwAuto
                | KwType
                | KwValue
                | KwTemplate
        )
    }

    /// `private`, `public`, `const`, `static`, `ref`.
    pub fn is_modifier(self) -> bool {
        use TokenKind::*;
        matches!(self, KwPrivate | KwPublic | KwConst | KwStatic | KwRef)
    }

    /// Keywords that introduce a statement: the declarators plus the
    /// control-flow family.
    pub fn is_declarative(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwDef | KwFn
                | KwClass
                | KwMain
                | KwImport
                | KwNamespace
                | KwUse
                | KwLib
                | KwDll
                | KwIf
                | KwElif
                | KwElse
                | KwCxif
                | KwCxelif
                | KwCxelse
                | KwSwitch
                | KwCase
                | KwDefault
                | KwWhile
                | KwFor
                | KwReturn
                | KwBreak
                | KwContinue
                | KwTemplate
        )
    }

    /// Single-token operands: literals, identifiers, and the keyword
    /// types that may appear in a type expression.
    pub fn is_operand(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            StrLiteral
                | IntLiteral
                | UintLiteral
                | RealLiteral
                | BoolLiteral
                | CharLiteral
                | ByteLiteral
                | Ident
                | KwInt
                | KwUint
                | KwReal
                | KwBool
                | KwChar
                | KwByte
                | KwCstr
                | KwStr
                | KwPtr
                | KwList
                | KwArray
                | KwTrue
                | KwFalse
                | KwNone
                | KwVoid
        )
    }

    pub fn is_prefix_operator(self) -> bool {
        matches!(self, TokenKind::Bang | TokenKind::Tilde)
    }

    pub fn is_opener(self) -> bool {
        use TokenKind::*;
        matches!(self, LParen | LBrace | LBracket)
    }

    pub fn is_closer(self) -> bool {
        use TokenKind::*;
        matches!(self, RParen | RBrace | RBracket)
    }

    /// Whether a token may open a primary expression.
    pub fn is_primary(self) -> bool {
        self.is_operand() || self.is_prefix_operator() || self == TokenKind::LParen
    }

    /// Whether a token may open a pragmatic statement.
    pub fn is_pragmatic(self) -> bool {
        self.is_modifier() || self.is_declarative()
    }
}

/// True exactly for the three canonical opener/closer pairs.
pub fn is_closer_of(opener: TokenKind, candidate: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        (opener, candidate),
        (LParen, RParen) | (LBrace, RBrace) | (LBracket, RBracket)
    )
}
