//! The concrete syntax tree, stored as an arena of nodes.
//!
//! Nodes live in a flat `Vec`; identity is a [`NodeId`] index. Every
//! node carries an optional parent index and an ordered list of child
//! indices, and the mutation routines keep both ends of that
//! relationship consistent: attaching a child sets its parent, popping
//! a child clears it. A node with no parent is a root.
//!
//! Leaf nodes copy their token's text and position; interior nodes
//! carry a kind only.

use cand_common::token::{Token, TokenKind};

/// Every kind of CST node: one counterpart per token kind, plus the
/// intermediate kinds produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // ── Token counterparts ─────────────────────────────────────────────
    Eof,
    Newline,
    Whitespace,
    LineComment,
    BlockComment,
    IntLiteral,
    UintLiteral,
    RealLiteral,
    BoolLiteral,
    CharLiteral,
    ByteLiteral,
    StrLiteral,
    Ident,
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
    PlusPlus,
    MinusMinus,
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
    Bang,
    Tilde,
    AmpAmp,
    PipePipe,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Spaceship,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
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

    // ── Intermediate kinds ─────────────────────────────────────────────
    Program,
    PragmaticBlock,
    FunctionalBlock,
    ConditionalBlock,
    IterativeBlock,
    Subexpression,
    TypeList,
    GenericList,
    FunctionCall,
    Arguments,
    IndexOperator,
    ListingOperator,
    Modifiers,
    UnaryMinus,
    TypeAlias,
    LibraryTypeAlias,
    LibraryNamespaceInclusion,
    NamespaceInclusion,
    NamespaceObjectInclusion,
    VariableDeclaration,
    VariableDefinition,
    MethodDeclaration,
    MethodDefinition,
    MethodSignature,
    MethodParameter,
    MethodParameterList,
    MethodReturnType,
    MethodVoid,
    ClassDeclaration,
    ClassDefinition,
    ImportDeclaration,
    LibraryDeclaration,
    LibraryDefinition,
    MainDeclaration,
    MainDefinition,
    IfStatement,
}

impl From<TokenKind> for NodeKind {
    fn from(kind: TokenKind) -> Self {
        use TokenKind as T;
        match kind {
            T::Eof => Self::Eof,
            T::Newline => Self::Newline,
            T::Whitespace => Self::Whitespace,
            T::LineComment => Self::LineComment,
            T::BlockComment => Self::BlockComment,
            T::IntLiteral => Self::IntLiteral,
            T::UintLiteral => Self::UintLiteral,
            T::RealLiteral => Self::RealLiteral,
            T::BoolLiteral => Self::BoolLiteral,
            T::CharLiteral => Self::CharLiteral,
            T::ByteLiteral => Self::ByteLiteral,
            T::StrLiteral => Self::StrLiteral,
            T::Ident => Self::Ident,
            T::Assign => Self::Assign,
            T::PlusAssign => Self::PlusAssign,
            T::MinusAssign => Self::MinusAssign,
            T::StarAssign => Self::StarAssign,
            T::SlashAssign => Self::SlashAssign,
            T::PercentAssign => Self::PercentAssign,
            T::AmpAssign => Self::AmpAssign,
            T::PipeAssign => Self::PipeAssign,
            T::CaretAssign => Self::CaretAssign,
            T::ShlAssign => Self::ShlAssign,
            T::ShrAssign => Self::ShrAssign,
            T::PlusPlus => Self::PlusPlus,
            T::MinusMinus => Self::MinusMinus,
            T::Plus => Self::Plus,
            T::Minus => Self::Minus,
            T::Star => Self::Star,
            T::Slash => Self::Slash,
            T::Percent => Self::Percent,
            T::Amp => Self::Amp,
            T::Pipe => Self::Pipe,
            T::Caret => Self::Caret,
            T::Shl => Self::Shl,
            T::Shr => Self::Shr,
            T::Bang => Self::Bang,
            T::Tilde => Self::Tilde,
            T::AmpAmp => Self::AmpAmp,
            T::PipePipe => Self::PipePipe,
            T::EqEq => Self::EqEq,
            T::NotEq => Self::NotEq,
            T::Lt => Self::Lt,
            T::Gt => Self::Gt,
            T::LtEq => Self::LtEq,
            T::GtEq => Self::GtEq,
            T::Spaceship => Self::Spaceship,
            T::LParen => Self::LParen,
            T::RParen => Self::RParen,
            T::LBrace => Self::LBrace,
            T::RBrace => Self::RBrace,
            T::LBracket => Self::LBracket,
            T::RBracket => Self::RBracket,
            T::Semicolon => Self::Semicolon,
            T::Colon => Self::Colon,
            T::ColonColon => Self::ColonColon,
            T::Comma => Self::Comma,
            T::Dot => Self::Dot,
            T::Ellipsis => Self::Ellipsis,
            T::At => Self::At,
            T::Hash => Self::Hash,
            T::Dollar => Self::Dollar,
            T::Question => Self::Question,
            T::Backtick => Self::Backtick,
            T::Backslash => Self::Backslash,
            T::KwDef => Self::KwDef,
            T::KwFn => Self::KwFn,
            T::KwClass => Self::KwClass,
            T::KwMain => Self::KwMain,
            T::KwImport => Self::KwImport,
            T::KwNamespace => Self::KwNamespace,
            T::KwUse => Self::KwUse,
            T::KwLib => Self::KwLib,
            T::KwDll => Self::KwDll,
            T::KwIf => Self::KwIf,
            T::KwElif => Self::KwElif,
            T::KwElse => Self::KwElse,
            T::KwCxif => Self::KwCxif,
            T::KwCxelif => Self::KwCxelif,
            T::KwCxelse => Self::KwCxelse,
            T::KwSwitch => Self::KwSwitch,
            T::KwCase => Self::KwCase,
            T::KwDefault => Self::KwDefault,
            T::KwWhile => Self::KwWhile,
            T::KwFor => Self::KwFor,
            T::KwReturn => Self::KwReturn,
            T::KwBreak => Self::KwBreak,
            T::KwContinue => Self::KwContinue,
            T::KwInt => Self::KwInt,
            T::KwUint => Self::KwUint,
            T::KwReal => Self::KwReal,
            T::KwBool => Self::KwBool,
            T::KwChar => Self::KwChar,
            T::KwByte => Self::KwByte,
            T::KwCstr => Self::KwCstr,
            T::KwStr => Self::KwStr,
            T::KwPtr => Self::KwPtr,
            T::KwList => Self::KwList,
            T::KwArray => Self::KwArray,
            T::KwTrue => Self::KwTrue,
            T::KwFalse => Self::KwFalse,
            T::KwNone => Self::KwNone,
            T::KwVoid => Self::KwVoid,
            T::KwIn => Self::KwIn,
            T::KwAs => Self::KwAs,
            T::KwCin => Self::KwCin,
            T::KwCout => Self::KwCout,
            T::KwNative => Self::KwNative,
            T::KwConst => Self::KwConst,
            T::KwRef => Self::KwRef,
            T::KwPrivate => Self::KwPrivate,
            T::KwPublic => Self::KwPublic,
            T::KwStatic => Self::KwStatic,
            T::KwAny => Self::KwAny,
            T::KwAuto => Self::KwAuto,
            T::KwType => Self::KwType,
            T::KwValue => Self::KwValue,
            T::KwTemplate => Self::KwTemplate,
            T::DirInclude => Self::DirInclude,
            T::DirDefmacro => Self::DirDefmacro,
            T::DirEndmacro => Self::DirEndmacro,
            T::DirIf => Self::DirIf,
            T::DirElse => Self::DirElse,
            T::DirElif => Self::DirElif,
            T::DirEndif => Self::DirEndif,
            T::DirIfdef => Self::DirIfdef,
            T::DirIfndef => Self::DirIfndef,
            T::DirUndef => Self::DirUndef,
        }
    }
}

/// Index of a node in a [`Cst`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    text: String,
    line: u32,
    col: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena of CST nodes.
///
/// The tree under construction and all detached roots share one arena;
/// nodes are never deallocated individually. The parser builds bottom
/// up, attaching finished children to freshly created interior nodes.
#[derive(Debug, Default)]
pub struct Cst {
    nodes: Vec<Node>,
}

impl Cst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh interior node with no text or position.
    pub fn node(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(kind, String::new(), 0, 0)
    }

    /// Create a leaf node from a token, copying text and position.
    pub fn leaf(&mut self, token: &Token) -> NodeId {
        self.alloc(
            token.kind.into(),
            token.text.clone(),
            token.span.line,
            token.span.col,
        )
    }

    fn alloc(&mut self, kind: NodeKind, text: String, line: u32, col: u32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            text,
            line,
            col,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].text
    }

    pub fn line(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].line
    }

    pub fn col(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].col
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Whether the node has no parent.
    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes[id.index()].parent.is_none()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.index()].children.len()
    }

    /// The `n`th child, if present.
    pub fn child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.nodes[id.index()].children.get(n).copied()
    }

    // ── Mutation ───────────────────────────────────────────────────────

    /// Append `child` to `parent`'s children. If `child` is already
    /// attached somewhere, it is detached first; both ends of the link
    /// are updated together.
    pub fn push_back(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Prepend `child` to `parent`'s children.
    pub fn push_front(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.insert(0, child);
    }

    /// Detach and return the last child; it becomes a root.
    pub fn pop_back(&mut self, parent: NodeId) -> Option<NodeId> {
        let child = self.nodes[parent.index()].children.pop()?;
        self.nodes[child.index()].parent = None;
        Some(child)
    }

    /// Detach and return the first child; it becomes a root.
    pub fn pop_front(&mut self, parent: NodeId) -> Option<NodeId> {
        let children = &mut self.nodes[parent.index()].children;
        if children.is_empty() {
            return None;
        }
        let child = children.remove(0);
        self.nodes[child.index()].parent = None;
        Some(child)
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old) = self.nodes[child.index()].parent.take() {
            self.nodes[old.index()].children.retain(|&c| c != child);
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────

    /// Render the subtree under `root` as an indented kind/text listing.
    pub fn debug_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.render(root, 0, &mut out);
        out.pop(); // trailing newline
        out
    }

    fn render(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id.index()];
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&format!("{:?}", node.kind));
        if !node.text.is_empty() {
            out.push_str(&format!(" {:?}", node.text));
        }
        out.push('\n');
        for &child in &node.children {
            self.render(child, depth + 1, out);
        }
    }
}
