//! Boundary types for the external grammar-generated parser.
//!
//! The parser component lives outside this crate. It exposes its parse
//! tree as [`ParseNode`]s: a production kind, the production's source
//! text, ordered children, and start/end tokens. Token lines are 1-based
//! and columns 0-based (the convention of the generated runtime); the AST
//! builder converts lines to 0-based internally.

use smol_str::SmolStr;

/// Grammar production kinds the AST builder recognizes.
///
/// The external adapter maps its grammar rule names onto this set and
/// tags everything else [`ParseKind::Other`]; unrecognized productions
/// are skipped by the builder, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseKind {
    SourceUnit,
    Pragma,
    PragmaName,
    PragmaValue,
    Import,
    ImportPath,
    ImportAlias,
    Contract,
    Interface,
    Library,
    InheritanceSpecifier,
    Function,
    Constructor,
    Fallback,
    Receive,
    Modifier,
    ModifierInvocation,
    Event,
    Struct,
    Enum,
    EnumValue,
    StateVariable,
    VariableDeclaration,
    Parameter,
    ReturnParameter,
    EventParameter,
    Using,
    /// One attached function inside a selective `using {f as g} for T`;
    /// the node text is `f` or `f as g`.
    UsingFunction,
    TypeName,
    Identifier,
    StorageLocation,
    Visibility,
    Mutability,
    ConstantKeyword,
    ImmutableKeyword,
    IndexedKeyword,
    GlobalKeyword,
    Block,
    IfStatement,
    WhileStatement,
    ForStatement,
    ReturnStatement,
    ExpressionStatement,
    VariableDeclarationStatement,
    AssemblyBlock,
    Expression,
    Operator,
    Literal,
    Other,
}

/// A token position as reported by the external parser.
///
/// `line` is 1-based, `column` is 0-based; `text` is the token's source
/// text (used to compute end columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseToken {
    pub line: usize,
    pub column: usize,
    pub text: SmolStr,
}

impl ParseToken {
    pub fn new(line: usize, column: usize, text: impl Into<SmolStr>) -> Self {
        Self {
            line,
            column,
            text: text.into(),
        }
    }
}

/// One node of the externally produced parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    pub kind: ParseKind,
    /// Source text covered by this production (ANTLR-style `getText`).
    pub text: SmolStr,
    pub children: Vec<ParseNode>,
    pub start: ParseToken,
    pub end: ParseToken,
}

impl ParseNode {
    pub fn new(kind: ParseKind, text: impl Into<SmolStr>, start: ParseToken, end: ParseToken) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            start,
            end,
        }
    }

    /// Attach children, preserving order.
    pub fn with_children(mut self, children: Vec<ParseNode>) -> Self {
        self.children = children;
        self
    }

    /// First child of the given kind, if any.
    pub fn child(&self, kind: ParseKind) -> Option<&ParseNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All children of the given kind, in order.
    pub fn children_of(&self, kind: ParseKind) -> impl Iterator<Item = &ParseNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Whether a child of the given kind is present (keyword flags).
    pub fn has(&self, kind: ParseKind) -> bool {
        self.child(kind).is_some()
    }
}
