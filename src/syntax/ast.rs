//! The owned AST model.
//!
//! Nodes live in an arena owned by [`SourceUnit`] and refer to each other
//! through [`NodeId`]s, so the tree is strictly top-down: no parent
//! back-pointers, no shared ownership, no cycles. Parent relationships,
//! where a query needs them, come from a [`ParentIndex`] built once per
//! tree. Node payloads are a closed sum ([`NodeData`]) and traversal is
//! exhaustive pattern matching rather than a visitor protocol.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{FileId, Span};

/// Index of a node in its [`SourceUnit`] arena.
/// Uses u32 for compact storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Contract,
    Interface,
    Library,
}

impl ContractKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ContractKind::Contract => "contract",
            ContractKind::Interface => "interface",
            ContractKind::Library => "library",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
    Internal,
    External,
}

impl Visibility {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "internal" => Some(Visibility::Internal),
            "external" => Some(Visibility::External),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateMutability {
    Pure,
    View,
    Payable,
    NonPayable,
}

impl StateMutability {
    pub fn parse(text: &str) -> Self {
        match text {
            "pure" => StateMutability::Pure,
            "view" => StateMutability::View,
            "payable" => StateMutability::Payable,
            _ => StateMutability::NonPayable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Regular,
    Constructor,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageLocation {
    Memory,
    Storage,
    Calldata,
}

impl StorageLocation {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "memory" => Some(StorageLocation::Memory),
            "storage" => Some(StorageLocation::Storage),
            "calldata" => Some(StorageLocation::Calldata),
            _ => None,
        }
    }
}

/// Expression payloads. Only the forms the semantic analyzer reasons
/// about are modeled; everything else is `Other` and contributes nothing
/// to inference or diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Identifier(SmolStr),
    Literal(SmolStr),
    Binary {
        op: SmolStr,
        lhs: NodeId,
        rhs: NodeId,
    },
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StmtKind {
    Block,
    If,
    While,
    For,
    Return,
    Expression,
    VariableDeclaration,
    Assembly,
    Other,
}

/// Top-level lists of a source unit, threaded by the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitData {
    pub pragmas: Vec<NodeId>,
    pub imports: Vec<NodeId>,
    pub contracts: Vec<NodeId>,
    pub using_directives: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractData {
    pub name: SmolStr,
    pub kind: ContractKind,
    pub inheritance: Vec<SmolStr>,
    pub functions: Vec<NodeId>,
    pub variables: Vec<NodeId>,
    pub structs: Vec<NodeId>,
    pub enums: Vec<NodeId>,
    pub events: Vec<NodeId>,
    pub modifiers: Vec<NodeId>,
    pub using_directives: Vec<NodeId>,
}

impl ContractData {
    pub fn new(name: impl Into<SmolStr>, kind: ContractKind) -> Self {
        Self {
            name: name.into(),
            kind,
            inheritance: Vec::new(),
            functions: Vec::new(),
            variables: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
            events: Vec::new(),
            modifiers: Vec::new(),
            using_directives: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionData {
    pub name: SmolStr,
    pub kind: FunctionKind,
    pub visibility: Option<Visibility>,
    pub mutability: Option<StateMutability>,
    pub modifiers: Vec<SmolStr>,
    pub parameters: Vec<NodeId>,
    pub returns: Vec<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableData {
    pub name: SmolStr,
    pub type_name: SmolStr,
    pub visibility: Option<Visibility>,
    pub is_constant: bool,
    pub is_immutable: bool,
    pub is_state: bool,
    pub initializer: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterData {
    pub name: SmolStr,
    pub type_name: SmolStr,
    pub storage: Option<StorageLocation>,
    pub is_indexed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingData {
    pub library: SmolStr,
    /// `"*"` for a wildcard directive, a concrete type name otherwise.
    pub target_type: SmolStr,
    pub is_global: bool,
    /// Selective attachment (`using L for T { f }`); empty = all functions.
    pub functions: Vec<SmolStr>,
}

/// The closed set of node payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Unit(UnitData),
    Pragma {
        name: SmolStr,
        value: SmolStr,
    },
    Import {
        path: SmolStr,
        symbols: Vec<SmolStr>,
        alias: Option<SmolStr>,
    },
    Contract(ContractData),
    Function(FunctionData),
    Modifier {
        name: SmolStr,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
    },
    Event {
        name: SmolStr,
        parameters: Vec<NodeId>,
        anonymous: bool,
    },
    Struct {
        name: SmolStr,
        members: Vec<NodeId>,
    },
    Enum {
        name: SmolStr,
        variants: Vec<SmolStr>,
    },
    Variable(VariableData),
    Parameter(ParameterData),
    Using(UsingData),
    Expression(ExprKind),
    Statement(StmtKind),
}

/// A node in the arena: payload, span, and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub span: Span,
    pub data: NodeData,
    pub children: Vec<NodeId>,
}

/// An entire parsed file. Owns the node arena; the root is always a
/// [`NodeData::Unit`].
///
/// Invariant: every span in the tree belongs to `file`.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    file: FileId,
    nodes: Vec<AstNode>,
}

impl SourceUnit {
    /// Create an empty unit (also the builder's answer to an absent
    /// parse tree).
    pub fn empty(file: FileId) -> Self {
        Self {
            file,
            nodes: vec![AstNode {
                span: Span::from_coords(0, 0, 0, 0),
                data: NodeData::Unit(UnitData::default()),
                children: Vec::new(),
            }],
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Iterate over `(id, node)` pairs in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &AstNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root Unit node is always present.
        self.nodes.len() <= 1
    }

    /// The root payload.
    pub fn unit(&self) -> &UnitData {
        match &self.nodes[0].data {
            NodeData::Unit(unit) => unit,
            _ => unreachable!("root node is always a Unit"),
        }
    }

    pub fn contract(&self, id: NodeId) -> Option<&ContractData> {
        match &self.node(id).data {
            NodeData::Contract(data) => Some(data),
            _ => None,
        }
    }

    pub fn function(&self, id: NodeId) -> Option<&FunctionData> {
        match &self.node(id).data {
            NodeData::Function(data) => Some(data),
            _ => None,
        }
    }

    pub fn variable(&self, id: NodeId) -> Option<&VariableData> {
        match &self.node(id).data {
            NodeData::Variable(data) => Some(data),
            _ => None,
        }
    }

    pub fn parameter(&self, id: NodeId) -> Option<&ParameterData> {
        match &self.node(id).data {
            NodeData::Parameter(data) => Some(data),
            _ => None,
        }
    }

    pub fn using(&self, id: NodeId) -> Option<&UsingData> {
        match &self.node(id).data {
            NodeData::Using(data) => Some(data),
            _ => None,
        }
    }

    /// Contracts of the unit, in declaration order.
    pub fn contracts(&self) -> impl Iterator<Item = (NodeId, &ContractData)> {
        self.unit()
            .contracts
            .iter()
            .filter_map(|&id| self.contract(id).map(|c| (id, c)))
    }

    /// The contract whose span contains the position, if any.
    pub fn contract_at(&self, position: crate::base::Position) -> Option<(NodeId, &ContractData)> {
        self.contracts()
            .find(|(id, _)| self.span(*id).contains(position))
    }

    /// Build the parent-index map for this tree. Derived on demand; the
    /// nodes themselves never store parent links.
    pub fn parent_index(&self) -> ParentIndex {
        let mut map = FxHashMap::default();
        for (id, node) in self.nodes() {
            for &child in &node.children {
                map.insert(child, id);
            }
        }
        ParentIndex { map }
    }

    // -- arena mutation, used only by the builder --

    pub(crate) fn alloc(&mut self, span: Span, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(AstNode {
            span,
            data,
            children: Vec::new(),
        });
        id
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.index()]
    }
}

/// Child → parent map for one tree, built by [`SourceUnit::parent_index`].
#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    map: FxHashMap<NodeId, NodeId>,
}

impl ParentIndex {
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.map.get(&id).copied()
    }

    /// Walk ancestors from `id` (exclusive) to the root.
    pub fn ancestors<'a>(&'a self, id: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }
}
