//! Syntax layer: the external parse-tree boundary and the owned AST.
//!
//! The concrete lexer/parser is an external, grammar-generated component.
//! It hands this crate a [`ParseNode`] tree; [`builder::build`] turns that
//! tree into the arena-backed [`SourceUnit`] AST that the semantic layer
//! and the library resolver consume.

pub mod ast;
pub mod builder;
pub mod parse_tree;

pub use ast::{
    AstNode, ContractData, ContractKind, ExprKind, FunctionData, FunctionKind, NodeData, NodeId,
    ParameterData, ParentIndex, SourceUnit, StateMutability, StmtKind, StorageLocation, UsingData,
    VariableData, Visibility,
};
pub use builder::build;
pub use parse_tree::{ParseKind, ParseNode, ParseToken};
