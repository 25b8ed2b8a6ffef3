//! # solva-base
//!
//! Core library for Solidity semantic analysis, library method
//! resolution, and editor navigation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → query surface (diagnostics, goto-def, references)
//!   ↓
//! resolver  → `using Library for Type` method resolution
//!   ↓
//! semantic  → scopes, type inference, semantic diagnostics
//!   ↓
//! project   → file index / import resolution collaborators
//!   ↓
//! syntax    → parse-tree boundary, AST model, AST builder
//!   ↓
//! base      → primitives (FileId, Position/Span/Location)
//! ```
//!
//! The concrete lexer/parser and the editor transport live outside this
//! crate; see [`syntax::parse_tree`] and [`ide::AnalysisHost`] for the
//! boundaries they plug into.

/// Foundation types: FileId, positions, spans, locations
pub mod base;

/// Syntax: parse-tree boundary types, AST model, AST builder
pub mod syntax;

/// Semantic analysis: scopes, symbols, type inference, diagnostics
pub mod semantic;

/// Library method resolution for `using Library for Type`
pub mod resolver;

/// IDE features: classification, goto, references, the analysis host
pub mod ide;

/// Project collaborators: file index, import resolution
pub mod project;

// Re-export foundation types
pub use base::{FileId, Location, Position, Span};
