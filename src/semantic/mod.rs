//! Semantic layer: types, scopes, the analyzer, and diagnostics.
//!
//! One AST traversal populates the scope tree, infers expression types,
//! and reports violations. Every diagnostic is non-fatal; analysis of a
//! file always runs to completion.

pub mod analyzer;
pub mod diagnostics;
pub mod symbol_table;
pub mod types;

pub use analyzer::{SemanticAnalyzer, analyze};
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, ExternalDiagnostic, Severity, codes, merge_diagnostics,
};
pub use symbol_table::{Scope, ScopeId, Symbol, SymbolKind, SymbolTable};
pub use types::SolType;
