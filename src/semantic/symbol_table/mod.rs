//! Chained lexical scopes and the symbols they hold.
//!
//! Scope nesting mirrors AST nesting: global → contract → function.
//! Lookup walks toward the root, so inner definitions shadow outer ones;
//! a name may only be defined once per scope.

mod scope;
mod symbol;
mod table;

pub use scope::{Scope, ScopeId};
pub use symbol::{Symbol, SymbolKind};
pub use table::SymbolTable;
