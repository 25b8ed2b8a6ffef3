use smol_str::SmolStr;

use super::scope::ScopeId;
use crate::base::Location;
use crate::semantic::types::SolType;
use crate::syntax::Visibility;

/// What kind of declaration a symbol came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Contract,
    Interface,
    Library,
    Function,
    Modifier,
    Event,
    Struct,
    Enum,
    Variable,
    Parameter,
    /// Built-in value types seeded into the global scope.
    Type,
}

/// A named element in a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub ty: SolType,
    pub visibility: Option<Visibility>,
    pub is_constant: bool,
    pub is_immutable: bool,
    /// The scope this symbol was inserted into; set by the table.
    pub scope: ScopeId,
    /// Built-ins have no source location.
    pub location: Option<Location>,
}

impl Symbol {
    pub fn new(name: impl Into<SmolStr>, kind: SymbolKind, ty: SolType) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            visibility: None,
            is_constant: false,
            is_immutable: false,
            scope: 0,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_visibility(mut self, visibility: Option<Visibility>) -> Self {
        self.visibility = visibility;
        self
    }
}
