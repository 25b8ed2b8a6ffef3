use smol_str::SmolStr;

use super::scope::{Scope, ScopeId};
use super::symbol::{Symbol, SymbolKind};
use crate::semantic::types::SolType;

const GLOBAL_SCOPE: ScopeId = 0;

/// Global functions that are always in scope.
const GLOBAL_FUNCTIONS: &[&str] = &[
    "require",
    "assert",
    "revert",
    "keccak256",
    "sha256",
    "ecrecover",
];

/// Arena of scopes with a cursor for the scope currently being analyzed.
///
/// The global scope is seeded with the built-in value types and global
/// functions, so lookups for these never fail.
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self {
            scopes: vec![Scope::new("global", None)],
            current: GLOBAL_SCOPE,
        };
        table.seed_builtins();
        table
    }

    fn seed_builtins(&mut self) {
        let add_type = |table: &mut Self, name: SmolStr| {
            let symbol = Symbol::new(name.clone(), SymbolKind::Type, SolType::named(name));
            table.add_symbol(symbol);
        };

        for name in ["bool", "address", "string", "bytes", "uint", "int"] {
            add_type(self, SmolStr::new(name));
        }
        for bits in (8..=256).step_by(8) {
            add_type(self, SmolStr::new(format!("uint{bits}")));
            add_type(self, SmolStr::new(format!("int{bits}")));
        }
        for width in 1..=32 {
            add_type(self, SmolStr::new(format!("bytes{width}")));
        }

        for name in GLOBAL_FUNCTIONS {
            let symbol = Symbol::new(*name, SymbolKind::Function, SolType::named("function"));
            self.add_symbol(symbol);
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        GLOBAL_SCOPE
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Push a child scope and make it current.
    pub fn enter_scope(&mut self, name: impl Into<SmolStr>) -> ScopeId {
        let parent = self.current;
        let id = self.scopes.len();
        self.scopes.push(Scope::new(name, Some(parent)));
        self.scopes[parent].children.push(id);
        self.current = id;
        id
    }

    /// Pop to the parent scope. A no-op at the global scope.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Insert into the current scope. Returns `false` on a same-scope
    /// collision; the caller turns that into a diagnostic.
    pub fn add_symbol(&mut self, symbol: Symbol) -> bool {
        self.add_symbol_in(self.current, symbol)
    }

    /// Insert into a specific scope (the analyzer registers a function's
    /// symbol in the scope *enclosing* the function).
    pub fn add_symbol_in(&mut self, scope: ScopeId, mut symbol: Symbol) -> bool {
        let map = &mut self.scopes[scope].symbols;
        if map.contains_key(&symbol.name) {
            return false;
        }
        symbol.scope = scope;
        map.insert(symbol.name.clone(), symbol);
        true
    }

    /// Shadow-aware lookup: walk from the current scope to the root and
    /// return the nearest definition.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_from(self.current, name)
    }

    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(symbol) = self.scopes[id].symbols.get(name) {
                return Some(symbol);
            }
            current = self.scopes[id].parent;
        }
        None
    }

    /// Lookup in the current scope only, no parent walk.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current].symbols.get(name)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
