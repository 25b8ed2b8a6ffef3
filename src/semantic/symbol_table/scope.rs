use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::symbol::Symbol;

/// Index of a scope in the table's arena.
pub type ScopeId = usize;

/// A lexical scope: one node of the scope tree.
#[derive(Debug)]
pub struct Scope {
    pub name: SmolStr,
    pub parent: Option<ScopeId>,
    pub symbols: FxHashMap<SmolStr, Symbol>,
    pub children: Vec<ScopeId>,
}

impl Scope {
    pub fn new(name: impl Into<SmolStr>, parent: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            symbols: FxHashMap::default(),
            children: Vec::new(),
        }
    }
}
