//! Hierarchical scopes. Each [`Rib`] is one scope
//! level; a [`ScopeTree`] is a stack of ribs with the root surviving for
//! the whole analysis. Resolution walks the stack from the top down, so
//! the innermost binding always wins.

use bcc_util::{Span, Symbol};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Label,
}

#[derive(Debug, Clone, Copy)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    pub decl_span: Span,
    /// Folded vector bound, when known at declaration time (extern vector
    /// definitions only; auto vectors carry their bound as a plain
    /// expression evaluated at runtime).
    pub vector_bound: Option<i64>,
}

impl SymbolInfo {
    pub fn new(kind: SymbolKind, decl_span: Span) -> Self {
        SymbolInfo { kind, decl_span, vector_bound: None }
    }
}

#[derive(Default)]
pub struct Rib {
    bindings: FxHashMap<Symbol, SymbolInfo>,
}

pub struct ScopeTree {
    ribs: Vec<Rib>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree { ribs: vec![Rib::default()] }
    }

    pub fn push(&mut self) {
        self.ribs.push(Rib::default());
    }

    pub fn pop(&mut self) {
        self.ribs.pop();
        debug_assert!(!self.ribs.is_empty(), "the root rib must never be popped");
    }

    /// Declares `name` in the innermost (current) rib. Returns the
    /// previous binding if `name` already existed in that same rib --
    /// callers report this as a `rd` error.
    pub fn declare(&mut self, name: Symbol, info: SymbolInfo) -> Option<SymbolInfo> {
        let top = self.ribs.last_mut().expect("scope stack is never empty");
        top.bindings.insert(name, info)
    }

    /// Declares `name` directly in the root rib, bypassing whatever scope
    /// is currently innermost. Used for top-level installation (pass one)
    /// and for synthesised implicit statics.
    pub fn declare_root(&mut self, name: Symbol, info: SymbolInfo) -> Option<SymbolInfo> {
        self.ribs[0].bindings.insert(name, info)
    }

    pub fn resolve(&self, name: Symbol) -> Option<&SymbolInfo> {
        self.ribs.iter().rev().find_map(|rib| rib.bindings.get(&name))
    }

    pub fn depth(&self) -> usize {
        self.ribs.len()
    }
}
