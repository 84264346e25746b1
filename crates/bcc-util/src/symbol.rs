//! Interned identifiers.
//!
//! B source identifiers are interned once per compilation so that symbol
//! table lookups, name-mangling keys, and AST name references compare in
//! O(1). The compiler is strictly single-threaded, so unlike a
//! compiler meant to lex and parse multiple files concurrently this
//! interner needs no synchronization: it is a plain `RefCell`-guarded table
//! owned by the `Compilation` context.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

struct Table {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl Table {
    fn new() -> Self {
        Table {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(s) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, sym);
        sym
    }

    fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }
}

/// Per-compilation identifier interner.
pub struct Interner {
    table: RefCell<Table>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            table: RefCell::new(Table::new()),
        }
    }

    pub fn intern(&self, s: &str) -> Symbol {
        self.table.borrow_mut().intern(s)
    }

    /// Resolves a symbol back to its text. The returned `String` is an
    /// owned copy because the table lives behind a `RefCell`; interning is
    /// rare enough per-name that this is not on any hot path.
    pub fn resolve(&self, sym: Symbol) -> String {
        self.table.borrow().resolve(sym).to_string()
    }
}
