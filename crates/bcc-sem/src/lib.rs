//! Resolves names against a parsed program: builds the scope chain,
//! synthesises implicit statics, and checks call targets.

mod analyzer;
mod scope;

pub use analyzer::{AnalysisResult, Analyzer};
pub use scope::{ScopeTree, SymbolInfo, SymbolKind};
