//! Shared infrastructure for every phase of the B compiler: the
//! compilation arena, typed index vectors, source spans, identifier
//! interning, and the diagnostic handler.

pub mod arena;
pub mod diagnostic;
pub mod index_vec;
pub mod runtime;
pub mod source_map;
pub mod span;
pub mod symbol;

pub use arena::{Arena, Mark};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, ErrorCode, Handler, Level, Register};
pub use index_vec::{Idx, IndexVec};
pub use runtime::{is_runtime_intrinsic, RUNTIME_INTRINSICS};
pub use source_map::SourceMap;
pub use span::{FileId, Span};
pub use symbol::{Interner, Symbol};
