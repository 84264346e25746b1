//! Diagnostics: error codes, severity, fluent construction, and the
//! accumulate-then-render [`Handler`].

mod builder;
mod codes;
mod handler;
mod level;

pub use builder::{Diagnostic, DiagnosticBuilder};
pub use codes::ErrorCode;
pub use handler::{Handler, Register};
pub use level::Level;
