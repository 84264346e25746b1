//! Fluent construction of [`Diagnostic`] values.

use super::{ErrorCode, Handler, Level};
use crate::Span;

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

pub struct DiagnosticBuilder {
    diag: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn error(code: ErrorCode) -> Self {
        DiagnosticBuilder {
            diag: Diagnostic {
                level: Level::Error,
                code: Some(code),
                message: code.default_message().to_string(),
                span: None,
                notes: Vec::new(),
            },
        }
    }

    pub fn error_with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            diag: Diagnostic {
                level: Level::Error,
                code: Some(code),
                message: message.into(),
                span: None,
                notes: Vec::new(),
            },
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            diag: Diagnostic {
                level: Level::Warning,
                code: None,
                message: message.into(),
                span: None,
                notes: Vec::new(),
            },
        }
    }

    /// A fatal diagnostic with no historic two-letter code, for failures
    /// that arise after the parse/semantic stages (codegen) and so fall
    /// outside that closed taxonomy.
    pub fn fatal(message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            diag: Diagnostic {
                level: Level::Error,
                code: None,
                message: message.into(),
                span: None,
                notes: Vec::new(),
            },
        }
    }

    pub fn span(mut self, span: Span) -> Self {
        self.diag.span = Some(span);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.diag.notes.push(note.into());
        self
    }

    pub fn emit(self, handler: &mut Handler) {
        handler.emit(self.diag);
    }
}
