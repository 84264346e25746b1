//! Accumulates diagnostics from every compiler phase and renders them.
//!
//! B compile errors are fatal at first occurrence (spec-defined recovery
//! policy), so in practice `emit` is called at most once with an error
//! before the driver checks [`Handler::has_errors`] and stops the pipeline;
//! the handler itself never panics or unwinds, it only accumulates.

use std::io::{self, Write};

use super::{Diagnostic, Level};
use crate::SourceMap;

/// Selects how diagnostics are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Two-letter code, file:line, two lines of source context with a caret.
    Historic,
    /// `file:line:col: error: message`, same source context.
    Verbose,
}

#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl Handler {
    pub fn new() -> Self {
        Handler::default()
    }

    pub fn emit(&mut self, diag: Diagnostic) {
        match diag.level {
            Level::Error => self.error_count += 1,
            Level::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The first fatal error, if any. Because B compilation halts at the
    /// first error, this is normally either `None` or the last diagnostic.
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.level.is_error())
    }

    /// Renders every accumulated diagnostic to `out` in the given register.
    pub fn render(&self, sources: &SourceMap, register: Register, out: &mut impl Write) -> io::Result<()> {
        for diag in &self.diagnostics {
            render_one(diag, sources, register, out)?;
        }
        Ok(())
    }
}

fn render_one(diag: &Diagnostic, sources: &SourceMap, register: Register, out: &mut impl Write) -> io::Result<()> {
    let Some(span) = diag.span else {
        return writeln!(out, "{}: {}", diag.level.name(), diag.message);
    };
    let file = sources.get(span.file);
    let path = file.path.display();

    match register {
        Register::Historic => {
            if let Some(code) = diag.code {
                writeln!(out, "{} {}:{}", code.code(), path, span.line)?;
            } else {
                writeln!(out, "warning {}:{}", path, span.line)?;
            }
        }
        Register::Verbose => {
            writeln!(
                out,
                "{}:{}:{}: {}: {}",
                path,
                span.line,
                span.column,
                diag.level.name(),
                diag.message
            )?;
        }
    }

    write_context(file, span.line, span.column, out)?;
    for note in &diag.notes {
        writeln!(out, "note: {}", note)?;
    }
    Ok(())
}

fn write_context(
    file: &crate::source_map::SourceFile,
    line: u32,
    column: u32,
    out: &mut impl Write,
) -> io::Result<()> {
    if line == 0 || line > file.line_count() {
        return Ok(());
    }
    let text = file.line_text(line);
    writeln!(out, "{}", text)?;
    let caret_pos = column.saturating_sub(1) as usize;
    writeln!(out, "{}^", " ".repeat(caret_pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{DiagnosticBuilder, ErrorCode};
    use crate::SourceMap;

    #[test]
    fn historic_register_prints_code_and_caret() {
        let mut sources = SourceMap::new();
        let file = sources.add_file("t.b", "main() {\n  bad\n}\n".to_string());
        let mut handler = Handler::new();
        DiagnosticBuilder::error(ErrorCode::NotAnLvalue)
            .span(crate::Span::new(file, 11, 14, 2, 3))
            .emit(&mut handler);

        let mut buf = Vec::new();
        handler.render(&sources, Register::Historic, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("lv t.b:2"));
        assert!(text.contains("  bad"));
        assert!(text.contains("^"));
    }

    #[test]
    fn verbose_register_prints_file_line_col() {
        let mut sources = SourceMap::new();
        let file = sources.add_file("t.b", "main() {\n  bad\n}\n".to_string());
        let mut handler = Handler::new();
        DiagnosticBuilder::error(ErrorCode::NotAnLvalue)
            .span(crate::Span::new(file, 11, 14, 2, 3))
            .emit(&mut handler);

        let mut buf = Vec::new();
        handler.render(&sources, Register::Verbose, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("t.b:2:3: error: lvalue required"));
    }

    #[test]
    fn has_errors_distinguishes_warnings() {
        let mut handler = Handler::new();
        DiagnosticBuilder::warning("fallthrough without statement").emit(&mut handler);
        assert!(!handler.has_errors());
        assert_eq!(handler.warning_count(), 1);
    }

    #[test]
    fn fatal_diagnostic_has_no_code_but_still_counts_as_an_error() {
        let sources = SourceMap::new();
        let mut handler = Handler::new();
        DiagnosticBuilder::fatal("vector bound did not fold to a constant").emit(&mut handler);
        assert!(handler.has_errors());

        let mut buf = Vec::new();
        handler.render(&sources, Register::Historic, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.trim_end(), "error: vector bound did not fold to a constant");
    }
}
