//! Diagnostics for the golite syntax frontend
//!
//! [`CompileError`] is a plain value with a byte span; it implements [`miette::Diagnostic`] so callers
//! that hold the source text can render it with labels via `miette::Report::with_source_code`.

use std::fmt;

use crate::ast::Span;

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            ..Self::new(message, span)
        }
    }

    pub fn symbol(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Symbol,
            ..Self::new(message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
    Symbol,
}

impl ErrorKind {
    /// Stable diagnostic code, shown by miette next to the message.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Error => "golite::error",
            ErrorKind::Syntax => "golite::syntax",
            ErrorKind::Symbol => "golite::symbol",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Symbol => write!(f, "symbol error"),
        }
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let lines: Vec<String> = self
            .notes
            .iter()
            .map(|n| format!("note: {n}"))
            .chain(self.hints.iter().map(|h| format!("hint: {h}")))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let len = self.span.end.saturating_sub(self.span.start);
        Some(Box::new(std::iter::once(miette::LabeledSpan::new(
            Some(self.message.clone()),
            self.span.start,
            len,
        ))))
    }
}

// ============================================================================
// Error catalog: common syntax errors
// ============================================================================

pub mod errors {
    use super::*;

    pub fn missing_package_clause(span: Span) -> CompileError {
        CompileError::syntax("the file should start with 'package <name>'".to_string(), span)
    }

    pub fn package_name_not_ident(found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("package name must be an identifier, found {found}"), span)
    }

    pub fn import_not_string(found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("imports should be a quoted string, found {found}"), span)
    }

    pub fn empty_import_path(span: Span) -> CompileError {
        CompileError::syntax("import path must not be empty".to_string(), span)
    }

    pub fn invalid_import_path(path: &str, bad: char, span: Span) -> CompileError {
        CompileError::syntax(format!("invalid import path {path:?}: character {bad:?} is not allowed"), span)
    }

    pub fn import_after_decl(span: Span) -> CompileError {
        CompileError::syntax("imports must appear before other declarations".to_string(), span)
            .with_hint("move this import above the first func, var, const or type")
    }

    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("expected {expected}, found {found}"), span)
    }

    pub fn unclosed_delimiter(open: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("unclosed delimiter '{open}'"), span)
    }

    pub fn mismatched_delimiter(expected: &str, found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("mismatched delimiter: expected '{expected}', found '{found}'"), span)
    }

    pub fn redeclared(name: &str, span: Span, first: crate::ast::Position) -> CompileError {
        CompileError::symbol(format!("`{name}` redeclared in this block"), span)
            .with_note(format!("previous declaration at {first}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn test_display_includes_kind() {
        let err = CompileError::syntax("expected ;".to_string(), Span::new(0, 1));
        assert_eq!(err.to_string(), "syntax error: expected ;");
    }

    #[test]
    fn test_diagnostic_help_lists_notes_then_hints() {
        let err = CompileError::new("boom".to_string(), Span::new(2, 4))
            .with_hint("try again")
            .with_note("first seen here");
        let help = err.help().map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("note: first seen here\nhint: try again"));
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("golite::error"));
    }

    #[test]
    fn test_label_covers_span() {
        let err = CompileError::syntax("bad".to_string(), Span::new(3, 7));
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 3);
        assert_eq!(labels[0].len(), 4);
    }
}
