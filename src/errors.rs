//! Compilation failures.
//!
//! Every failure a compile call can observe is a [`CompileFailure`]. Failures travel between tasks
//! inside an `Arc`, so one failing unit can be fanned out to many subscribers without copying.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use golite_syntax::ast::{LineIndex, Position};
use golite_syntax::diagnostics::{CompileError, ErrorKind};

/// Why a compile call failed.
#[derive(Debug, Clone, thiserror::Error, miette::Diagnostic)]
pub enum CompileFailure {
    #[error("cannot read {file}: {source}")]
    #[diagnostic(code(golite::io))]
    Io {
        file: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("{file}:{line}:{column}: {message}")]
    #[diagnostic(code(golite::syntax))]
    Syntax {
        file: String,
        line: usize,
        column: usize,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{file}:{line}:{column}: {message}")]
    #[diagnostic(code(golite::symbol))]
    Symbol {
        file: String,
        line: usize,
        column: usize,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{file}:{line}:{column}: cannot import package \"{package}\"")]
    #[diagnostic(code(golite::import))]
    PackageResolution {
        package: String,
        file: String,
        line: usize,
        column: usize,
        #[source]
        source: LocateError,
    },

    #[error("{file}:{line}:{column}: import cycle not allowed: {path}", path = .cycle.join(" -> "))]
    #[diagnostic(code(golite::import_cycle))]
    CyclicImport {
        file: String,
        line: usize,
        column: usize,
        /// Packages on the cycle, starting and ending with the same package
        cycle: Vec<String>,
    },

    #[error("{unit}: compilation cancelled")]
    #[diagnostic(code(golite::cancelled))]
    Cancelled { unit: String },

    #[error("{unit}: internal compiler error: {message}")]
    #[diagnostic(code(golite::internal), help("this is a bug in golite"))]
    Internal { unit: String, message: String },

    #[error("the compiler has shut down")]
    #[diagnostic(code(golite::disconnected))]
    Disconnected,
}

impl CompileFailure {
    pub fn io(file: impl Into<String>, source: io::Error) -> Self {
        CompileFailure::Io {
            file: file.into(),
            source: Arc::new(source),
        }
    }

    /// Turn a syntax-crate diagnostic into a located failure for `file`.
    pub fn from_diagnostic(file: &str, lines: &LineIndex, err: &CompileError) -> Self {
        let Position { line, column } = lines.position(err.span.start);
        let help = diagnostic_help(err);
        let file = file.to_string();
        let message = err.message.clone();
        match err.kind {
            ErrorKind::Symbol => CompileFailure::Symbol {
                file,
                line,
                column,
                message,
                help,
            },
            ErrorKind::Syntax | ErrorKind::Error => CompileFailure::Syntax {
                file,
                line,
                column,
                message,
                help,
            },
        }
    }

    pub fn cancelled(unit: impl ToString) -> Self {
        CompileFailure::Cancelled { unit: unit.to_string() }
    }

    /// `true` for failures caused by shutdown rather than by the source being compiled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompileFailure::Cancelled { .. } | CompileFailure::Disconnected)
    }

    /// The source file this failure points into, if it has one.
    pub fn file(&self) -> Option<&str> {
        match self {
            CompileFailure::Io { file, .. }
            | CompileFailure::Syntax { file, .. }
            | CompileFailure::Symbol { file, .. }
            | CompileFailure::PackageResolution { file, .. }
            | CompileFailure::CyclicImport { file, .. } => Some(file),
            CompileFailure::Cancelled { .. } | CompileFailure::Internal { .. } | CompileFailure::Disconnected => None,
        }
    }

    /// Line and column of the failure, if it has a source position.
    pub fn position(&self) -> Option<Position> {
        match self {
            CompileFailure::Syntax { line, column, .. }
            | CompileFailure::Symbol { line, column, .. }
            | CompileFailure::PackageResolution { line, column, .. }
            | CompileFailure::CyclicImport { line, column, .. } => Some(Position::new(*line, *column)),
            _ => None,
        }
    }
}

fn diagnostic_help(err: &CompileError) -> Option<String> {
    let lines: Vec<String> = err
        .notes
        .iter()
        .map(|n| format!("note: {n}"))
        .chain(err.hints.iter().map(|h| format!("hint: {h}")))
        .collect();
    if lines.is_empty() { None } else { Some(lines.join("\n")) }
}

/// Why a package name could not be mapped to member files.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error("package \"{package}\" not found in {}", display_roots(.searched))]
    NotFound { package: String, searched: Vec<PathBuf> },

    #[error("cannot read package directory {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("invalid package name \"{package}\": {reason}")]
    InvalidName { package: String, reason: String },
}

fn display_roots(roots: &[PathBuf]) -> String {
    if roots.is_empty() {
        return "no search roots".to_string();
    }
    roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
