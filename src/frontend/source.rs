//! Source parsers: the filesystem parser and an in-memory one for embedding.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::ast::LineIndex;
use super::services::{ParsedFile, SourceParser};
use super::{lexer, parser};
use crate::errors::CompileFailure;

/// Reads files from disk, then lexes and parses them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsParser;

impl SourceParser for FsParser {
    #[tracing::instrument(level = "debug", skip(self))]
    fn parse(&self, file_name: &str) -> Result<ParsedFile, CompileFailure> {
        let source = fs::read_to_string(file_name).map_err(|e| CompileFailure::io(file_name, e))?;
        parse_text(file_name, &source)
    }
}

/// Serves sources from a map of file name to text. Unknown names fail like a missing file.
#[derive(Debug, Clone, Default)]
pub struct MemoryParser {
    files: HashMap<String, String>,
}

impl MemoryParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn with_file(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.files.insert(name.into(), source.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.files.insert(name.into(), source.into());
    }
}

impl SourceParser for MemoryParser {
    fn parse(&self, file_name: &str) -> Result<ParsedFile, CompileFailure> {
        let source = self.files.get(file_name).ok_or_else(|| {
            CompileFailure::io(
                file_name,
                io::Error::new(io::ErrorKind::NotFound, "no such file"),
            )
        })?;
        parse_text(file_name, source)
    }
}

/// Canonical spelling of a file name, used as the identity of its file unit.
///
/// `.` components and repeated separators are dropped, so `./a//a.go` and `a/a.go` name the same
/// unit. `..` is kept: resolving it would need the filesystem.
pub fn normalize_file_name(name: &str) -> String {
    let path: PathBuf = Path::new(name)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if path.as_os_str().is_empty() {
        name.to_string()
    } else {
        path.to_string_lossy().into_owned()
    }
}

/// Lex and parse `source`, reporting the first diagnostic as a located failure.
pub fn parse_text(file_name: &str, source: &str) -> Result<ParsedFile, CompileFailure> {
    let first_failure = |errs: Vec<super::diagnostics::CompileError>| {
        let lines = LineIndex::new(source);
        match errs.first() {
            Some(err) => CompileFailure::from_diagnostic(file_name, &lines, err),
            None => CompileFailure::Internal {
                unit: file_name.to_string(),
                message: "parser failed without a diagnostic".to_string(),
            },
        }
    };

    let tokens = lexer::lex(source).map_err(first_failure)?;
    let ast = parser::parse(&tokens, source).map_err(first_failure)?;
    Ok(ParsedFile::from_ast(ast))
}
