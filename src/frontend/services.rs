//! Collaborator contracts used by the orchestrator.
//!
//! The orchestrator never touches the filesystem or the syntax crate directly: it asks a
//! [`SourceParser`] for an AST, a [`PackageLocator`] for a package's member files and a
//! [`SymbolBuilder`] for a file's top-level symbols. All three are synchronous and are called from
//! the blocking pool (parser, symbols) or inline in the import loop (locator).

use std::sync::Arc;

use super::ast::{Position, SourceFile};
use super::locator::DirLocator;
use super::source::FsParser;
use super::symbols::{DeclSymbols, SymbolTable};
use crate::config::CompilerConfig;
use crate::errors::{CompileFailure, LocateError};

/// Turns a file name into a parsed file.
pub trait SourceParser: Send + Sync {
    fn parse(&self, file_name: &str) -> Result<ParsedFile, CompileFailure>;
}

/// Maps a package name to the names of its member files.
pub trait PackageLocator: Send + Sync {
    fn locate(&self, package: &str) -> Result<Vec<String>, LocateError>;
}

/// Builds the package-level symbol table of one parsed file.
pub trait SymbolBuilder: Send + Sync {
    fn create_symbols(&self, file_name: &str, ast: &SourceFile) -> Result<SymbolTable, CompileFailure>;
}

/// A parsed file and the imports it declares.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub ast: SourceFile,
    /// Imports in declaration order, including repeats
    pub imports: Vec<ImportSite>,
}

impl ParsedFile {
    /// Collect the import sites of `ast` with their source positions.
    pub fn from_ast(ast: SourceFile) -> Self {
        let imports = ast
            .imports
            .iter()
            .map(|import| ImportSite {
                package: import.node.path.clone(),
                position: ast.position(import.span),
            })
            .collect();
        Self { ast, imports }
    }
}

/// Where a file imports a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub package: String,
    pub position: Position,
}

/// The collaborator bundle handed to a [`Compiler`](crate::orchestrator::Compiler).
#[derive(Clone)]
pub struct Frontend {
    pub parser: Arc<dyn SourceParser>,
    pub locator: Arc<dyn PackageLocator>,
    pub symbols: Arc<dyn SymbolBuilder>,
}

impl Frontend {
    pub fn new(
        parser: impl SourceParser + 'static,
        locator: impl PackageLocator + 'static,
        symbols: impl SymbolBuilder + 'static,
    ) -> Self {
        Self {
            parser: Arc::new(parser),
            locator: Arc::new(locator),
            symbols: Arc::new(symbols),
        }
    }

    /// Filesystem parser, directory locator over `config.search_paths` and declaration symbols.
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(
            FsParser,
            DirLocator::new(config.search_paths.clone(), config.source_extension.clone()),
            DeclSymbols,
        )
    }

    /// Replace the package locator.
    pub fn with_locator(mut self, locator: impl PackageLocator + 'static) -> Self {
        self.locator = Arc::new(locator);
        self
    }

    /// Replace the source parser.
    pub fn with_parser(mut self, parser: impl SourceParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }
}

impl std::fmt::Debug for Frontend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontend").finish_non_exhaustive()
    }
}

impl<T: SourceParser + ?Sized> SourceParser for Arc<T> {
    fn parse(&self, file_name: &str) -> Result<ParsedFile, CompileFailure> {
        (**self).parse(file_name)
    }
}

impl<T: PackageLocator + ?Sized> PackageLocator for Arc<T> {
    fn locate(&self, package: &str) -> Result<Vec<String>, LocateError> {
        (**self).locate(package)
    }
}

impl<T: SymbolBuilder + ?Sized> SymbolBuilder for Arc<T> {
    fn create_symbols(&self, file_name: &str, ast: &SourceFile) -> Result<SymbolTable, CompileFailure> {
        (**self).create_symbols(file_name, ast)
    }
}
