//! golite compiler frontend
//!
//! This module contains the collaborators the orchestrator drives:
//! - `services`: the `SourceParser` / `PackageLocator` / `SymbolBuilder` contracts and the
//!   `Frontend` bundle
//! - `source`: filesystem and in-memory parsers
//! - `locator`: directory-based and static package locators
//! - `symbols`: symbol table and the declaration-based symbol builder

// Syntax components are provided by the golite_syntax crate.
pub use golite_syntax::{ast, diagnostics, lexer, parser};

pub mod locator;
pub mod services;
pub mod source;
pub mod symbols;

pub use locator::{DirLocator, StaticLocator};
pub use services::{Frontend, ImportSite, PackageLocator, ParsedFile, SourceParser, SymbolBuilder};
pub use source::{FsParser, MemoryParser, normalize_file_name};
pub use symbols::{DeclSymbols, SymbolTable};
