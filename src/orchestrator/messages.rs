//! Message definitions
//!
//! Message types exchanged between the compile façade, the two loops and the per-file subtasks.
//!
//! ```text
//! compile() --CompileRequest--> FileScheduler --spawn--> file subtask
//!                                    ^                      |
//!                                    |                 ImportRequest
//!                              CompileRequest               v
//!                                    +------------------ ImportLoop
//! ```
//!
//! Every reply travels as a [`CompletionNotice`] through a [`Mailbox`] owned by the requester.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use super::mailbox::Mailbox;
use super::snapshot::{FileUnitView, PackageUnitView};
use crate::errors::CompileFailure;
use crate::frontend::ast::{Position, SourceFile};
use crate::frontend::services::{ImportSite, ParsedFile};
use crate::frontend::symbols::SymbolTable;

/// Terminal result of a unit. Failures are shared so one error can be fanned out to many
/// subscribers unchanged.
pub type Outcome = Result<(), Arc<CompileFailure>>;

/// Identity of a file or package unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitName {
    File(String),
    Package(String),
}

impl UnitName {
    pub fn as_str(&self) -> &str {
        match self {
            UnitName::File(name) | UnitName::Package(name) => name,
        }
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitName::File(name) => write!(f, "file {name}"),
            UnitName::Package(name) => write!(f, "package \"{name}\""),
        }
    }
}

/// The reply every subscriber eventually receives for a unit.
#[derive(Debug, Clone)]
pub struct CompletionNotice {
    pub unit: UnitName,
    pub outcome: Outcome,
}

impl CompletionNotice {
    pub fn new(unit: UnitName, outcome: Outcome) -> Self {
        Self { unit, outcome }
    }

    pub fn failed(unit: UnitName, failure: CompileFailure) -> Self {
        Self::new(unit, Err(Arc::new(failure)))
    }
}

/// Ask the file loop to compile one file.
#[derive(Debug)]
pub struct CompileRequest {
    pub file_name: String,
    pub reply_to: Mailbox,
}

/// Ask the import loop to make a package available.
#[derive(Debug)]
pub struct ImportRequest {
    pub package: String,
    pub from_file: String,
    /// Package clause of the importing file
    pub from_package: String,
    pub position: Position,
    pub reply_to: Mailbox,
}

// =============================================================================
// FileScheduler Messages
// =============================================================================

/// Messages to the file loop's inbox
#[derive(Debug)]
pub(crate) enum FileMsg {
    Compile(CompileRequest),
    Snapshot(oneshot::Sender<Vec<FileUnitView>>),
}

/// Reports from a file's subtask back to the file loop
#[derive(Debug)]
pub(crate) enum FileReport {
    /// Parse and symbol creation finished
    Parsed {
        file: String,
        result: Result<ParsedUnit, Arc<CompileFailure>>,
    },
    /// One of the file's imports reached a terminal state
    ImportResolved { file: String, notice: CompletionNotice },
}

/// What a successful parse subtask hands to its file unit.
#[derive(Debug)]
pub(crate) struct ParsedUnit {
    pub package: String,
    pub ast: SourceFile,
    pub symbols: SymbolTable,
    /// First site of each distinct imported package, in declaration order
    pub imports: Vec<ImportSite>,
}

impl ParsedUnit {
    pub fn new(parsed: ParsedFile, symbols: SymbolTable) -> Self {
        let mut imports: Vec<ImportSite> = Vec::with_capacity(parsed.imports.len());
        for site in parsed.imports {
            if !imports.iter().any(|seen| seen.package == site.package) {
                imports.push(site);
            }
        }
        Self {
            package: parsed.ast.package.node.clone(),
            ast: parsed.ast,
            symbols,
            imports,
        }
    }
}

// =============================================================================
// ImportLoop Messages
// =============================================================================

/// Messages to the import loop's inbox
#[derive(Debug)]
pub(crate) enum PackageMsg {
    Import(ImportRequest),
    Snapshot(oneshot::Sender<Vec<PackageUnitView>>),
}

/// A finished package lookup, sent back to the import loop by its locate task.
///
/// `from_file` and `position` are those of the import that created the unit.
#[derive(Debug)]
pub(crate) struct Located {
    pub package: String,
    pub from_file: String,
    pub position: Position,
    pub result: Result<Vec<String>, CompileFailure>,
}
