//! Read-only views of the unit tables.

use super::messages::Outcome;
use super::status::UnitStatus;

/// Both unit tables at one point in time, each sorted by name.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub files: Vec<FileUnitView>,
    pub packages: Vec<PackageUnitView>,
}

impl Snapshot {
    pub fn file(&self, name: &str) -> Option<&FileUnitView> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn package(&self, name: &str) -> Option<&PackageUnitView> {
        self.packages.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct FileUnitView {
    pub name: String,
    /// Package clause, once parsed
    pub package: Option<String>,
    pub status: UnitStatus,
    /// Imported packages not yet resolved, sorted
    pub waiting_on: Vec<String>,
    /// Top-level declarations, once parsed
    pub declarations: usize,
    /// Top-level symbols, once parsed
    pub symbols: usize,
    /// Subscribers still waiting for the outcome
    pub subscribers: usize,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone)]
pub struct PackageUnitView {
    pub name: String,
    pub status: UnitStatus,
    pub members: Vec<String>,
    /// Members not yet complete, sorted
    pub outstanding: Vec<String>,
    pub subscribers: usize,
    pub outcome: Option<Outcome>,
}
