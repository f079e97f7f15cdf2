//! Unit lifecycle.

use std::fmt;

/// Where a file or package unit is in its lifecycle.
///
/// Files move `Parsing -> SymbolsAvailable -> Complete`, or straight to `Complete` when parsing
/// fails. Packages move `Parsing -> Complete`. Nothing ever leaves `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitStatus {
    Parsing,
    SymbolsAvailable,
    Complete,
}

impl UnitStatus {
    pub fn can_advance_to(self, next: UnitStatus) -> bool {
        use UnitStatus::*;
        matches!(
            (self, next),
            (Parsing, SymbolsAvailable) | (Parsing, Complete) | (SymbolsAvailable, Complete)
        )
    }

    /// Move to `next`, refusing backward or repeated transitions.
    pub fn advance(&mut self, next: UnitStatus) -> Result<(), IllegalTransition> {
        if !self.can_advance_to(next) {
            return Err(IllegalTransition { from: *self, to: next });
        }
        *self = next;
        Ok(())
    }

    pub fn is_complete(self) -> bool {
        self == UnitStatus::Complete
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitStatus::Parsing => write!(f, "parsing"),
            UnitStatus::SymbolsAvailable => write!(f, "symbols available"),
            UnitStatus::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal unit transition from {from} to {to}")]
pub struct IllegalTransition {
    pub from: UnitStatus,
    pub to: UnitStatus,
}
