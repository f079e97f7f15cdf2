//! Per-file state machine.

use std::collections::BTreeSet;

use super::mailbox::Mailbox;
use super::messages::{CompletionNotice, Outcome, ParsedUnit, UnitName};
use super::snapshot::FileUnitView;
use super::status::UnitStatus;
use crate::frontend::ast::SourceFile;
use crate::frontend::symbols::SymbolTable;

/// One file's compilation, owned by the file loop.
#[derive(Debug)]
pub(crate) struct FileUnit {
    name: String,
    status: UnitStatus,
    package: Option<String>,
    ast: Option<SourceFile>,
    symbols: Option<SymbolTable>,
    waiting_on: BTreeSet<String>,
    subscribers: Vec<Mailbox>,
    outcome: Option<Outcome>,
}

impl FileUnit {
    pub fn new(name: String) -> Self {
        Self {
            name,
            status: UnitStatus::Parsing,
            package: None,
            ast: None,
            symbols: None,
            waiting_on: BTreeSet::new(),
            subscribers: Vec::new(),
            outcome: None,
        }
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    /// Attach a subscriber, or answer it from the cache if the unit is already complete.
    pub fn subscribe(&mut self, reply_to: Mailbox) {
        match &self.outcome {
            Some(outcome) => reply_to.deliver(self.notice(outcome.clone())),
            None => self.subscribers.push(reply_to),
        }
    }

    /// Record a successful parse. A file without imports completes here.
    pub fn symbols_available(&mut self, parsed: ParsedUnit) {
        if let Err(err) = self.status.advance(UnitStatus::SymbolsAvailable) {
            tracing::error!(file = %self.name, %err, "dropping parse result");
            return;
        }
        self.waiting_on = parsed.imports.into_iter().map(|site| site.package).collect();
        self.package = Some(parsed.package);
        self.ast = Some(parsed.ast);
        self.symbols = Some(parsed.symbols);
        tracing::debug!(file = %self.name, imports = self.waiting_on.len(), "symbols available");

        if self.waiting_on.is_empty() {
            self.complete(Ok(()));
        }
    }

    /// Apply the outcome of one imported package.
    pub fn import_resolved(&mut self, notice: CompletionNotice) {
        if self.status.is_complete() {
            tracing::trace!(file = %self.name, unit = %notice.unit, "late import notice ignored");
            return;
        }
        if !self.waiting_on.remove(notice.unit.as_str()) {
            tracing::debug!(file = %self.name, unit = %notice.unit, "unexpected import notice");
            return;
        }
        match notice.outcome {
            Err(failure) => self.complete(Err(failure)),
            Ok(()) if self.waiting_on.is_empty() => self.complete(Ok(())),
            Ok(()) => {}
        }
    }

    /// Enter the terminal state, cache the outcome and notify every subscriber once.
    pub fn complete(&mut self, outcome: Outcome) {
        if let Err(err) = self.status.advance(UnitStatus::Complete) {
            tracing::error!(file = %self.name, %err, "ignoring second completion");
            return;
        }
        self.waiting_on.clear();

        let subscribers = std::mem::take(&mut self.subscribers);
        tracing::debug!(
            file = %self.name,
            ok = outcome.is_ok(),
            subscribers = subscribers.len(),
            "file complete"
        );
        for reply_to in subscribers {
            reply_to.deliver(self.notice(outcome.clone()));
        }
        self.outcome = Some(outcome);
    }

    fn notice(&self, outcome: Outcome) -> CompletionNotice {
        CompletionNotice::new(UnitName::File(self.name.clone()), outcome)
    }

    pub fn view(&self) -> FileUnitView {
        FileUnitView {
            name: self.name.clone(),
            package: self.package.clone(),
            status: self.status,
            waiting_on: self.waiting_on.iter().cloned().collect(),
            declarations: self.ast.as_ref().map_or(0, |ast| ast.decls.len()),
            symbols: self.symbols.as_ref().map_or(0, SymbolTable::len),
            subscribers: self.subscribers.len(),
            outcome: self.outcome.clone(),
        }
    }
}
