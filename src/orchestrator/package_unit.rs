//! Per-package state machine.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::mailbox::Mailbox;
use super::messages::{CompletionNotice, Outcome, UnitName};
use super::snapshot::PackageUnitView;
use super::status::UnitStatus;
use crate::errors::CompileFailure;

/// One imported package, owned by the import loop. Completes once every member file has.
#[derive(Debug)]
pub(crate) struct PackageUnit {
    name: String,
    status: UnitStatus,
    members: Vec<String>,
    outstanding: BTreeSet<String>,
    first_error: Option<Arc<CompileFailure>>,
    subscribers: Vec<Mailbox>,
    outcome: Option<Outcome>,
}

impl PackageUnit {
    pub fn new(name: String) -> Self {
        Self {
            name,
            status: UnitStatus::Parsing,
            members: Vec::new(),
            outstanding: BTreeSet::new(),
            first_error: None,
            subscribers: Vec::new(),
            outcome: None,
        }
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    /// Member files that have not reported yet
    pub fn outstanding(&self) -> impl Iterator<Item = &String> {
        self.outstanding.iter()
    }

    /// Attach a subscriber, or answer it from the cache if the package is already complete.
    pub fn subscribe(&mut self, reply_to: Mailbox) {
        match &self.outcome {
            Some(outcome) => reply_to.deliver(self.notice(outcome.clone())),
            None => self.subscribers.push(reply_to),
        }
    }

    /// Record the located member files (duplicates folded). Returns the members to request.
    pub fn start(&mut self, members: Vec<String>) -> Vec<String> {
        for member in members {
            if self.outstanding.insert(member.clone()) {
                self.members.push(member);
            }
        }
        if self.members.is_empty() {
            self.complete(Ok(()));
        }
        self.members.clone()
    }

    /// Apply the outcome of one member file. The first failure is kept.
    pub fn member_done(&mut self, file: &str, outcome: Outcome) {
        if self.status.is_complete() || !self.outstanding.remove(file) {
            return;
        }
        if let Err(failure) = outcome {
            match &self.first_error {
                None => self.first_error = Some(failure),
                Some(kept) if !Arc::ptr_eq(kept, &failure) => {
                    tracing::debug!(package = %self.name, file, error = %failure, "discarding later member failure");
                }
                Some(_) => {}
            }
        }
        if self.outstanding.is_empty() {
            let outcome = match self.first_error.take() {
                Some(failure) => Err(failure),
                None => Ok(()),
            };
            self.complete(outcome);
        }
    }

    /// Enter the terminal state, cache the outcome and notify every subscriber once.
    pub fn complete(&mut self, outcome: Outcome) {
        if let Err(err) = self.status.advance(UnitStatus::Complete) {
            tracing::error!(package = %self.name, %err, "ignoring second completion");
            return;
        }
        self.outstanding.clear();

        let subscribers = std::mem::take(&mut self.subscribers);
        tracing::debug!(
            package = %self.name,
            ok = outcome.is_ok(),
            subscribers = subscribers.len(),
            "package complete"
        );
        for reply_to in subscribers {
            reply_to.deliver(self.notice(outcome.clone()));
        }
        self.outcome = Some(outcome);
    }

    fn notice(&self, outcome: Outcome) -> CompletionNotice {
        CompletionNotice::new(UnitName::Package(self.name.clone()), outcome)
    }

    pub fn view(&self) -> PackageUnitView {
        PackageUnitView {
            name: self.name.clone(),
            status: self.status,
            members: self.members.clone(),
            outstanding: self.outstanding.iter().cloned().collect(),
            subscribers: self.subscribers.len(),
            outcome: self.outcome.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(unit: &str) -> Arc<CompileFailure> {
        Arc::new(CompileFailure::Internal {
            unit: unit.to_string(),
            message: "boom".to_string(),
        })
    }

    #[tokio::test]
    async fn test_zero_members_complete_at_once() {
        let (mailbox, mut rx) = Mailbox::channel(1);
        let mut unit = PackageUnit::new("fmt".to_string());
        unit.subscribe(mailbox);
        assert!(unit.start(Vec::new()).is_empty());
        assert_eq!(unit.status(), UnitStatus::Complete);
        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.unit, UnitName::Package("fmt".to_string()));
        assert!(notice.outcome.is_ok());
    }

    #[test]
    fn test_waits_for_every_member() {
        let mut unit = PackageUnit::new("util".to_string());
        let members = unit.start(vec!["b.go".into(), "a.go".into(), "b.go".into()]);
        assert_eq!(members, vec!["b.go", "a.go"]);

        unit.member_done("a.go", Ok(()));
        assert_eq!(unit.status(), UnitStatus::Parsing);
        assert_eq!(unit.view().outstanding, vec!["b.go"]);
        unit.member_done("b.go", Ok(()));
        assert_eq!(unit.status(), UnitStatus::Complete);
        assert!(matches!(unit.view().outcome, Some(Ok(()))));
    }

    #[test]
    fn test_first_member_error_wins() {
        let mut unit = PackageUnit::new("util".to_string());
        unit.start(vec!["a.go".into(), "b.go".into(), "c.go".into()]);
        let first = failure("file b.go");
        unit.member_done("b.go", Err(first.clone()));
        unit.member_done("a.go", Err(failure("file a.go")));
        assert_eq!(unit.status(), UnitStatus::Parsing);
        unit.member_done("c.go", Ok(()));

        match unit.view().outcome {
            Some(Err(kept)) => assert!(Arc::ptr_eq(&kept, &first)),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_member_notice_is_ignored() {
        let mut unit = PackageUnit::new("util".to_string());
        unit.start(vec!["a.go".into()]);
        unit.member_done("other.go", Err(failure("file other.go")));
        assert_eq!(unit.status(), UnitStatus::Parsing);
    }
}
