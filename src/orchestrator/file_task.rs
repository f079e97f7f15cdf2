//! Per-file parse subtask.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::mailbox::Mailbox;
use super::messages::{CompletionNotice, FileReport, ImportRequest, PackageMsg, ParsedUnit, UnitName};
use super::shutdown::ShutdownSignal;
use crate::errors::CompileFailure;
use crate::frontend::{Frontend, ImportSite};

/// Parses one file on the blocking pool, then requests its imports and relays the replies.
pub(crate) struct FileTask {
    pub file: String,
    pub frontend: Frontend,
    pub reports: mpsc::Sender<FileReport>,
    pub packages: mpsc::Sender<PackageMsg>,
    pub shutdown: ShutdownSignal,
    pub depth: usize,
}

impl FileTask {
    #[tracing::instrument(name = "file_task", skip_all, fields(file = %self.file))]
    pub async fn run(self) {
        let result = self.parse().await;
        let (package, imports) = match &result {
            Ok(parsed) => (parsed.package.clone(), parsed.imports.clone()),
            Err(_) => (String::new(), Vec::new()),
        };

        let parsed = FileReport::Parsed {
            file: self.file.clone(),
            result,
        };
        if self.reports.send(parsed).await.is_err() || imports.is_empty() {
            return;
        }

        self.resolve_imports(package, imports).await;
    }

    async fn parse(&self) -> Result<ParsedUnit, Arc<CompileFailure>> {
        let file = self.file.clone();
        let frontend = self.frontend.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let parsed = frontend.parser.parse(&file)?;
            let symbols = frontend.symbols.create_symbols(&file, &parsed.ast)?;
            Ok::<_, CompileFailure>(ParsedUnit::new(parsed, symbols))
        })
        .await;

        match joined {
            Ok(result) => result.map_err(Arc::new),
            Err(err) => {
                let message = if err.is_panic() {
                    panic_message(err.into_panic())
                } else {
                    "parse task was cancelled".to_string()
                };
                tracing::error!(file = %self.file, %message, "frontend panicked");
                Err(Arc::new(CompileFailure::Internal {
                    unit: UnitName::File(self.file.clone()).to_string(),
                    message,
                }))
            }
        }
    }

    /// Request every import in declaration order, then relay replies until all arrived or one
    /// failed.
    async fn resolve_imports(&self, from_package: String, imports: Vec<ImportSite>) {
        let (reply_to, mut replies) = Mailbox::channel(self.depth);
        let mut pending: Vec<String> = Vec::with_capacity(imports.len());

        for site in imports {
            if self.shutdown.is_triggered() {
                let unit = UnitName::Package(site.package);
                let failure = CompileFailure::cancelled(&unit);
                self.relay(CompletionNotice::failed(unit, failure)).await;
                return;
            }

            let request = ImportRequest {
                package: site.package.clone(),
                from_file: self.file.clone(),
                from_package: from_package.clone(),
                position: site.position,
                reply_to: reply_to.clone(),
            };
            if self.packages.send(PackageMsg::Import(request)).await.is_err() {
                let unit = UnitName::Package(site.package);
                self.relay(CompletionNotice::failed(unit, CompileFailure::Disconnected)).await;
                return;
            }
            pending.push(site.package);
        }
        drop(reply_to);

        while !pending.is_empty() {
            let notice = tokio::select! {
                notice = replies.recv() => notice,
                _ = self.reports.closed() => return,
            };
            let Some(notice) = notice else {
                // The import loop went away without answering.
                let unit = UnitName::Package(pending.swap_remove(0));
                self.relay(CompletionNotice::failed(unit, CompileFailure::Disconnected)).await;
                return;
            };

            pending.retain(|package| package != notice.unit.as_str());
            let failed = notice.outcome.is_err();
            if !self.relay(notice).await || failed {
                return;
            }
        }
    }

    async fn relay(&self, notice: CompletionNotice) -> bool {
        let report = FileReport::ImportResolved {
            file: self.file.clone(),
            notice,
        };
        self.reports.send(report).await.is_ok()
    }
}

pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
