//! File Scheduler Loop
//!
//! Single owner of the file unit table. Every file is parsed at most once per [`Compiler`]: the
//! first request creates a unit and spawns its subtask, later requests only subscribe.
//!
//! ```text
//! CompileRequest --> FileScheduler --spawn--> FileTask --Parsed---------> FileScheduler
//!                                                  |  --ImportResolved--> FileScheduler
//!                                                  +--ImportRequest-----> ImportLoop
//! ```
//!
//! [`Compiler`]: super::Compiler

use std::collections::HashMap;

use tokio::sync::mpsc;

use super::file_task::FileTask;
use super::file_unit::FileUnit;
use super::messages::{CompileRequest, CompletionNotice, FileMsg, FileReport, PackageMsg, UnitName};
use super::shutdown::ShutdownSignal;
use crate::errors::CompileFailure;
use crate::frontend::Frontend;

pub(crate) struct FileScheduler {
    rx: mpsc::Receiver<FileMsg>,
    reports_tx: mpsc::Sender<FileReport>,
    reports_rx: mpsc::Receiver<FileReport>,
    packages: mpsc::Sender<PackageMsg>,
    frontend: Frontend,
    shutdown: ShutdownSignal,
    stopping: bool,
    depth: usize,
    units: HashMap<String, FileUnit>,
}

impl FileScheduler {
    pub fn new(
        rx: mpsc::Receiver<FileMsg>,
        packages: mpsc::Sender<PackageMsg>,
        frontend: Frontend,
        shutdown: ShutdownSignal,
        depth: usize,
    ) -> Self {
        let (reports_tx, reports_rx) = mpsc::channel(depth);
        Self {
            rx,
            reports_tx,
            reports_rx,
            packages,
            frontend,
            shutdown,
            stopping: false,
            depth,
            units: HashMap::new(),
        }
    }

    /// Main event loop. Ends when every handle to the inbox is gone.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.wait(), if !self.stopping => self.on_shutdown(),

                Some(report) = self.reports_rx.recv() => self.on_report(report),

                msg = self.rx.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => break,
                },
            }
        }
        tracing::debug!(units = self.units.len(), "file loop stopped");
    }

    fn dispatch(&mut self, msg: FileMsg) {
        match msg {
            FileMsg::Compile(request) => self.on_compile(request),
            FileMsg::Snapshot(reply) => {
                let mut views: Vec<_> = self.units.values().map(FileUnit::view).collect();
                views.sort_by(|a, b| a.name.cmp(&b.name));
                let _ = reply.send(views);
            }
        }
    }

    fn on_compile(&mut self, request: CompileRequest) {
        let CompileRequest { file_name, reply_to } = request;

        if let Some(unit) = self.units.get_mut(&file_name) {
            unit.subscribe(reply_to);
            return;
        }

        if self.shutdown.is_triggered() {
            tracing::debug!(file = %file_name, "refusing new file after shutdown");
            let unit = UnitName::File(file_name);
            let failure = CompileFailure::cancelled(&unit);
            reply_to.deliver(CompletionNotice::failed(unit, failure));
            return;
        }

        tracing::debug!(file = %file_name, "new file unit");
        let mut unit = FileUnit::new(file_name.clone());
        unit.subscribe(reply_to);
        self.units.insert(file_name.clone(), unit);

        let task = FileTask {
            file: file_name,
            frontend: self.frontend.clone(),
            reports: self.reports_tx.clone(),
            packages: self.packages.clone(),
            shutdown: self.shutdown.clone(),
            depth: self.depth,
        };
        tokio::spawn(task.run());
    }

    fn on_report(&mut self, report: FileReport) {
        match report {
            FileReport::Parsed { file, result } => {
                let Some(unit) = self.units.get_mut(&file) else {
                    return;
                };
                match result {
                    Ok(parsed) => unit.symbols_available(parsed),
                    Err(failure) => {
                        tracing::debug!(file = %file, error = %failure, "parse failed");
                        unit.complete(Err(failure));
                    }
                }
            }
            FileReport::ImportResolved { file, notice } => {
                if let Some(unit) = self.units.get_mut(&file) {
                    unit.import_resolved(notice);
                }
            }
        }
    }

    fn on_shutdown(&mut self) {
        self.stopping = true;
        tracing::info!(files = self.units.len(), "file loop observed shutdown, no new files");
    }
}
