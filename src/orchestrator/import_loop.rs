//! Package Import Loop
//!
//! Single owner of the package unit table. A package is located and its member files requested
//! at most once per [`Compiler`]; every later import subscribes to the unit or is answered from
//! its cached outcome.
//!
//! ```text
//! ImportRequest --> ImportLoop --spawn_blocking--> PackageLocator
//!                       |  <------Located-------------+
//!                       |
//!                       +--CompileRequest--> FileScheduler --CompletionNotice--> ImportLoop
//! ```
//!
//! [`Compiler`]: super::Compiler

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::file_task::panic_message;
use super::graph::{ImportGraph, packages_on};
use super::mailbox::{Mailbox, forward};
use super::messages::{
    CompileRequest, CompletionNotice, FileMsg, ImportRequest, Located, Outcome, PackageMsg, UnitName,
};
use super::package_unit::PackageUnit;
use super::shutdown::ShutdownSignal;
use crate::errors::CompileFailure;
use crate::frontend::{PackageLocator, normalize_file_name};
use crate::frontend::ast::Position;

pub(crate) struct ImportLoop {
    rx: mpsc::Receiver<PackageMsg>,
    files: mpsc::WeakSender<FileMsg>,
    members_tx: mpsc::Sender<CompletionNotice>,
    members_rx: mpsc::Receiver<CompletionNotice>,
    located_tx: mpsc::Sender<Located>,
    located_rx: mpsc::Receiver<Located>,
    locator: Arc<dyn PackageLocator>,
    shutdown: ShutdownSignal,
    stopping: bool,
    units: HashMap<String, PackageUnit>,
    /// member file -> packages still waiting for its notice
    pending_members: HashMap<String, Vec<String>>,
    graph: ImportGraph,
}

impl ImportLoop {
    pub fn new(
        rx: mpsc::Receiver<PackageMsg>,
        files: mpsc::WeakSender<FileMsg>,
        locator: Arc<dyn PackageLocator>,
        shutdown: ShutdownSignal,
        depth: usize,
    ) -> Self {
        let (members_tx, members_rx) = mpsc::channel(depth);
        let (located_tx, located_rx) = mpsc::channel(depth);
        Self {
            rx,
            files,
            members_tx,
            members_rx,
            located_tx,
            located_rx,
            locator,
            shutdown,
            stopping: false,
            units: HashMap::new(),
            pending_members: HashMap::new(),
            graph: ImportGraph::default(),
        }
    }

    /// Main event loop. Ends when every handle to the inbox is gone.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.wait(), if !self.stopping => self.on_shutdown(),

                Some(notice) = self.members_rx.recv() => self.on_member_notice(notice),

                Some(located) = self.located_rx.recv() => self.on_located(located),

                msg = self.rx.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => break,
                },
            }
        }
        tracing::debug!(units = self.units.len(), "import loop stopped");
    }

    fn dispatch(&mut self, msg: PackageMsg) {
        match msg {
            PackageMsg::Import(request) => self.on_import(request),
            PackageMsg::Snapshot(reply) => {
                let mut views: Vec<_> = self.units.values().map(PackageUnit::view).collect();
                views.sort_by(|a, b| a.name.cmp(&b.name));
                let _ = reply.send(views);
            }
        }
    }

    // =========================================================================
    // Import requests
    // =========================================================================

    fn on_import(&mut self, request: ImportRequest) {
        let known = self.units.get(&request.package).map(PackageUnit::status);
        match known {
            Some(status) => {
                if !status.is_complete() {
                    if let Some(cycle) = self.import_cycle(&request) {
                        self.reject_cycle(request, cycle);
                        return;
                    }
                    self.graph.record(&request.from_file, &request.package);
                }
                if let Some(unit) = self.units.get_mut(&request.package) {
                    unit.subscribe(request.reply_to);
                }
            }
            None if self.shutdown.is_triggered() => {
                tracing::debug!(package = %request.package, "refusing new package after shutdown");
                let unit = UnitName::Package(request.package);
                let failure = CompileFailure::cancelled(&unit);
                request.reply_to.deliver(CompletionNotice::failed(unit, failure));
            }
            None => self.create(request),
        }
    }

    fn create(&mut self, request: ImportRequest) {
        let ImportRequest {
            package,
            from_file,
            from_package,
            position,
            reply_to,
        } = request;
        tracing::debug!(%package, %from_file, %from_package, "new package unit");

        self.graph.record(&from_file, &package);
        let mut unit = PackageUnit::new(package.clone());
        unit.subscribe(reply_to);
        self.units.insert(package.clone(), unit);

        self.spawn_locate(package, from_file, position);
    }

    /// Run the locator on the blocking pool; the result comes back as [`Located`].
    fn spawn_locate(&self, package: String, from_file: String, position: Position) {
        let locator = Arc::clone(&self.locator);
        let located = self.located_tx.clone();
        tokio::spawn(async move {
            let name = package.clone();
            let joined = tokio::task::spawn_blocking(move || locator.locate(&name)).await;
            let result = match joined {
                Ok(Ok(members)) => Ok(members),
                Ok(Err(source)) => Err(CompileFailure::PackageResolution {
                    package: package.clone(),
                    file: from_file.clone(),
                    line: position.line,
                    column: position.column,
                    source,
                }),
                Err(err) => {
                    let message = if err.is_panic() {
                        panic_message(err.into_panic())
                    } else {
                        "locate task was cancelled".to_string()
                    };
                    tracing::error!(%package, %message, "package locator panicked");
                    Err(CompileFailure::Internal {
                        unit: UnitName::Package(package.clone()).to_string(),
                        message,
                    })
                }
            };
            let reply = Located {
                package,
                from_file,
                position,
                result,
            };
            if located.send(reply).await.is_err() {
                tracing::debug!("import loop gone before package was located");
            }
        });
    }

    fn on_located(&mut self, located: Located) {
        let Located {
            package,
            from_file,
            position,
            result,
        } = located;

        let members: Vec<String> = match result {
            Ok(members) => members.iter().map(|m| normalize_file_name(m)).collect(),
            Err(failure) => {
                self.complete(&package, Err(Arc::new(failure)));
                return;
            }
        };
        tracing::debug!(%package, members = members.len(), "package located");

        if let Some(cycle) = self.member_cycle(&package, &members) {
            let failure = CompileFailure::CyclicImport {
                file: from_file,
                line: position.line,
                column: position.column,
                cycle,
            };
            self.complete(&package, Err(Arc::new(failure)));
            return;
        }

        let members = match self.units.get_mut(&package) {
            Some(unit) => unit.start(members),
            None => return,
        };
        self.request_members(&package, members);
    }

    fn request_members(&mut self, package: &str, members: Vec<String>) {
        let files = self.files.upgrade();
        for member in members {
            self.pending_members
                .entry(member.clone())
                .or_default()
                .push(package.to_string());

            let request = CompileRequest {
                file_name: member.clone(),
                reply_to: Mailbox::from(self.members_tx.clone()),
            };
            let sent = files
                .as_ref()
                .is_some_and(|tx| forward(tx, FileMsg::Compile(request)));
            if !sent {
                let unit = UnitName::File(member);
                self.on_member_notice(CompletionNotice::failed(unit, CompileFailure::Disconnected));
            }
        }
    }

    // =========================================================================
    // Cycles
    // =========================================================================

    /// Importing a live package closes a cycle if that package already waits on the importer.
    fn import_cycle(&self, request: &ImportRequest) -> Option<Vec<String>> {
        let path = self.graph.path(
            UnitName::Package(request.package.clone()),
            &UnitName::File(request.from_file.clone()),
            &self.units,
        )?;
        let mut cycle = packages_on(&path);
        let owner = cycle.last()?.clone();
        cycle.insert(0, owner);
        Some(cycle)
    }

    /// A new package closes a cycle if one of its members already waits on it.
    fn member_cycle(&self, package: &str, members: &[String]) -> Option<Vec<String>> {
        let target = UnitName::Package(package.to_string());
        members
            .iter()
            .find_map(|member| self.graph.path(UnitName::File(member.clone()), &target, &self.units))
            .map(|path| {
                let mut cycle = vec![package.to_string()];
                cycle.extend(packages_on(&path));
                cycle
            })
    }

    fn reject_cycle(&self, request: ImportRequest, cycle: Vec<String>) {
        tracing::debug!(package = %request.package, from_file = %request.from_file, ?cycle, "import cycle");
        let failure = CompileFailure::CyclicImport {
            file: request.from_file,
            line: request.position.line,
            column: request.position.column,
            cycle,
        };
        let unit = UnitName::Package(request.package);
        request.reply_to.deliver(CompletionNotice::failed(unit, failure));
    }

    // =========================================================================
    // Member notices
    // =========================================================================

    fn on_member_notice(&mut self, notice: CompletionNotice) {
        let UnitName::File(file) = &notice.unit else {
            return;
        };
        let Some(waiting) = self.pending_members.get_mut(file) else {
            return;
        };
        let package = (!waiting.is_empty()).then(|| waiting.remove(0));
        if waiting.is_empty() {
            self.pending_members.remove(file);
        }

        if let Some(package) = package {
            if let Some(unit) = self.units.get_mut(&package) {
                unit.member_done(file, notice.outcome);
            }
        }
    }

    fn complete(&mut self, package: &str, outcome: Outcome) {
        if let Some(unit) = self.units.get_mut(package) {
            unit.complete(outcome);
        }
    }

    fn on_shutdown(&mut self) {
        self.stopping = true;
        tracing::info!(packages = self.units.len(), "import loop observed shutdown, no new packages");
    }
}
