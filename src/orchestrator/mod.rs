//! Concurrent compilation orchestrator
//!
//! A [`Compiler`] owns two long-lived loops:
//! - the File Scheduler Loop, owner of every file unit, which parses each file once on the
//!   blocking pool and tracks its imports
//! - the Package Import Loop, owner of every package unit, which locates each imported package
//!   once, compiles its member files through the file loop and fans the result out to importers
//!
//! The loops share nothing. They talk through bounded channels, never await a send, and answer
//! repeated requests from the units' cached outcomes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use golite::frontend::{DeclSymbols, Frontend, MemoryParser, StaticLocator};
//! use golite::orchestrator::Compiler;
//!
//! # async fn demo() -> Result<(), golite::CompileFailure> {
//! let parser = MemoryParser::new().with_file("main.go", "package main\n\nfunc main() {}\n");
//! let compiler = Compiler::new(Frontend::new(parser, StaticLocator::new(), DeclSymbols));
//! compiler.compile(["main.go"]).await?;
//! compiler.close().await;
//! # Ok(())
//! # }
//! ```

mod file_loop;
mod file_task;
mod file_unit;
mod graph;
mod import_loop;
pub mod mailbox;
pub mod messages;
mod package_unit;
pub mod shutdown;
pub mod snapshot;
pub mod status;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::CompilerConfig;
use crate::errors::CompileFailure;
use crate::frontend::{Frontend, normalize_file_name};
use file_loop::FileScheduler;
use import_loop::ImportLoop;
use messages::{FileMsg, PackageMsg};

pub use mailbox::Mailbox;
pub use messages::{CompileRequest, CompletionNotice, ImportRequest, Outcome, UnitName};
pub use shutdown::{Shutdown, ShutdownSignal};
pub use snapshot::{FileUnitView, PackageUnitView, Snapshot};
pub use status::UnitStatus;

/// Handle to a running pair of compilation loops.
///
/// Units live as long as the `Compiler`: compiling the same files again replays their cached
/// outcomes. Dropping the `Compiler` broadcasts shutdown; [`Compiler::close`] also waits for both
/// loops to finish.
pub struct Compiler {
    files: mpsc::Sender<FileMsg>,
    packages: mpsc::Sender<PackageMsg>,
    shutdown: Shutdown,
    config: CompilerConfig,
    loops: Vec<JoinHandle<()>>,
}

impl Compiler {
    /// Start the loops with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(frontend: Frontend) -> Self {
        Self::with_config(frontend, CompilerConfig::default())
    }

    /// Start the loops on the ambient tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn with_config(frontend: Frontend, config: CompilerConfig) -> Self {
        let depth = config.mailbox_depth.max(1);
        let shutdown = Shutdown::new();
        let (files_tx, files_rx) = mpsc::channel(depth);
        let (packages_tx, packages_rx) = mpsc::channel(depth);

        let imports = ImportLoop::new(
            packages_rx,
            files_tx.downgrade(),
            Arc::clone(&frontend.locator),
            shutdown.signal(),
            depth,
        );
        let scheduler = FileScheduler::new(files_rx, packages_tx.clone(), frontend, shutdown.signal(), depth);
        let loops = vec![tokio::spawn(scheduler.run()), tokio::spawn(imports.run())];

        tracing::debug!(mailbox_depth = depth, keep_going = config.keep_going, "compiler started");
        Self {
            files: files_tx,
            packages: packages_tx,
            shutdown,
            config,
            loops,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `file_names` and everything they import.
    ///
    /// Names are normalized first, so `./a.go` and `a.go` are the same file.
    ///
    /// Returns once every distinct requested file has reported. The first failure wins; unless
    /// `keep_going` is set it also broadcasts shutdown so outstanding work is cancelled.
    #[tracing::instrument(skip_all, fields(files = tracing::field::Empty))]
    pub async fn compile<I, S>(&self, file_names: I) -> Result<(), CompileFailure>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut waiting: HashSet<String> = HashSet::new();
        let names: Vec<String> = file_names
            .into_iter()
            .map(|name| {
                let name: String = name.into();
                normalize_file_name(&name)
            })
            .filter(|name| waiting.insert(name.clone()))
            .collect();
        tracing::Span::current().record("files", names.len());
        if names.is_empty() {
            return Ok(());
        }

        let (reply_to, mut replies) = Mailbox::channel(self.config.mailbox_depth);
        for file_name in names {
            let request = CompileRequest {
                file_name,
                reply_to: reply_to.clone(),
            };
            if self.files.send(FileMsg::Compile(request)).await.is_err() {
                return Err(CompileFailure::Disconnected);
            }
        }
        drop(reply_to);

        let mut first: Option<Arc<CompileFailure>> = None;
        while !waiting.is_empty() {
            let Some(notice) = replies.recv().await else {
                break;
            };
            let UnitName::File(name) = &notice.unit else {
                continue;
            };
            if !waiting.remove(name) {
                continue;
            }
            if let Err(failure) = notice.outcome {
                self.record_failure(&mut first, failure);
            }
        }

        if !waiting.is_empty() && first.is_none() {
            first = Some(Arc::new(CompileFailure::Disconnected));
        }
        match first {
            Some(failure) => Err(Arc::unwrap_or_clone(failure)),
            None => Ok(()),
        }
    }

    /// Keep the first failure, letting a real failure replace a cancellation.
    fn record_failure(&self, first: &mut Option<Arc<CompileFailure>>, failure: Arc<CompileFailure>) {
        let replace = match first.as_ref() {
            None => true,
            Some(kept) => kept.is_cancelled() && !failure.is_cancelled(),
        };

        if first.is_none() {
            tracing::warn!(error = %failure, "compilation failed");
            if !self.config.keep_going {
                self.shutdown();
            }
        }

        if replace {
            *first = Some(failure);
        } else if first.as_ref().is_some_and(|kept| !Arc::ptr_eq(kept, &failure)) {
            tracing::debug!(error = %failure, "discarding later failure");
        }
    }

    /// Broadcast shutdown. Idempotent.
    pub fn shutdown(&self) {
        if self.shutdown.trigger() {
            tracing::info!("broadcasting shutdown");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Views of both unit tables. Each table is consistent on its own; the two are read one
    /// after the other.
    pub async fn snapshot(&self) -> Result<Snapshot, CompileFailure> {
        let (files_tx, files_rx) = oneshot::channel();
        self.files
            .send(FileMsg::Snapshot(files_tx))
            .await
            .map_err(|_| CompileFailure::Disconnected)?;
        let files = files_rx.await.map_err(|_| CompileFailure::Disconnected)?;

        let (packages_tx, packages_rx) = oneshot::channel();
        self.packages
            .send(PackageMsg::Snapshot(packages_tx))
            .await
            .map_err(|_| CompileFailure::Disconnected)?;
        let packages = packages_rx.await.map_err(|_| CompileFailure::Disconnected)?;

        Ok(Snapshot { files, packages })
    }

    /// Broadcast shutdown, release this handle and wait for both loops to exit.
    pub async fn close(mut self) {
        self.shutdown();
        let loops = std::mem::take(&mut self.loops);
        drop(self);
        for handle in loops {
            if let Err(err) = handle.await {
                tracing::error!(%err, "compiler loop failed");
            }
        }
    }
}

impl Drop for Compiler {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("config", &self.config)
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}
