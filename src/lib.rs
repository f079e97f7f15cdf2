#![forbid(unsafe_code)]
//! golite: a concurrent compiler frontend for a Go-like language
//!
//! A [`Compiler`] parses every requested file, resolves each imported package to its member
//! files and compiles those too, parsing every file and locating every package at most once.
//! The work is split between two single-owner loops (`orchestrator`) that drive pluggable
//! collaborators (`frontend`): a source parser, a package locator and a symbol builder.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Collaborators**: a panic inside a parser or symbol builder is caught at the task boundary
//!   and reported as an internal failure for that file.

pub mod cli;
pub mod config;
pub mod errors;
pub mod frontend;
pub mod orchestrator;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::symbols;

pub use config::CompilerConfig;
pub use errors::{CompileFailure, LocateError};
pub use frontend::{DirLocator, Frontend, FsParser};
pub use orchestrator::{Compiler, Snapshot};
