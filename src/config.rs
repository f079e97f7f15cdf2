//! Compiler configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable holding the package search path (platform path-list syntax).
pub const PATH_ENV: &str = "GOLITE_PATH";
/// Environment variable overriding [`CompilerConfig::mailbox_depth`].
pub const MAILBOX_DEPTH_ENV: &str = "GOLITE_MAILBOX_DEPTH";

/// Slot count of reply mailboxes and loop inboxes when nothing else is configured.
pub const DEFAULT_MAILBOX_DEPTH: usize = 4;

/// Settings for a [`Compiler`](crate::orchestrator::Compiler) and its default collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Slot count of every reply mailbox and loop inbox (at least 1)
    pub mailbox_depth: usize,
    /// Keep compiling after the first error instead of broadcasting shutdown
    pub keep_going: bool,
    /// Roots searched, in order, for `<root>/<package>` directories
    pub search_paths: Vec<PathBuf>,
    /// Extension of source files inside a package directory
    pub source_extension: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            mailbox_depth: DEFAULT_MAILBOX_DEPTH,
            keep_going: false,
            search_paths: vec![PathBuf::from(".")],
            source_extension: "go".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `GOLITE_PATH` and `GOLITE_MAILBOX_DEPTH`.
    ///
    /// Unusable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_vars(env::var_os(PATH_ENV), env::var(MAILBOX_DEPTH_ENV).ok())
    }

    fn from_vars(path: Option<std::ffi::OsString>, depth: Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = path {
            let roots: Vec<PathBuf> = env::split_paths(&path).filter(|p| !p.as_os_str().is_empty()).collect();
            if roots.is_empty() {
                tracing::warn!(var = PATH_ENV, "ignoring empty package search path");
            } else {
                config.search_paths = roots;
            }
        }

        if let Some(raw) = depth {
            match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => config.mailbox_depth = n,
                _ => tracing::warn!(
                    var = MAILBOX_DEPTH_ENV,
                    value = %raw,
                    default = DEFAULT_MAILBOX_DEPTH,
                    "ignoring invalid mailbox depth"
                ),
            }
        }

        config
    }

    /// Set the mailbox depth. Values below 1 are raised to 1.
    pub fn with_mailbox_depth(mut self, depth: usize) -> Self {
        self.mailbox_depth = depth.max(1);
        self
    }

    /// Set whether compilation continues past the first error
    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Replace the package search roots
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Put `path` in front of the existing search roots
    pub fn with_search_path_first(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.insert(0, path.into());
        self
    }

    /// Set the source file extension (without the dot)
    pub fn with_source_extension(mut self, ext: impl Into<String>) -> Self {
        self.source_extension = ext.into().trim_start_matches('.').to_string();
        self
    }
}
