//! Orchestrator tests with in-memory collaborators
//!
//! Every scenario runs on the multi-threaded runtime so file subtasks really overlap.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use golite::errors::{CompileFailure, LocateError};
use golite::frontend::{
    DeclSymbols, Frontend, MemoryParser, PackageLocator, ParsedFile, SourceParser, StaticLocator,
};
use golite::orchestrator::{Compiler, UnitStatus};
use golite::CompilerConfig;

// =============================================================================
// Harness
// =============================================================================

/// Per-key call counter shared between a collaborator and the test.
#[derive(Debug, Clone, Default)]
struct Counts(Arc<Mutex<HashMap<String, usize>>>);

impl Counts {
    fn bump(&self, key: &str) {
        *self.0.lock().unwrap().entry(key.to_string()).or_default() += 1;
    }

    fn get(&self, key: &str) -> usize {
        self.0.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn total(&self) -> usize {
        self.0.lock().unwrap().values().sum()
    }
}

struct Counting<T> {
    inner: T,
    counts: Counts,
}

impl<T: SourceParser> SourceParser for Counting<T> {
    fn parse(&self, file_name: &str) -> Result<ParsedFile, CompileFailure> {
        self.counts.bump(file_name);
        self.inner.parse(file_name)
    }
}

impl<T: PackageLocator> PackageLocator for Counting<T> {
    fn locate(&self, package: &str) -> Result<Vec<String>, LocateError> {
        self.counts.bump(package);
        self.inner.locate(package)
    }
}

/// Sleeps on the blocking pool before parsing selected files or locating selected packages.
struct Slow<T> {
    inner: T,
    delays: HashMap<String, Duration>,
}

impl<T: SourceParser> SourceParser for Slow<T> {
    fn parse(&self, file_name: &str) -> Result<ParsedFile, CompileFailure> {
        if let Some(delay) = self.delays.get(file_name) {
            std::thread::sleep(*delay);
        }
        self.inner.parse(file_name)
    }
}

impl<T: PackageLocator> PackageLocator for Slow<T> {
    fn locate(&self, package: &str) -> Result<Vec<String>, LocateError> {
        if let Some(delay) = self.delays.get(package) {
            std::thread::sleep(*delay);
        }
        self.inner.locate(package)
    }
}

struct Panicking;

impl SourceParser for Panicking {
    fn parse(&self, file_name: &str) -> Result<ParsedFile, CompileFailure> {
        panic!("parser exploded on {file_name}");
    }
}

struct Harness {
    parses: Counts,
    locates: Counts,
    parser: MemoryParser,
    locator: StaticLocator,
}

impl Harness {
    fn new(files: &[(&str, &str)], packages: &[(&str, &[&str])]) -> Self {
        let mut parser = MemoryParser::new();
        for (name, source) in files {
            parser.insert(*name, *source);
        }
        let locator = packages
            .iter()
            .fold(StaticLocator::new(), |loc, (name, members)| loc.with_package(*name, members.iter().copied()));
        Self {
            parses: Counts::default(),
            locates: Counts::default(),
            parser,
            locator,
        }
    }

    fn frontend(&self) -> Frontend {
        Frontend::new(
            Counting {
                inner: self.parser.clone(),
                counts: self.parses.clone(),
            },
            Counting {
                inner: self.locator.clone(),
                counts: self.locates.clone(),
            },
            DeclSymbols,
        )
    }

    fn compiler(&self) -> Compiler {
        Compiler::new(self.frontend())
    }

    fn compiler_with(&self, config: CompilerConfig) -> Compiler {
        Compiler::with_config(self.frontend(), config)
    }
}

async fn within<F: std::future::Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(10), fut)
        .await
        .expect("compilation did not finish in time")
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_import_of_empty_package_succeeds() {
    let h = Harness::new(
        &[("a.go", "package main\n\nimport \"fmt\"\n\nfunc main() {}\n")],
        &[("fmt", &[])],
    );
    let compiler = h.compiler();

    within(compiler.compile(["a.go"])).await.unwrap();
    assert_eq!(h.locates.get("fmt"), 1);

    let snapshot = compiler.snapshot().await.unwrap();
    assert_eq!(snapshot.package("fmt").unwrap().status, UnitStatus::Complete);
    let file = snapshot.file("a.go").unwrap();
    assert_eq!(file.package.as_deref(), Some("main"));
    assert_eq!(file.declarations, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shared_package_parse_error_is_reported_once() {
    let h = Harness::new(
        &[
            ("a.go", "package a\n\nimport \"shared\"\n"),
            ("b.go", "package b\n\nimport \"shared\"\n"),
            ("shared/s.go", "package shared\n\nfunc Broken( {\n"),
        ],
        &[("shared", &["shared/s.go"])],
    );
    let compiler = h.compiler();

    let err = within(compiler.compile(["a.go", "b.go"])).await.unwrap_err();
    assert!(
        matches!(err, CompileFailure::Syntax { ref file, line: 3, .. } if file == "shared/s.go"),
        "{err}"
    );
    assert_eq!(h.parses.get("shared/s.go"), 1);
    assert_eq!(h.locates.get("shared"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreadable_file_names_the_file() {
    let h = Harness::new(&[], &[]);
    let compiler = h.compiler();

    let err = within(compiler.compile(["x.go"])).await.unwrap_err();
    assert!(matches!(err, CompileFailure::Io { ref file, .. } if file == "x.go"));
    assert!(err.to_string().contains("x.go"));

    let snapshot = compiler.snapshot().await.unwrap();
    let unit = snapshot.file("x.go").unwrap();
    assert_eq!(unit.status, UnitStatus::Complete);
    assert!(unit.package.is_none());
    assert_eq!(unit.declarations, 0);
}

// =============================================================================
// Dedup and caching
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_many_importers_share_one_package_result() {
    let mut files: Vec<(String, String)> = (0..8)
        .map(|i| (format!("f{i}.go"), "package main\n\nimport \"shared\"\n".to_string()))
        .collect();
    files.push(("shared/s.go".to_string(), "package shared\n\nfunc S() {}\n".to_string()));
    let refs: Vec<(&str, &str)> = files.iter().map(|(n, s)| (n.as_str(), s.as_str())).collect();
    let h = Harness::new(&refs, &[("shared", &["shared/s.go"])]);
    let compiler = h.compiler();

    let names: Vec<String> = (0..8).map(|i| format!("f{i}.go")).collect();
    within(compiler.compile(names)).await.unwrap();

    assert_eq!(h.parses.get("shared/s.go"), 1);
    assert_eq!(h.locates.get("shared"), 1);
    assert_eq!(h.parses.total(), 9);

    let snapshot = compiler.snapshot().await.unwrap();
    let shared = snapshot.package("shared").unwrap();
    assert_eq!(shared.members, vec!["shared/s.go"]);
    assert_eq!(shared.subscribers, 0);
    assert!(shared.outstanding.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_importers_receive_the_same_failure() {
    let h = Harness::new(
        &[
            ("a.go", "package a\n\nimport \"shared\"\n"),
            ("b.go", "package b\n\nimport \"shared\"\n"),
            ("shared/s.go", "package shared\n\nvar x, x int\n"),
        ],
        &[("shared", &["shared/s.go"])],
    );
    let compiler = h.compiler_with(CompilerConfig::new().with_keep_going(true));

    let err = within(compiler.compile(["a.go", "b.go"])).await.unwrap_err();
    assert!(matches!(err, CompileFailure::Symbol { .. }), "{err}");

    let snapshot = compiler.snapshot().await.unwrap();
    let outcome = |name: &str| snapshot.file(name).unwrap().outcome.clone().unwrap().unwrap_err();
    assert!(Arc::ptr_eq(&outcome("a.go"), &outcome("b.go")));
    assert!(Arc::ptr_eq(&outcome("a.go"), &outcome("shared/s.go")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duplicate_names_in_one_call_are_folded() {
    let h = Harness::new(&[("a.go", "package a\n")], &[]);
    let compiler = h.compiler();

    within(compiler.compile(["a.go", "a.go", "a.go"])).await.unwrap();
    assert_eq!(h.parses.get("a.go"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_file_spellings_share_one_unit() {
    let h = Harness::new(
        &[
            ("main.go", "package main\n\nimport \"a\"\n"),
            ("a/a.go", "package a\n\nfunc A() {}\n"),
        ],
        &[("a", &["./a/a.go"])],
    );
    let compiler = h.compiler();

    within(compiler.compile(["a/a.go", "./main.go"])).await.unwrap();
    assert_eq!(h.parses.get("a/a.go"), 1);
    assert_eq!(h.parses.total(), 2);

    let snapshot = compiler.snapshot().await.unwrap();
    let files: Vec<_> = snapshot.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(files, vec!["a/a.go", "main.go"]);
    assert_eq!(snapshot.package("a").unwrap().members, vec!["a/a.go"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_compile_is_idempotent() {
    let h = Harness::new(
        &[
            ("ok.go", "package main\n\nimport \"util\"\n"),
            ("util/u.go", "package util\n\nfunc U() {}\n"),
            ("bad.go", "package main\n\nfunc (\n"),
        ],
        &[("util", &["util/u.go"])],
    );
    let compiler = h.compiler();

    within(compiler.compile(["ok.go"])).await.unwrap();
    within(compiler.compile(["ok.go"])).await.unwrap();
    assert_eq!(h.parses.total(), 2);
    assert_eq!(h.locates.total(), 1);

    let first = within(compiler.compile(["bad.go"])).await.unwrap_err();
    let second = within(compiler.compile(["bad.go"])).await.unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(h.parses.get("bad.go"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_request_returns_at_once() {
    let h = Harness::new(&[], &[]);
    let compiler = h.compiler();
    within(compiler.compile(Vec::<String>::new())).await.unwrap();
    assert_eq!(h.parses.total(), 0);
}

// =============================================================================
// Error locality and independence
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_error_names_file_line_and_column() {
    let h = Harness::new(&[("x.go", "package main\n\nvar = 1\n")], &[]);
    let compiler = h.compiler();

    let err = within(compiler.compile(["x.go"])).await.unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"x.go:3:5: expected identifier, found '='");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_package_depending_on_broken_file_never_succeeds() {
    let h = Harness::new(
        &[
            ("main.go", "package main\n\nimport \"p\"\n"),
            ("p/good.go", "package p\n\nfunc Good() {}\n"),
            ("p/bad.go", "package p\n\nfunc Bad( {\n"),
        ],
        &[("p", &["p/good.go", "p/bad.go"])],
    );
    let compiler = h.compiler_with(CompilerConfig::new().with_keep_going(true));

    let err = within(compiler.compile(["main.go"])).await.unwrap_err();
    assert_eq!(err.file(), Some("p/bad.go"));

    let snapshot = compiler.snapshot().await.unwrap();
    assert!(matches!(snapshot.package("p").unwrap().outcome, Some(Err(_))));
    assert!(matches!(snapshot.file("p/good.go").unwrap().outcome, Some(Ok(()))));
    assert!(matches!(snapshot.file("main.go").unwrap().outcome, Some(Err(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_file_without_imports_does_not_wait_for_others() {
    let h = Harness::new(
        &[("slow.go", "package slow\n"), ("fast.go", "package fast\n")],
        &[],
    );
    let parser = Slow {
        inner: h.parser.clone(),
        delays: HashMap::from([("slow.go".to_string(), Duration::from_millis(600))]),
    };
    let compiler = Arc::new(Compiler::new(Frontend::new(parser, StaticLocator::new(), DeclSymbols)));

    let background = Arc::clone(&compiler);
    let slow = tokio::spawn(async move { background.compile(["slow.go"]).await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    tokio::time::timeout(Duration::from_millis(300), compiler.compile(["fast.go"]))
        .await
        .expect("fast.go should not wait for slow.go")
        .unwrap();
    within(slow).await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_package_lookup_does_not_stall_other_imports() {
    let h = Harness::new(
        &[
            ("s.go", "package main\n\nimport \"slow\"\n"),
            ("f.go", "package main\n\nimport \"fast\"\n"),
        ],
        &[("slow", &[]), ("fast", &[])],
    );
    let locator = Slow {
        inner: h.locator.clone(),
        delays: HashMap::from([("slow".to_string(), Duration::from_millis(800))]),
    };
    let compiler = Arc::new(Compiler::new(Frontend::new(h.parser.clone(), locator, DeclSymbols)));

    let background = Arc::clone(&compiler);
    let slow = tokio::spawn(async move { background.compile(["s.go"]).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    tokio::time::timeout(Duration::from_millis(300), compiler.compile(["f.go"]))
        .await
        .expect("importing fast should not wait for the lookup of slow")
        .unwrap();
    within(slow).await.unwrap().unwrap();

    let snapshot = compiler.snapshot().await.unwrap();
    assert_eq!(snapshot.package("slow").unwrap().status, UnitStatus::Complete);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_package_reports_import_site() {
    let h = Harness::new(&[("main.go", "package main\n\nimport (\n\t\"fmt\"\n\t\"nowhere\"\n)\n")], &[("fmt", &[])]);
    let compiler = h.compiler();

    let err = within(compiler.compile(["main.go"])).await.unwrap_err();
    match err {
        CompileFailure::PackageResolution {
            package,
            file,
            line,
            column,
            source: LocateError::NotFound { .. },
        } => {
            assert_eq!(package, "nowhere");
            assert_eq!(file, "main.go");
            assert_eq!((line, column), (5, 2));
        }
        other => panic!("expected a resolution failure, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_panicking_parser_becomes_internal_failure() {
    let compiler = Compiler::new(Frontend::new(Panicking, StaticLocator::new(), DeclSymbols));
    let err = within(compiler.compile(["boom.go"])).await.unwrap_err();
    match err {
        CompileFailure::Internal { unit, message } => {
            assert_eq!(unit, "file boom.go");
            assert!(message.contains("parser exploded on boom.go"), "{message}");
        }
        other => panic!("expected an internal failure, got {other:?}"),
    }
}

// =============================================================================
// Import cycles
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_two_package_cycle_is_rejected() {
    let h = Harness::new(
        &[
            ("main.go", "package main\n\nimport \"a\"\n"),
            ("a/a.go", "package a\nimport \"b\"\n"),
            ("b/b.go", "package b\nimport \"a\"\n"),
        ],
        &[("a", &["a/a.go"]), ("b", &["b/b.go"])],
    );
    let compiler = h.compiler();

    let err = within(compiler.compile(["main.go"])).await.unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"b/b.go:2:8: import cycle not allowed: b -> a -> b");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cycle_through_a_requested_file_is_rejected() {
    let h = Harness::new(
        &[
            ("a/a.go", "package a\nimport \"b\"\n"),
            ("b/b.go", "package b\nimport \"a\"\n"),
        ],
        &[("a", &["a/a.go"]), ("b", &["b/b.go"])],
    );
    let compiler = h.compiler();

    let err = within(compiler.compile(["a/a.go"])).await.unwrap_err();
    match err {
        CompileFailure::CyclicImport { file, cycle, .. } => {
            assert_eq!(file, "b/b.go");
            assert_eq!(cycle, vec!["a", "b", "a"]);
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_self_import_is_a_cycle() {
    let h = Harness::new(
        &[
            ("main.go", "package main\n\nimport \"loop\"\n"),
            ("loop/l.go", "package loop\nimport \"loop\"\n"),
        ],
        &[("loop", &["loop/l.go"])],
    );
    let compiler = h.compiler();

    let err = within(compiler.compile(["main.go"])).await.unwrap_err();
    assert!(matches!(err, CompileFailure::CyclicImport { ref cycle, .. } if cycle == &["loop", "loop"]), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_diamond_is_not_a_cycle() {
    let h = Harness::new(
        &[
            ("main.go", "package main\n\nimport (\n\t\"left\"\n\t\"right\"\n)\n"),
            ("left/l.go", "package left\nimport \"base\"\n"),
            ("right/r.go", "package right\nimport \"base\"\n"),
            ("base/b.go", "package base\n"),
        ],
        &[
            ("left", &["left/l.go"]),
            ("right", &["right/r.go"]),
            ("base", &["base/b.go"]),
        ],
    );
    let compiler = h.compiler();

    within(compiler.compile(["main.go"])).await.unwrap();
    assert_eq!(h.parses.get("base/b.go"), 1);
}

// =============================================================================
// Shutdown, concurrency and lifecycle
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_new_files_are_cancelled_after_shutdown() {
    let h = Harness::new(&[("old.go", "package old\n"), ("new.go", "package new\n")], &[]);
    let compiler = h.compiler();
    within(compiler.compile(["old.go"])).await.unwrap();

    compiler.shutdown();
    compiler.shutdown();
    assert!(compiler.is_shut_down());

    within(compiler.compile(["old.go"])).await.unwrap();
    let err = within(compiler.compile(["new.go"])).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "file new.go: compilation cancelled");
    assert_eq!(h.parses.get("new.go"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_first_error_broadcasts_shutdown_unless_keep_going() {
    let files = [("bad.go", "package main\n\nfunc (\n"), ("good.go", "package good\n")];

    let h = Harness::new(&files, &[]);
    let compiler = h.compiler();
    within(compiler.compile(["bad.go"])).await.unwrap_err();
    assert!(compiler.is_shut_down());

    let h = Harness::new(&files, &[]);
    let compiler = h.compiler_with(CompilerConfig::new().with_keep_going(true));
    let err = within(compiler.compile(["bad.go", "good.go"])).await.unwrap_err();
    assert_eq!(err.file(), Some("bad.go"));
    assert!(!compiler.is_shut_down());
    let snapshot = compiler.snapshot().await.unwrap();
    assert!(matches!(snapshot.file("good.go").unwrap().outcome, Some(Ok(()))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_calls_share_units() {
    let h = Harness::new(
        &[
            ("a.go", "package a\n\nimport \"shared\"\n"),
            ("b.go", "package b\n\nimport \"shared\"\n"),
            ("shared/s.go", "package shared\n"),
        ],
        &[("shared", &["shared/s.go"])],
    );
    let compiler = h.compiler();

    let (a, b) = within(async { tokio::join!(compiler.compile(["a.go"]), compiler.compile(["b.go"])) }).await;
    a.unwrap();
    b.unwrap();
    assert_eq!(h.parses.get("shared/s.go"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_slot_mailboxes_do_not_deadlock() {
    let mut files: Vec<(String, String)> = (0..40)
        .map(|i| (format!("f{i}.go"), "package main\n\nimport (\n\t\"x\"\n\t\"y\"\n)\n".to_string()))
        .collect();
    files.push(("x/x.go".to_string(), "package x\nimport \"y\"\n".to_string()));
    files.push(("y/y1.go".to_string(), "package y\n".to_string()));
    files.push(("y/y2.go".to_string(), "package y\n".to_string()));
    let refs: Vec<(&str, &str)> = files.iter().map(|(n, s)| (n.as_str(), s.as_str())).collect();
    let h = Harness::new(&refs, &[("x", &["x/x.go"]), ("y", &["y/y1.go", "y/y2.go"])]);
    let compiler = h.compiler_with(CompilerConfig::new().with_mailbox_depth(1));

    let names: Vec<String> = (0..40).map(|i| format!("f{i}.go")).collect();
    within(compiler.compile(names)).await.unwrap();
    assert_eq!(h.parses.total(), 43);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_snapshot_is_sorted() {
    let h = Harness::new(
        &[
            ("c.go", "package main\n\nimport \"z\"\n"),
            ("a.go", "package main\n\nimport \"y\"\n"),
            ("b.go", "package main\n"),
        ],
        &[("z", &[]), ("y", &[])],
    );
    let compiler = h.compiler();
    within(compiler.compile(["c.go", "a.go", "b.go"])).await.unwrap();

    let snapshot = compiler.snapshot().await.unwrap();
    let files: Vec<_> = snapshot.files.iter().map(|f| f.name.as_str()).collect();
    let packages: Vec<_> = snapshot.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(files, vec!["a.go", "b.go", "c.go"]);
    assert_eq!(packages, vec!["y", "z"]);
    assert!(snapshot.files.iter().all(|f| f.status == UnitStatus::Complete));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_waits_for_loops() {
    let h = Harness::new(&[("a.go", "package a\n\nimport \"p\"\n"), ("p/p.go", "package p\n")], &[("p", &["p/p.go"])]);
    let compiler = h.compiler();
    within(compiler.compile(["a.go"])).await.unwrap();
    within(compiler.close()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_with_work_in_flight() {
    let h = Harness::new(&[("slow.go", "package slow\n\nimport \"p\"\n"), ("p/p.go", "package p\n")], &[("p", &["p/p.go"])]);
    let parser = Slow {
        inner: h.parser.clone(),
        delays: HashMap::from([("p/p.go".to_string(), Duration::from_millis(200))]),
    };
    let compiler = Arc::new(Compiler::new(Frontend::new(parser, h.locator.clone(), DeclSymbols)));

    let background = Arc::clone(&compiler);
    let pending = tokio::spawn(async move { background.compile(["slow.go"]).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    compiler.shutdown();

    // The in-flight call still drains to a terminal answer.
    match within(pending).await.unwrap() {
        Ok(()) => {}
        Err(err) => assert!(err.is_cancelled(), "{err}"),
    }
    let compiler = Arc::into_inner(compiler).expect("last handle");
    within(compiler.close()).await;
}
