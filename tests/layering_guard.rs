//! Layering guardrails
//!
//! - The orchestrator's unit tables are owned by single loops, so no lock type may appear in it.
//! - The syntax crate stays synchronous and free of I/O: tokio must not appear in its
//!   `[dependencies]`.

const ORCHESTRATOR_SOURCES: &[(&str, &str)] = &[
    ("mod.rs", include_str!("../src/orchestrator/mod.rs")),
    ("file_loop.rs", include_str!("../src/orchestrator/file_loop.rs")),
    ("file_task.rs", include_str!("../src/orchestrator/file_task.rs")),
    ("file_unit.rs", include_str!("../src/orchestrator/file_unit.rs")),
    ("graph.rs", include_str!("../src/orchestrator/graph.rs")),
    ("import_loop.rs", include_str!("../src/orchestrator/import_loop.rs")),
    ("mailbox.rs", include_str!("../src/orchestrator/mailbox.rs")),
    ("messages.rs", include_str!("../src/orchestrator/messages.rs")),
    ("package_unit.rs", include_str!("../src/orchestrator/package_unit.rs")),
    ("shutdown.rs", include_str!("../src/orchestrator/shutdown.rs")),
    ("snapshot.rs", include_str!("../src/orchestrator/snapshot.rs")),
    ("status.rs", include_str!("../src/orchestrator/status.rs")),
];

#[test]
fn orchestrator_uses_no_locks() {
    for (name, source) in ORCHESTRATOR_SOURCES {
        for lock in ["Mutex", "RwLock"] {
            assert!(
                !source.contains(lock),
                "`{lock}` found in src/orchestrator/{name}; unit tables must stay loop-owned"
            );
        }
    }
}

#[test]
fn syntax_crate_does_not_depend_on_tokio() {
    let manifest = include_str!("../crates/golite_syntax/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if line_no_comment.starts_with("tokio") {
            panic!("`tokio` must not appear in golite_syntax [dependencies]");
        }
    }
}
