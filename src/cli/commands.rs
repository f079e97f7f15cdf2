//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;

use miette::{NamedSource, Report};

use crate::config::CompilerConfig;
use crate::errors::CompileFailure;
use crate::frontend::ast::{Decl, ImportBinding, SourceFile};
use crate::frontend::diagnostics::CompileError;
use crate::frontend::{Frontend, lexer, parser};
use crate::orchestrator::Compiler;

use super::{BuildArgs, CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during the debug dumps.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Render syntax diagnostics against their source with miette.
fn render_errors(file_path: &str, source: &str, errs: Vec<CompileError>) -> CliError {
    let mut msg = String::new();
    for err in errs {
        let report = Report::new(err).with_source_code(NamedSource::new(file_path, source.to_string()));
        let _ = writeln!(msg, "{:?}", report);
    }
    CliError::failure(msg.trim_end())
}

fn render_failure(failure: CompileFailure) -> CliError {
    CliError::failure(format!("{:?}", Report::new(failure)).trim_end())
}

/// Lex and display tokens.
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|errs| render_errors(file_path, &source, errs))?;

    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display the file's package, imports and declarations.
pub fn parse_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let ast = parser::parse_source(&source).map_err(|errs| render_errors(file_path, &source, errs))?;
    print!("{}", describe_file(&ast));
    Ok(ExitCode::SUCCESS)
}

/// One line per package clause, import and declared name.
pub fn describe_file(ast: &SourceFile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "package {} ({})", ast.package.node, ast.position(ast.package.span));

    for import in &ast.imports {
        let binding = match &import.node.binding {
            ImportBinding::Default => String::new(),
            ImportBinding::Named(name) => format!("{name} "),
            ImportBinding::Dot => ". ".to_string(),
            ImportBinding::Blank => "_ ".to_string(),
        };
        let _ = writeln!(
            out,
            "import {binding}\"{}\" ({})",
            import.node.path,
            ast.position(import.span)
        );
    }

    for decl in &ast.decls {
        let kind = decl.node.kind();
        match &decl.node {
            Decl::Func(func) => {
                let name = match &func.receiver {
                    Some(recv) => format!("{recv}.{}", func.name.node),
                    None => func.name.node.clone(),
                };
                let _ = writeln!(out, "{kind} {name} ({})", ast.position(func.name.span));
            }
            Decl::Var(names) | Decl::Const(names) | Decl::Type(names) => {
                for name in names {
                    let _ = writeln!(out, "{kind} {} ({})", name.node, ast.position(name.span));
                }
            }
        }
    }
    out
}

/// Compile files and every package they import.
pub fn build_files(args: &BuildArgs) -> CliResult<ExitCode> {
    let config = args.apply(CompilerConfig::from_env());
    let files: Vec<String> = args.files.iter().map(|f| f.to_string_lossy().into_owned()).collect();
    let count = files.len();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Cannot start the async runtime: {}", e)))?;

    let result = runtime.block_on(async move {
        let compiler = Compiler::with_config(Frontend::from_config(&config), config);
        let result = compiler.compile(files).await;
        compiler.close().await;
        result
    });

    match result {
        Ok(()) => {
            println!("✓ Compiled {count} file(s)");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => Err(render_failure(failure)),
    }
}
