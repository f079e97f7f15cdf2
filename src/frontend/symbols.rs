//! Symbol table for golite files
//!
//! Tracks the package-level names a file declares and the names its imports bind. Go scoping is
//! flat at this level: one package block holding funcs, vars, consts and types, and one file
//! block holding import names, which may not collide with the package block.

use std::collections::HashMap;

use super::ast::{Decl, DeclKind, Position, SourceFile, Span};
use super::diagnostics::errors;
use super::services::SymbolBuilder;
use crate::errors::CompileFailure;

/// Unique identifier for symbols
pub type SymbolId = usize;

/// Symbol table managing a file's top-level names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    package_scope: HashMap<String, SymbolId>,
    file_scope: HashMap<String, SymbolId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub span: Span,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Decl(DeclKind),
    /// Name bound by an import; holds the import path
    Import(String),
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a package-level symbol, returning the existing one if the name is taken.
    pub fn define(&mut self, symbol: Symbol) -> Result<SymbolId, &Symbol> {
        let scope = match symbol.kind {
            SymbolKind::Import(_) => &mut self.file_scope,
            SymbolKind::Decl(_) => &mut self.package_scope,
        };
        if let Some(&existing) = scope.get(&symbol.name) {
            return Err(&self.symbols[existing]);
        }
        let id = self.symbols.len();
        scope.insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        Ok(id)
    }

    /// Look up a name, file block first
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.file_scope
            .get(name)
            .or_else(|| self.package_scope.get(name))
            .map(|&id| &self.symbols[id])
    }

    /// Get a symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// Builds a [`SymbolTable`] from a file's top-level declarations.
///
/// `_` is never declared, `init` may be declared any number of times, methods are keyed
/// `Recv.Name`, and an import name that collides with a top-level name is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclSymbols;

impl SymbolBuilder for DeclSymbols {
    fn create_symbols(&self, file_name: &str, ast: &SourceFile) -> Result<SymbolTable, CompileFailure> {
        let mut table = SymbolTable::new();
        let fail = |err| CompileFailure::from_diagnostic(file_name, &ast.lines, &err);

        for decl in &ast.decls {
            let kind = decl.node.kind();
            let names = match &decl.node {
                Decl::Func(f) => {
                    let key = match &f.receiver {
                        Some(recv) => format!("{recv}.{}", f.name.node),
                        None => f.name.node.clone(),
                    };
                    vec![(key, f.name.span)]
                }
                Decl::Var(ns) | Decl::Const(ns) | Decl::Type(ns) => {
                    ns.iter().map(|n| (n.node.clone(), n.span)).collect()
                }
            };

            for (name, span) in names {
                if name == "_" || (kind == DeclKind::Func && name == "init") {
                    continue;
                }
                let symbol = Symbol {
                    position: ast.position(span),
                    name,
                    kind: SymbolKind::Decl(kind),
                    span,
                };
                if let Err(first) = table.define(symbol.clone()) {
                    return Err(fail(errors::redeclared(&symbol.name, span, first.position)));
                }
            }
        }

        for import in &ast.imports {
            let Some(local) = import.node.local_name() else {
                continue;
            };
            let position = ast.position(import.span);
            if let Some(existing) = table.lookup(local) {
                let err = errors::redeclared(local, import.span, existing.position)
                    .with_hint(format!("import \"{}\" under a different name", import.node.path));
                return Err(fail(err));
            }
            let _ = table.define(Symbol {
                name: local.to_string(),
                kind: SymbolKind::Import(import.node.path.clone()),
                span: import.span,
                position,
            });
        }

        tracing::trace!(file = file_name, symbols = table.len(), "symbols created");
        Ok(table)
    }
}
