//! Abstract Syntax Tree definitions for golite
//!
//! The tree is declaration-level: a source file is its package clause, its imports and the names it
//! declares at the top level. Function bodies and type expressions are validated for balanced
//! delimiters by the parser but are not modelled as nodes.

use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Identifier
pub type Ident = String;

/// A 1-based line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offsets of every line start, used to turn spans into [`Position`]s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Map a byte offset to a 1-based line/column. Offsets past the end clamp to the end.
    ///
    /// Columns count bytes, matching the lexer's ASCII-only identifiers.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        Position::new(line + 1, offset - self.line_starts[line] + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Spanned<Ident>,
    pub imports: Vec<Spanned<ImportDecl>>,
    pub decls: Vec<Spanned<Decl>>,
    pub lines: LineIndex,
}

impl SourceFile {
    /// Position of the start of `span`.
    pub fn position(&self, span: Span) -> Position {
        self.lines.position(span.start)
    }

    /// Imported package paths in declaration order.
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|i| i.node.path.as_str())
    }
}

// ============================================================================
// Imports
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// Quoted package path, e.g. `"net/http"`, without quotes
    pub path: String,
    pub binding: ImportBinding,
}

impl ImportDecl {
    /// The name this import introduces into file scope, if any.
    ///
    /// The default binding is the last path segment (`"net/http"` binds `http`).
    pub fn local_name(&self) -> Option<&str> {
        match &self.binding {
            ImportBinding::Default => self.path.rsplit('/').next().filter(|s| !s.is_empty()),
            ImportBinding::Named(name) => Some(name.as_str()),
            ImportBinding::Dot | ImportBinding::Blank => None,
        }
    }
}

/// How an import spec binds its package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinding {
    /// `import "fmt"`
    Default,
    /// `import f "fmt"`
    Named(Ident),
    /// `import . "fmt"`
    Dot,
    /// `import _ "fmt"`
    Blank,
}

// ============================================================================
// Declarations
// ============================================================================

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Var(Vec<Spanned<Ident>>),
    Const(Vec<Spanned<Ident>>),
    Type(Vec<Spanned<Ident>>),
}

impl Decl {
    pub fn kind(&self) -> DeclKind {
        match self {
            Decl::Func(f) if f.receiver.is_some() => DeclKind::Method,
            Decl::Func(_) => DeclKind::Func,
            Decl::Var(_) => DeclKind::Var,
            Decl::Const(_) => DeclKind::Const,
            Decl::Type(_) => DeclKind::Type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: Spanned<Ident>,
    /// Base type name of the receiver for methods (`func (p *Point) Len()` → `Point`)
    pub receiver: Option<Ident>,
    /// `false` for forward declarations without a body
    pub has_body: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Func,
    Method,
    Var,
    Const,
    Type,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Func => write!(f, "func"),
            DeclKind::Method => write!(f, "method"),
            DeclKind::Var => write!(f, "var"),
            DeclKind::Const => write!(f, "const"),
            DeclKind::Type => write!(f, "type"),
        }
    }
}
