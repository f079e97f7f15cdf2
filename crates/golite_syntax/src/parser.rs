//! Parser for the golite language
//!
//! Converts a token stream into a declaration-level [`SourceFile`]: the package clause, the import
//! declarations and the names declared at the top level. Function bodies, signatures and the tails
//! of `var`/`const`/`type` specs are skipped by balanced-delimiter matching.
//!
//! ## Examples
//!
//! ```rust
//! use golite_syntax::parser;
//!
//! let source = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(1)\n}\n";
//! let file = parser::parse_source(source).unwrap();
//! assert_eq!(file.package.node, "main");
//! assert_eq!(file.import_paths().collect::<Vec<_>>(), vec!["fmt"]);
//! assert_eq!(file.decls.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::{CompileError, errors};
use crate::lang::keywords::KeywordId;
use crate::lang::punctuation::{self, PunctuationId};
use crate::lexer::{Token, TokenKind};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
