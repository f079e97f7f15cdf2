//! Syntax frontend for golite: vocabulary, lexer, parser, AST, diagnostics.
//!
//! This crate is dependency-light and has no I/O or async: it turns source text into a
//! declaration-level [`ast::SourceFile`] or a list of [`diagnostics::CompileError`]s.
//!
//! ## Notes
//! - This crate is “syntax-only”: it does not do name resolution or type checking.
//! - Vocabulary identity (keywords/operators/punctuation) comes from the [`lang`] registries.
//!
//! ## Examples
//! ```rust
//! use golite_syntax::{lexer, parser};
//!
//! let source = "package util\n\nfunc Max(a, b int) int { if a > b { return a }; return b }\n";
//! let tokens = lexer::lex(source).unwrap();
//! let file = parser::parse(&tokens, source).unwrap();
//! assert_eq!(file.decls.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lang;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
