//! Language vocabulary registries: reserved words, operators and punctuation.
//!
//! The lexer resolves spellings through these tables so the parser can match on stable ids instead
//! of strings.
//!
//! ## Examples
//! ```rust
//! use golite_syntax::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("func"), Some(KeywordId::Func));
//! assert_eq!(keywords::as_str(KeywordId::Func), "func");
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
