//! Token types for the golite lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for delimiters and separators
//!
//! ## Notes
//! - Semicolons inserted at line ends are ordinary `Punctuation(Semicolon)` tokens with an empty
//!   span at the newline; [`Token::implicit`] tells them apart from written ones.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use crate::lang::keywords::{self, KeywordId};
use crate::lang::operators::OperatorId;
use crate::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(u64),
    Float(f64),
    /// Imaginary literal such as `2i`; the value is the imaginary part
    Imaginary(f64),
    Rune(char),
    /// Interpreted or raw string, with escapes resolved
    String(String),

    // ========== Special ==========
    Eof, // end of file
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// `true` for a semicolon inserted by the lexer rather than written in the source.
    pub fn implicit(&self) -> bool {
        self.kind == TokenKind::Punctuation(PunctuationId::Semicolon) && self.span.start == self.span.end
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
