//! Lexer for the golite language
//!
//! Handles tokenization including:
//! - The 25 reserved keywords and ASCII identifiers
//! - Integer, float, imaginary, rune and string literals (interpreted and raw)
//! - Operators and punctuation
//! - Automatic semicolon insertion at line ends
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - String/raw-string/rune scanning and escapes
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use crate::lang::operators::OperatorId;
use crate::lang::punctuation::PunctuationId;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Semicolon insertion (simplified):
//
// [token] → see '\n' or a comment spanning lines or EOF
//              ↓
//          last token ends a line? (ident, literal, return, ++, ')', ...)
//              ↓ yes
//          emit implicit ';' at the line break
// ============================================================================

/// Lexer for golite source code.
///
/// Converts source text into a stream of tokens. Errors are collected rather than aborting, so a
/// single pass reports every malformed literal in the file.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.line_break(self.current_pos);
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next(); // skip current
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors.push(CompileError::syntax(
            message.into(),
            Span::new(start, self.current_pos),
        ));
    }

    /// Insert an implicit semicolon at `pos` if the previous token can end a statement.
    fn line_break(&mut self, pos: usize) {
        if self.tokens.last().is_some_and(|t| t.kind.ends_line()) {
            self.tokens.push(Token::new(
                TokenKind::Punctuation(PunctuationId::Semicolon),
                Span::new(pos, pos),
            ));
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        // Skip whitespace (but not newlines)
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '\n' => self.line_break(start),

            // Operators and punctuation
            '+' => self.operator(
                start,
                OperatorId::Plus,
                &[('+', OperatorId::Inc), ('=', OperatorId::PlusEq)],
            ),
            '-' => self.operator(
                start,
                OperatorId::Minus,
                &[('-', OperatorId::Dec), ('=', OperatorId::MinusEq)],
            ),
            '*' => self.operator(start, OperatorId::Star, &[('=', OperatorId::StarEq)]),
            '/' => self.scan_slash(start),
            '%' => self.operator(start, OperatorId::Percent, &[('=', OperatorId::PercentEq)]),
            '&' => {
                if self.match_char('^') {
                    if self.match_char('=') {
                        self.add_op(OperatorId::AmpCaretEq, start);
                    } else {
                        self.add_op(OperatorId::AmpCaret, start);
                    }
                } else {
                    self.operator(
                        start,
                        OperatorId::Amp,
                        &[('&', OperatorId::AndAnd), ('=', OperatorId::AmpEq)],
                    );
                }
            }
            '|' => self.operator(
                start,
                OperatorId::Pipe,
                &[('|', OperatorId::OrOr), ('=', OperatorId::PipeEq)],
            ),
            '^' => self.operator(start, OperatorId::Caret, &[('=', OperatorId::CaretEq)]),
            '~' => self.add_op(OperatorId::Tilde, start),
            '<' => {
                if self.match_char('<') {
                    self.operator(start, OperatorId::Shl, &[('=', OperatorId::ShlEq)]);
                } else {
                    self.operator(
                        start,
                        OperatorId::Lt,
                        &[('=', OperatorId::LtEq), ('-', OperatorId::Arrow)],
                    );
                }
            }
            '>' => {
                if self.match_char('>') {
                    self.operator(start, OperatorId::Shr, &[('=', OperatorId::ShrEq)]);
                } else {
                    self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]);
                }
            }
            '=' => self.operator(start, OperatorId::Eq, &[('=', OperatorId::EqEq)]),
            '!' => self.operator(start, OperatorId::Not, &[('=', OperatorId::NotEq)]),
            ':' => {
                if self.match_char('=') {
                    self.add_op(OperatorId::Define, start);
                } else {
                    self.add_punct(PunctuationId::Colon, start);
                }
            }
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(start, c);
                } else if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.add_punct(PunctuationId::Ellipsis, start);
                } else {
                    self.add_punct(PunctuationId::Dot, start);
                }
            }
            ',' => self.add_punct(PunctuationId::Comma, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            '(' => self.add_punct(PunctuationId::LParen, start),
            ')' => self.add_punct(PunctuationId::RParen, start),
            '[' => self.add_punct(PunctuationId::LBracket, start),
            ']' => self.add_punct(PunctuationId::RBracket, start),
            '{' => self.add_punct(PunctuationId::LBrace, start),
            '}' => self.add_punct(PunctuationId::RBrace, start),

            // Strings and runes
            '"' => self.scan_string(start),
            '`' => self.scan_raw_string(start),
            '\'' => self.scan_rune(start),

            // Numbers
            '0'..='9' => self.scan_number(start, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => self.error(
                format!("illegal character '{}' ({:#04x})", c.escape_debug(), c as u32),
                start,
            ),
        }
    }

    // ========================================================================
    // Operator helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match compound operator, fallback to simple.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    /// Scan slash operators and comments: `/`, `/=`, `// ...`, `/* ... */`.
    fn scan_slash(&mut self, start: usize) {
        if self.match_char('/') {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
        } else if self.match_char('*') {
            self.scan_block_comment(start);
        } else if self.match_char('=') {
            self.add_op(OperatorId::SlashEq, start);
        } else {
            self.add_op(OperatorId::Slash, start);
        }
    }

    /// A block comment containing a newline acts like a newline.
    fn scan_block_comment(&mut self, start: usize) {
        let mut saw_newline = false;
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    break;
                }
                Some('\n') => saw_newline = true,
                Some(_) => {}
                None => {
                    self.error("comment not terminated", start);
                    return;
                }
            }
        }
        if saw_newline {
            self.line_break(start);
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        // Look up identifier spelling in the reserved-word registry (no allocation for keywords).
        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .unwrap_or_else(|errs| panic!("lex failed: {errs:?}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn semi() -> TokenKind {
        TokenKind::Punctuation(PunctuationId::Semicolon)
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_string())
    }

    // ------------------------------------------------------------------------
    // Keywords and identifiers
    // ------------------------------------------------------------------------

    #[test]
    fn test_package_clause() {
        assert_eq!(
            kinds("package main"),
            vec![TokenKind::Keyword(KeywordId::Package), ident("main"), semi(), TokenKind::Eof]
        );
    }

    #[test]
    fn test_identifiers_with_digits_and_underscores() {
        assert_eq!(kinds("_x9 y_"), vec![ident("_x9"), ident("y_"), semi(), TokenKind::Eof]);
    }

    // ------------------------------------------------------------------------
    // Semicolon insertion
    // ------------------------------------------------------------------------

    #[test]
    fn test_semicolon_after_closing_brace_and_return() {
        let toks = kinds("func f() {\n\treturn\n}\n");
        assert_eq!(
            toks,
            vec![
                TokenKind::Keyword(KeywordId::Func),
                ident("f"),
                TokenKind::Punctuation(PunctuationId::LParen),
                TokenKind::Punctuation(PunctuationId::RParen),
                TokenKind::Punctuation(PunctuationId::LBrace),
                TokenKind::Keyword(KeywordId::Return),
                semi(),
                TokenKind::Punctuation(PunctuationId::RBrace),
                semi(),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator_or_open_brace() {
        let toks = kinds("x = 1 +\n2 {\n");
        assert_eq!(
            toks,
            vec![
                ident("x"),
                TokenKind::Operator(OperatorId::Eq),
                TokenKind::Int(1),
                TokenKind::Operator(OperatorId::Plus),
                TokenKind::Int(2),
                TokenKind::Punctuation(PunctuationId::LBrace),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_inserted_semicolon_is_implicit() {
        let toks = lex("x\ny;").expect("lex");
        assert!(toks[1].implicit());
        assert!(!toks[3].implicit());
    }

    #[test]
    fn test_multiline_block_comment_acts_as_newline() {
        assert_eq!(kinds("x /* a\nb */ y"), vec![ident("x"), semi(), ident("y"), semi(), TokenKind::Eof]);
        assert_eq!(kinds("x /* a */ y"), vec![ident("x"), ident("y"), semi(), TokenKind::Eof]);
    }

    #[test]
    fn test_line_comment_then_newline() {
        assert_eq!(kinds("x // trailing\n"), vec![ident("x"), semi(), TokenKind::Eof]);
    }

    // ------------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------------

    #[test]
    fn test_longest_match_operators() {
        let toks = kinds("<<= >>= &^= &^ <- := ... && || ++ -- != <= >=");
        let ops: Vec<_> = toks.into_iter().filter(|k| *k != semi() && *k != TokenKind::Eof).collect();
        assert_eq!(
            ops,
            vec![
                TokenKind::Operator(OperatorId::ShlEq),
                TokenKind::Operator(OperatorId::ShrEq),
                TokenKind::Operator(OperatorId::AmpCaretEq),
                TokenKind::Operator(OperatorId::AmpCaret),
                TokenKind::Operator(OperatorId::Arrow),
                TokenKind::Operator(OperatorId::Define),
                TokenKind::Punctuation(PunctuationId::Ellipsis),
                TokenKind::Operator(OperatorId::AndAnd),
                TokenKind::Operator(OperatorId::OrOr),
                TokenKind::Operator(OperatorId::Inc),
                TokenKind::Operator(OperatorId::Dec),
                TokenKind::Operator(OperatorId::NotEq),
                TokenKind::Operator(OperatorId::LtEq),
                TokenKind::Operator(OperatorId::GtEq),
            ]
        );
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    #[test]
    fn test_illegal_character_is_reported_with_span() {
        let errs = lex("x @ y").expect_err("should fail");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].span, Span::new(2, 3));
        assert!(errs[0].message.contains("illegal character '@'"), "{}", errs[0].message);
    }

    #[test]
    fn test_errors_are_collected() {
        let errs = lex("@ # $").expect_err("should fail");
        assert_eq!(errs.len(), 3);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let errs = lex("/* never closed").expect_err("should fail");
        assert_eq!(errs[0].message, "comment not terminated");
    }
}
