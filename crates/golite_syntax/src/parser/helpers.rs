/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords and punctuation
/// - Balanced-delimiter skipping
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    ///
    /// Past the end this keeps returning the final `Eof` token.
    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len().saturating_sub(1));
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, expected: &str) -> Result<Span, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Expect the `;` terminating a declaration or spec.
    ///
    /// The semicolon may be omitted before a closing `)`, as in `import ("fmt")`.
    fn expect_semi(&mut self) -> Result<(), CompileError> {
        if self.match_punct(PunctuationId::Semicolon) || self.check_punct(PunctuationId::RParen) || self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("';' or newline"))
        }
    }

    fn skip_semicolons(&mut self) {
        while self.match_punct(PunctuationId::Semicolon) {}
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].span,
            None => self.current_span(),
        }
    }

    /// Error for the current token not being what the grammar expects.
    fn unexpected(&self, expected: &str) -> CompileError {
        errors::unexpected_token(expected, &describe(self.peek()), self.current_span())
    }

    /// Return `true` at a keyword that starts a top-level declaration.
    fn at_decl_start(&self) -> bool {
        self.check_keyword(KeywordId::Func)
            || self.check_keyword(KeywordId::Var)
            || self.check_keyword(KeywordId::Const)
            || self.check_keyword(KeywordId::Type)
            || self.check_keyword(KeywordId::Import)
    }

    // ========================================================================
    // Balanced skipping
    // ========================================================================

    /// Skip a delimited group starting at the current opening delimiter, including everything
    /// nested inside it. Returns the span from the opener to the matching closer.
    fn skip_balanced(&mut self) -> Result<Span, CompileError> {
        let mut stack: Vec<(PunctuationId, Span)> = Vec::new();
        let start = self.current_span();
        loop {
            let token = self.peek();
            let span = token.span;
            match token.kind {
                TokenKind::Eof => {
                    let (open, open_span) = stack.pop().unwrap_or((PunctuationId::LParen, start));
                    return Err(errors::unclosed_delimiter(punctuation::as_str(open), open_span));
                }
                TokenKind::Punctuation(id) => {
                    if punctuation::closing(id).is_some() {
                        stack.push((id, span));
                    } else if punctuation::is_closing(id) {
                        let Some((open, _)) = stack.pop() else {
                            return Err(self.unexpected("opening delimiter"));
                        };
                        let expected = punctuation::closing(open).unwrap_or(id);
                        if expected != id {
                            return Err(errors::mismatched_delimiter(
                                punctuation::as_str(expected),
                                punctuation::as_str(id),
                                span,
                            ));
                        }
                    }
                    self.advance();
                    if stack.is_empty() {
                        return Ok(start.merge(span));
                    }
                }
                _ => {
                    self.advance();
                    if stack.is_empty() {
                        return Ok(start.merge(span));
                    }
                }
            }
        }
    }

    /// Skip the rest of a spec or signature up to (not including) a `;`, a closer that does not
    /// belong to it, or `stop_at_brace` `{` at depth zero. Nested groups are skipped whole.
    ///
    /// `struct {` and `interface {` are part of the type they introduce, so their braces never
    /// count as a stopping `{`.
    fn skip_until_end(&mut self, stop_at_brace: bool) -> Result<(), CompileError> {
        loop {
            match self.peek().kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Punctuation(PunctuationId::Semicolon) => return Ok(()),
                TokenKind::Punctuation(id) if punctuation::is_closing(id) => return Ok(()),
                TokenKind::Punctuation(PunctuationId::LBrace) if stop_at_brace => return Ok(()),
                TokenKind::Punctuation(id) if punctuation::closing(id).is_some() => {
                    self.skip_balanced()?;
                }
                TokenKind::Keyword(KeywordId::Struct | KeywordId::Interface) => {
                    self.advance();
                    if self.check_punct(PunctuationId::LBrace) {
                        self.skip_balanced()?;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip tokens until just after a `;` at depth zero that is followed by a top-level
    /// declaration keyword, or the end of input.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            let id = self.advance().punctuation_id();
            match id {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1)
                }
                Some(PunctuationId::Semicolon) if depth == 0 && self.at_decl_start() => return,
                _ => {}
            }
        }
    }
}
