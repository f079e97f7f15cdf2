/// Miscellaneous parser utilities.
///
/// Identifier parsing and token descriptions for diagnostics.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    fn identifier_spanned(&mut self, what: &str) -> Result<Spanned<Ident>, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                let name = name.clone();
                self.advance();
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn identifier_list_spanned(&mut self) -> Result<Vec<Spanned<Ident>>, CompileError> {
        let mut idents = vec![self.identifier_spanned("identifier")?];
        while self.match_punct(PunctuationId::Comma) {
            idents.push(self.identifier_spanned("identifier")?);
        }
        Ok(idents)
    }
}

/// Describe a token for "expected X, found Y" messages. Inserted semicolons read as `newline`.
fn describe(token: &Token) -> String {
    if token.implicit() {
        "newline".to_string()
    } else {
        token.kind.to_string()
    }
}

/// Characters allowed in an import path: graphic, non-space, and none of ``!"#$%&'()*,:;<=>?[\]^`{|}``.
fn is_import_path_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_control() && !"!\"#$%&'()*,:;<=>?[\\]^`{|}\u{FFFD}".contains(c)
}
