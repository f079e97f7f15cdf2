/// Declaration parsing: package clause, imports and top-level declarations.
impl<'a> Parser<'a> {
    // ========================================================================
    // Package clause
    // ========================================================================

    fn package_clause(&mut self) -> Result<Spanned<Ident>, CompileError> {
        self.skip_semicolons();
        if !self.match_keyword(KeywordId::Package) {
            return Err(errors::missing_package_clause(self.current_span()));
        }
        let name = match &self.peek().kind {
            TokenKind::Ident(name) if name != "_" => {
                let spanned = Spanned::new(name.clone(), self.current_span());
                self.advance();
                spanned
            }
            _ => {
                return Err(errors::package_name_not_ident(
                    &describe(self.peek()),
                    self.current_span(),
                ));
            }
        };
        self.expect_semi()?;
        Ok(name)
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// `import spec` or `import ( spec; spec; ... )`
    fn import_decl(&mut self) -> Result<Vec<Spanned<ImportDecl>>, CompileError> {
        self.advance(); // 'import'
        let mut specs = Vec::new();
        if self.check_punct(PunctuationId::LParen) {
            let open = self.advance().span;
            loop {
                self.skip_semicolons();
                if self.match_punct(PunctuationId::RParen) {
                    break;
                }
                if self.is_at_end() {
                    return Err(errors::unclosed_delimiter("(", open));
                }
                specs.push(self.import_spec()?);
                self.expect_semi()?;
            }
        } else {
            specs.push(self.import_spec()?);
        }
        self.expect_semi()?;
        Ok(specs)
    }

    /// `[ "." | "_" | ident ] "path"`
    fn import_spec(&mut self) -> Result<Spanned<ImportDecl>, CompileError> {
        let start = self.current_span();
        let binding = match &self.peek().kind {
            TokenKind::Punctuation(PunctuationId::Dot) => {
                self.advance();
                ImportBinding::Dot
            }
            TokenKind::Ident(name) if name == "_" => {
                self.advance();
                ImportBinding::Blank
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                ImportBinding::Named(name)
            }
            _ => ImportBinding::Default,
        };

        let path_span = self.current_span();
        let path = match &self.peek().kind {
            TokenKind::String(path) => path.clone(),
            _ => return Err(errors::import_not_string(&describe(self.peek()), path_span)),
        };
        self.advance();

        if path.is_empty() {
            return Err(errors::empty_import_path(path_span));
        }
        if let Some(bad) = path.chars().find(|c| !is_import_path_char(*c)) {
            return Err(errors::invalid_import_path(&path, bad, path_span));
        }

        Ok(Spanned::new(ImportDecl { path, binding }, start.merge(path_span)))
    }

    // ========================================================================
    // Top-level declarations
    // ========================================================================

    fn top_level_decl(&mut self) -> Result<Spanned<Decl>, CompileError> {
        let start = self.current_span();
        let decl = match self.peek().keyword_id() {
            Some(KeywordId::Func) => Decl::Func(self.func_decl()?),
            Some(KeywordId::Var) => Decl::Var(self.spec_group(KeywordId::Var)?),
            Some(KeywordId::Const) => Decl::Const(self.spec_group(KeywordId::Const)?),
            Some(KeywordId::Type) => Decl::Type(self.spec_group(KeywordId::Type)?),
            _ => return Err(self.unexpected("declaration")),
        };
        let span = start.merge(self.previous_span());
        self.expect_semi()?;
        Ok(Spanned::new(decl, span))
    }

    /// `func [receiver] name [type params] signature [body]`
    fn func_decl(&mut self) -> Result<FuncDecl, CompileError> {
        self.advance(); // 'func'

        let receiver = if self.check_punct(PunctuationId::LParen) {
            Some(self.receiver()?)
        } else {
            None
        };

        let name = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let spanned = Spanned::new(name.clone(), self.current_span());
                self.advance();
                spanned
            }
            _ => return Err(self.unexpected("function name")),
        };

        if !self.check_punct(PunctuationId::LParen) && !self.check_punct(PunctuationId::LBracket) {
            return Err(self.unexpected("'(' after function name"));
        }
        self.skip_until_end(true)?;

        let has_body = self.check_punct(PunctuationId::LBrace);
        if has_body {
            self.skip_balanced()?;
        }

        Ok(FuncDecl {
            name,
            receiver,
            has_body,
        })
    }

    /// Skip a receiver `( [name] [*] Type [ [params] ] )` and return the base type name.
    fn receiver(&mut self) -> Result<Ident, CompileError> {
        let open = self.current_span();
        self.advance(); // '('
        let mut base = None;
        loop {
            match &self.peek().kind {
                TokenKind::Punctuation(PunctuationId::RParen) => {
                    self.advance();
                    break;
                }
                TokenKind::Punctuation(PunctuationId::LBracket) => {
                    self.skip_balanced()?;
                }
                TokenKind::Ident(name) => {
                    base = Some(name.clone());
                    self.advance();
                }
                TokenKind::Eof => return Err(errors::unclosed_delimiter("(", open)),
                TokenKind::Punctuation(PunctuationId::Semicolon | PunctuationId::LBrace) => {
                    return Err(self.unexpected("')' closing the receiver"));
                }
                _ => {
                    self.advance();
                }
            }
        }
        base.ok_or_else(|| errors::unexpected_token("receiver type", "')'", open.merge(self.previous_span())))
    }

    /// `keyword spec` or `keyword ( spec; spec; ... )`, returning every declared name.
    fn spec_group(&mut self, keyword: KeywordId) -> Result<Vec<Spanned<Ident>>, CompileError> {
        self.advance(); // keyword
        let mut names = Vec::new();
        if self.check_punct(PunctuationId::LParen) {
            let open = self.advance().span;
            loop {
                self.skip_semicolons();
                if self.match_punct(PunctuationId::RParen) {
                    break;
                }
                if self.is_at_end() {
                    return Err(errors::unclosed_delimiter("(", open));
                }
                names.extend(self.spec(keyword)?);
                self.expect_semi()?;
            }
        } else {
            names.extend(self.spec(keyword)?);
        }
        Ok(names)
    }

    /// One `var`/`const` spec (`a, b int = 1, 2`) or `type` spec (`T[P any] struct{...}`).
    fn spec(&mut self, keyword: KeywordId) -> Result<Vec<Spanned<Ident>>, CompileError> {
        let names = if keyword == KeywordId::Type {
            vec![self.identifier_spanned("type name")?]
        } else {
            self.identifier_list_spanned()?
        };
        self.skip_until_end(false)?;
        let stray_closer = self
            .peek()
            .punctuation_id()
            .is_some_and(|id| punctuation::is_closing(id) && id != PunctuationId::RParen);
        if stray_closer {
            return Err(self.unexpected("';' or newline"));
        }
        Ok(names)
    }
}
