/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by synchronizing at the next
///   top-level declaration.
/// - A missing or malformed package clause is fatal: nothing after it is parsed.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `golite_syntax::lexer`, ending in `Eof`. An empty
    ///   stream is reported as a missing package clause.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`SourceFile`].
    ///
    /// ## Errors
    /// Returns a list of [`CompileError`]s if parsing fails. The parser attempts
    /// to recover and continue after an error to report multiple issues in one pass.
    pub fn parse(mut self, lines: LineIndex) -> Result<SourceFile, Vec<CompileError>> {
        // `peek` needs at least the trailing `Eof`.
        if self.tokens.is_empty() {
            return Err(vec![errors::missing_package_clause(Span::new(0, 0))]);
        }

        let package = match self.package_clause() {
            Ok(package) => package,
            Err(e) => {
                self.errors.push(e);
                return Err(self.errors);
            }
        };

        let mut imports = Vec::new();
        let mut decls = Vec::new();

        self.skip_semicolons();
        while self.check_keyword(KeywordId::Import) {
            match self.import_decl() {
                Ok(specs) => imports.extend(specs),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.skip_semicolons();
        }

        while !self.is_at_end() {
            if self.check_keyword(KeywordId::Import) {
                let span = self.current_span();
                self.errors.push(errors::import_after_decl(span));
                self.synchronize();
                continue;
            }
            match self.top_level_decl() {
                Ok(decl) => decls.push(decl),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.skip_semicolons();
        }

        if self.errors.is_empty() {
            Ok(SourceFile {
                package,
                imports,
                decls,
                lines,
            })
        } else {
            Err(self.errors)
        }
    }
}
