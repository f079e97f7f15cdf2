/// Parse a token stream into a [`SourceFile`].
///
/// `source` is the text the tokens were lexed from; it is only used to build the file's
/// [`LineIndex`].
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token], source: &str) -> Result<SourceFile, Vec<CompileError>> {
    Parser::new(tokens).parse(LineIndex::new(source))
}

/// Lex and parse `source` in one step. Lexer errors are returned as-is; the parser only runs on a
/// clean token stream.
pub fn parse_source(source: &str) -> Result<SourceFile, Vec<CompileError>> {
    let tokens = crate::lexer::lex(source)?;
    parse(&tokens, source)
}
