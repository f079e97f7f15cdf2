//! Punctuation vocabulary: delimiters and separators.

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    Comma,
    Semicolon,
    Colon,
    Dot,
    Ellipsis,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    match id {
        PunctuationId::Comma => ",",
        PunctuationId::Semicolon => ";",
        PunctuationId::Colon => ":",
        PunctuationId::Dot => ".",
        PunctuationId::Ellipsis => "...",
        PunctuationId::LParen => "(",
        PunctuationId::RParen => ")",
        PunctuationId::LBracket => "[",
        PunctuationId::RBracket => "]",
        PunctuationId::LBrace => "{",
        PunctuationId::RBrace => "}",
    }
}

/// The closing delimiter for an opening one.
pub fn closing(open: PunctuationId) -> Option<PunctuationId> {
    match open {
        PunctuationId::LParen => Some(PunctuationId::RParen),
        PunctuationId::LBracket => Some(PunctuationId::RBracket),
        PunctuationId::LBrace => Some(PunctuationId::RBrace),
        _ => None,
    }
}

pub fn is_closing(id: PunctuationId) -> bool {
    matches!(id, PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace)
}
