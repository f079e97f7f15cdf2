//! Reserved keyword vocabulary.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`KEYWORDS`] lists every reserved word exactly once, in the order of the language reference.

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

/// Every keyword with its spelling.
pub const KEYWORDS: &[(KeywordId, &str)] = &[
    (KeywordId::Break, "break"),
    (KeywordId::Case, "case"),
    (KeywordId::Chan, "chan"),
    (KeywordId::Const, "const"),
    (KeywordId::Continue, "continue"),
    (KeywordId::Default, "default"),
    (KeywordId::Defer, "defer"),
    (KeywordId::Else, "else"),
    (KeywordId::Fallthrough, "fallthrough"),
    (KeywordId::For, "for"),
    (KeywordId::Func, "func"),
    (KeywordId::Go, "go"),
    (KeywordId::Goto, "goto"),
    (KeywordId::If, "if"),
    (KeywordId::Import, "import"),
    (KeywordId::Interface, "interface"),
    (KeywordId::Map, "map"),
    (KeywordId::Package, "package"),
    (KeywordId::Range, "range"),
    (KeywordId::Return, "return"),
    (KeywordId::Select, "select"),
    (KeywordId::Struct, "struct"),
    (KeywordId::Switch, "switch"),
    (KeywordId::Type, "type"),
    (KeywordId::Var, "var"),
];

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|(_, spelling)| *spelling == s).map(|(id, _)| *id)
}

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    match id {
        KeywordId::Break => "break",
        KeywordId::Case => "case",
        KeywordId::Chan => "chan",
        KeywordId::Const => "const",
        KeywordId::Continue => "continue",
        KeywordId::Default => "default",
        KeywordId::Defer => "defer",
        KeywordId::Else => "else",
        KeywordId::Fallthrough => "fallthrough",
        KeywordId::For => "for",
        KeywordId::Func => "func",
        KeywordId::Go => "go",
        KeywordId::Goto => "goto",
        KeywordId::If => "if",
        KeywordId::Import => "import",
        KeywordId::Interface => "interface",
        KeywordId::Map => "map",
        KeywordId::Package => "package",
        KeywordId::Range => "range",
        KeywordId::Return => "return",
        KeywordId::Select => "select",
        KeywordId::Struct => "struct",
        KeywordId::Switch => "switch",
        KeywordId::Type => "type",
        KeywordId::Var => "var",
    }
}

/// Keywords after which a line break terminates the statement.
pub fn ends_statement(id: KeywordId) -> bool {
    matches!(
        id,
        KeywordId::Break | KeywordId::Continue | KeywordId::Fallthrough | KeywordId::Return
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_consistent() {
        assert_eq!(KEYWORDS.len(), 25);
        for (id, spelling) in KEYWORDS {
            assert_eq!(as_str(*id), *spelling);
            assert_eq!(from_str(spelling), Some(*id));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(from_str("Func"), None);
        assert_eq!(from_str("main"), None);
    }
}
