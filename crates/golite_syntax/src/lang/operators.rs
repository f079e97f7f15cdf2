//! Operator vocabulary: arithmetic, bitwise, comparison, logical, assignment and channel operators.

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic / bitwise
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AmpCaret,
    Tilde,

    // Compound assignment
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    AmpCaretEq,

    // Logical / channel / step
    AndAnd,
    OrOr,
    Arrow,
    Inc,
    Dec,
    Not,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Binding
    Eq,
    Define,
}

pub const OPERATORS: &[OperatorId] = &[
    OperatorId::Plus,
    OperatorId::Minus,
    OperatorId::Star,
    OperatorId::Slash,
    OperatorId::Percent,
    OperatorId::Amp,
    OperatorId::Pipe,
    OperatorId::Caret,
    OperatorId::Shl,
    OperatorId::Shr,
    OperatorId::AmpCaret,
    OperatorId::Tilde,
    OperatorId::PlusEq,
    OperatorId::MinusEq,
    OperatorId::StarEq,
    OperatorId::SlashEq,
    OperatorId::PercentEq,
    OperatorId::AmpEq,
    OperatorId::PipeEq,
    OperatorId::CaretEq,
    OperatorId::ShlEq,
    OperatorId::ShrEq,
    OperatorId::AmpCaretEq,
    OperatorId::AndAnd,
    OperatorId::OrOr,
    OperatorId::Arrow,
    OperatorId::Inc,
    OperatorId::Dec,
    OperatorId::Not,
    OperatorId::EqEq,
    OperatorId::NotEq,
    OperatorId::Lt,
    OperatorId::LtEq,
    OperatorId::Gt,
    OperatorId::GtEq,
    OperatorId::Eq,
    OperatorId::Define,
];

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    match id {
        OperatorId::Plus => "+",
        OperatorId::Minus => "-",
        OperatorId::Star => "*",
        OperatorId::Slash => "/",
        OperatorId::Percent => "%",
        OperatorId::Amp => "&",
        OperatorId::Pipe => "|",
        OperatorId::Caret => "^",
        OperatorId::Shl => "<<",
        OperatorId::Shr => ">>",
        OperatorId::AmpCaret => "&^",
        OperatorId::Tilde => "~",
        OperatorId::PlusEq => "+=",
        OperatorId::MinusEq => "-=",
        OperatorId::StarEq => "*=",
        OperatorId::SlashEq => "/=",
        OperatorId::PercentEq => "%=",
        OperatorId::AmpEq => "&=",
        OperatorId::PipeEq => "|=",
        OperatorId::CaretEq => "^=",
        OperatorId::ShlEq => "<<=",
        OperatorId::ShrEq => ">>=",
        OperatorId::AmpCaretEq => "&^=",
        OperatorId::AndAnd => "&&",
        OperatorId::OrOr => "||",
        OperatorId::Arrow => "<-",
        OperatorId::Inc => "++",
        OperatorId::Dec => "--",
        OperatorId::Not => "!",
        OperatorId::EqEq => "==",
        OperatorId::NotEq => "!=",
        OperatorId::Lt => "<",
        OperatorId::LtEq => "<=",
        OperatorId::Gt => ">",
        OperatorId::GtEq => ">=",
        OperatorId::Eq => "=",
        OperatorId::Define => ":=",
    }
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<OperatorId> {
    OPERATORS.iter().copied().find(|id| as_str(*id) == s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spellings_are_unique() {
        for id in OPERATORS {
            assert_eq!(from_str(as_str(*id)), Some(*id), "{}", as_str(*id));
        }
    }
}
