//! Token kinds. Closed enum, no payload on variants: a value carried by a
//! token (identifier text, number, packed character constant) lives
//! alongside the kind on [`Token`] itself, per the node layout.

use bcc_util::{Span, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // literals
    Ident,
    Number,
    StringLit,
    CharConst,

    // keywords
    KwAuto,
    KwExtrn,
    KwCase,
    KwDefault,
    KwIf,
    KwElse,
    KwWhile,
    KwSwitch,
    KwGoto,
    KwReturn,

    // delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Question,
    /// `..`, the switch-case range separator (`case lo..hi:`). B has no
    /// single-dot token, so this is the only form ever produced.
    DotDot,

    // plain operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Bang,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    OrOr,
    Inc,
    Dec,
    Assign,

    // `=op` compound assignment family
    AssignAdd,
    AssignSub,
    AssignMul,
    AssignDiv,
    AssignMod,
    AssignAnd,
    AssignOr,
    AssignShl,
    AssignShr,
    AssignLt,
    AssignLe,
    AssignGt,
    AssignGe,
    AssignEq,
    AssignNe,

    Eof,
    /// Lexically invalid byte; `text` on the [`Token`] carries a
    /// human-readable rendering of the offending character.
    Invalid,
}

impl TokenKind {
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match ident {
            "auto" => KwAuto,
            "extrn" => KwExtrn,
            "case" => KwCase,
            "default" => KwDefault,
            "if" => KwIf,
            "else" => KwElse,
            "while" => KwWhile,
            "switch" => KwSwitch,
            "goto" => KwGoto,
            "return" => KwReturn,
            _ => return None,
        })
    }

    /// True for every token that may begin the `=op` family, i.e. every
    /// assignment form the parser treats at precedence level 2.
    pub fn is_assign_op(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | AssignAdd
                | AssignSub
                | AssignMul
                | AssignDiv
                | AssignMod
                | AssignAnd
                | AssignOr
                | AssignShl
                | AssignShr
                | AssignLt
                | AssignLe
                | AssignGt
                | AssignGe
                | AssignEq
                | AssignNe
        )
    }
}

/// A token with its source span, and (for literal kinds) its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Interned text for `Ident`, `StringLit` (escape-processed content),
    /// and `Invalid`. `None` for every other kind.
    pub text: Option<Symbol>,
    /// The numeric payload for `Number` and `CharConst` (packed as up to
    /// four bytes, right-justified, zero-filled). Zero for every other
    /// kind.
    pub value: i64,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            text: None,
            value: 0,
        }
    }

    pub fn with_text(kind: TokenKind, span: Span, text: Symbol) -> Self {
        Token {
            kind,
            span,
            text: Some(text),
            value: 0,
        }
    }

    pub fn with_value(kind: TokenKind, span: Span, value: i64) -> Self {
        Token {
            kind,
            span,
            text: None,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_all_keywords() {
        let kws = [
            "auto", "extrn", "case", "default", "if", "else", "while", "switch", "goto", "return",
        ];
        for kw in kws {
            assert!(TokenKind::keyword(kw).is_some(), "{kw} should be a keyword");
        }
    }

    #[test]
    fn non_keyword_identifier_is_none() {
        assert_eq!(TokenKind::keyword("main"), None);
    }

    #[test]
    fn is_assign_op_covers_whole_family() {
        assert!(TokenKind::AssignLt.is_assign_op());
        assert!(TokenKind::AssignShl.is_assign_op());
        assert!(TokenKind::Assign.is_assign_op());
        assert!(!TokenKind::Plus.is_assign_op());
    }
}
