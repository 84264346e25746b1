//! The historic two-letter error codes B compilers have used since the
//! original PDP-11 implementation, plus the meaning each carries.

use std::fmt;

/// One of the closed set of fatal error codes from the B error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `$)` unmatched brace
    UnmatchedBrace,
    /// `()` unmatched paren
    UnmatchedParen,
    /// `*/` unterminated block comment
    UnterminatedComment,
    /// `[]` unmatched bracket
    UnmatchedBracket,
    /// `>c` case table overflow
    CaseOverflow,
    /// `>e` expression table overflow
    ExprOverflow,
    /// `>i` label table overflow
    LabelOverflow,
    /// `>s` symbol table overflow
    SymbolOverflow,
    /// `ex` malformed expression
    BadExpr,
    /// `lv` lvalue required
    NotAnLvalue,
    /// `rd` name redeclared in this scope
    Redeclared,
    /// `sx` malformed statement
    BadStmt,
    /// `un` undefined name in callable position
    Undefined,
    /// `xx` malformed external definition
    BadExternDef,
}

impl ErrorCode {
    /// The two-character historic code, e.g. `"lv"`.
    pub const fn code(self) -> &'static str {
        use ErrorCode::*;
        match self {
            UnmatchedBrace => "$)",
            UnmatchedParen => "()",
            UnterminatedComment => "*/",
            UnmatchedBracket => "[]",
            CaseOverflow => ">c",
            ExprOverflow => ">e",
            LabelOverflow => ">i",
            SymbolOverflow => ">s",
            BadExpr => "ex",
            NotAnLvalue => "lv",
            Redeclared => "rd",
            BadStmt => "sx",
            Undefined => "un",
            BadExternDef => "xx",
        }
    }

    /// A default English message used when no more specific text is given.
    pub const fn default_message(self) -> &'static str {
        use ErrorCode::*;
        match self {
            UnmatchedBrace => "unmatched brace",
            UnmatchedParen => "unmatched paren",
            UnterminatedComment => "unterminated comment",
            UnmatchedBracket => "unmatched bracket",
            CaseOverflow => "too many case labels in one switch",
            ExprOverflow => "expression too large",
            LabelOverflow => "too many labels",
            SymbolOverflow => "too many symbols",
            BadExpr => "malformed expression",
            NotAnLvalue => "lvalue required",
            Redeclared => "name already declared in this scope",
            BadStmt => "malformed statement",
            Undefined => "undefined name in callable position",
            BadExternDef => "malformed external definition",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
