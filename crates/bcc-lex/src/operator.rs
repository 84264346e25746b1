//! Operator lexing, including the `=op` compound-assignment family.
//!
//! The `=op` family is the one place B's grammar is genuinely ambiguous
//! without lookahead: `=<<` must not be read as `=<` followed by `<`.
//! Three-character forms are tried before two-character forms, and
//! two-character forms before the one-character fallback (plain `=`).

use bcc_util::ErrorCode;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a, 'h> Lexer<'a, 'h> {
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance(); // consume '='

        // three-character forms: =<< =>> =<= =>= === =!=
        let kind = match (self.cursor.current(), self.cursor.peek(1)) {
            (b'<', b'<') => Some(TokenKind::AssignShl),
            (b'>', b'>') => Some(TokenKind::AssignShr),
            (b'<', b'=') => Some(TokenKind::AssignLe),
            (b'>', b'=') => Some(TokenKind::AssignGe),
            (b'=', b'=') => Some(TokenKind::AssignEq),
            (b'!', b'=') => Some(TokenKind::AssignNe),
            _ => None,
        };
        if let Some(kind) = kind {
            self.cursor.advance_n(2);
            return self.make(kind);
        }

        // two-character forms: =+ =- =* =/ =% =& =| =< =>
        // plain `==` (the equality operator, not a compound assign) also
        // starts with '=' and is resolved here.
        let kind = match self.cursor.current() {
            b'+' => Some(TokenKind::AssignAdd),
            b'-' => Some(TokenKind::AssignSub),
            b'*' => Some(TokenKind::AssignMul),
            b'/' => Some(TokenKind::AssignDiv),
            b'%' => Some(TokenKind::AssignMod),
            b'&' => Some(TokenKind::AssignAnd),
            b'|' => Some(TokenKind::AssignOr),
            b'<' => Some(TokenKind::AssignLt),
            b'>' => Some(TokenKind::AssignGt),
            b'=' => Some(TokenKind::EqEq),
            _ => None,
        };
        if let Some(kind) = kind {
            self.cursor.advance();
            return self.make(kind);
        }

        // plain '='
        self.make(TokenKind::Assign)
    }

    /// `..` is the only dot form B recognizes, used to spell a switch-case
    /// range bound (`case lo..hi:`). A lone `.` is not a valid token.
    pub(crate) fn lex_dot(&mut self) -> Token {
        self.cursor.advance(); // consume first '.'
        if self.cursor.eat(b'.') {
            return self.make(TokenKind::DotDot);
        }
        self.report_error(ErrorCode::BadExpr, "unexpected character '.'");
        Token::with_text(TokenKind::Invalid, self.span(), self.interner.intern("."))
    }

    pub(crate) fn lex_operator(&mut self) -> Token {
        let c = self.cursor.current();
        self.cursor.advance();
        let kind = match c {
            b'+' if self.cursor.eat(b'+') => TokenKind::Inc,
            b'+' => TokenKind::Plus,
            b'-' if self.cursor.eat(b'-') => TokenKind::Dec,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'&' => TokenKind::Amp,
            b'|' if self.cursor.eat(b'|') => TokenKind::OrOr,
            b'|' => TokenKind::Pipe,
            b'!' if self.cursor.eat(b'=') => TokenKind::NotEq,
            b'!' => TokenKind::Bang,
            b'<' if self.cursor.eat(b'<') => TokenKind::Shl,
            b'<' if self.cursor.eat(b'=') => TokenKind::Le,
            b'<' => TokenKind::Lt,
            b'>' if self.cursor.eat(b'>') => TokenKind::Shr,
            b'>' if self.cursor.eat(b'=') => TokenKind::Ge,
            b'>' => TokenKind::Gt,
            b':' => TokenKind::Colon,
            _ => {
                self.report_error(ErrorCode::BadExpr, format!("unexpected operator character '{}'", c as char));
                TokenKind::Invalid
            }
        };
        self.make(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_util::{FileId, Handler, Idx, Interner};

    fn kinds_of(source: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let mut lexer = Lexer::new(source, file, &mut handler, &interner);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.kind == TokenKind::Eof {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn three_char_forms_beat_two_char_forms() {
        assert_eq!(kinds_of("=<<"), vec![TokenKind::AssignShl]);
        assert_eq!(kinds_of("=>>"), vec![TokenKind::AssignShr]);
        assert_eq!(kinds_of("=<="), vec![TokenKind::AssignLe]);
        assert_eq!(kinds_of("=>="), vec![TokenKind::AssignGe]);
        assert_eq!(kinds_of("==="), vec![TokenKind::AssignEq]);
        assert_eq!(kinds_of("=!="), vec![TokenKind::AssignNe]);
    }

    #[test]
    fn two_char_forms_when_no_three_char_match() {
        assert_eq!(kinds_of("=<"), vec![TokenKind::AssignLt]);
        assert_eq!(kinds_of("=>"), vec![TokenKind::AssignGt]);
        assert_eq!(kinds_of("=+"), vec![TokenKind::AssignAdd]);
        assert_eq!(kinds_of("=&"), vec![TokenKind::AssignAnd]);
    }

    #[test]
    fn plain_equals_when_nothing_follows() {
        assert_eq!(kinds_of("= x"), vec![TokenKind::Assign, TokenKind::Ident]);
    }

    #[test]
    fn double_equals_is_the_equality_operator() {
        assert_eq!(kinds_of("x == y"), vec![TokenKind::Ident, TokenKind::EqEq, TokenKind::Ident]);
    }

    #[test]
    fn multichar_plain_operators() {
        assert_eq!(kinds_of("++ -- << >> == != <= >= ||"), vec![
            TokenKind::Inc,
            TokenKind::Dec,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::OrOr,
        ]);
    }

    #[test]
    fn single_amp_and_pipe_have_no_and_and_form() {
        assert_eq!(kinds_of("& |"), vec![TokenKind::Amp, TokenKind::Pipe]);
    }

    #[test]
    fn double_dot_is_the_range_separator() {
        assert_eq!(kinds_of("1..3"), vec![TokenKind::Number, TokenKind::DotDot, TokenKind::Number]);
    }

    #[test]
    fn a_lone_dot_is_invalid() {
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let mut lexer = Lexer::new(".", file, &mut handler, &interner);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Invalid);
        assert!(handler.has_errors());
    }
}
