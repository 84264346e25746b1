//! Numeric constant lexing.
//!
//! B's number literals carry an odd historical quirk: a leading `0`
//! selects octal interpretation, but the lexer does not restrict which
//! digits may follow — `09` is accepted and means `0*8 + 9 = 9`, not a
//! lexical error the way it would be in C. There are no hex, binary, or
//! floating-point literals in B.

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a, 'h> Lexer<'a, 'h> {
    pub(crate) fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        let value = parse_number(text);
        Token::with_value(TokenKind::Number, self.span(), value)
    }
}

/// Parses a run of decimal digits as octal if it begins with `0` and has
/// more than one digit, decimal otherwise. Each digit is still accepted
/// at face value in the octal case, per the quirk above, so this never
/// rejects a digit string matched by the lexer's scan loop.
fn parse_number(text: &str) -> i64 {
    let bytes = text.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        let mut value: i64 = 0;
        for &b in bytes {
            value = value.wrapping_mul(8).wrapping_add((b - b'0') as i64);
        }
        value
    } else {
        text.parse::<i64>().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_util::{FileId, Handler, Idx, Interner};

    fn value_of(source: &str) -> i64 {
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let mut lexer = Lexer::new(source, file, &mut handler, &interner);
        lexer.next_token().value
    }

    #[test]
    fn plain_decimal() {
        assert_eq!(value_of("42"), 42);
    }

    #[test]
    fn leading_zero_is_octal() {
        assert_eq!(value_of("010"), 8);
    }

    #[test]
    fn octal_quirk_accepts_any_digit() {
        // "09" in true octal would be invalid; B accepts it as 0*8+9.
        assert_eq!(value_of("09"), 9);
    }

    #[test]
    fn bare_zero_is_zero() {
        assert_eq!(value_of("0"), 0);
    }
}
