//! String and character-constant lexing.
//!
//! B strings are EOT-terminated (0x04) rather than NUL-terminated; the
//! lexer strips the delimiting quotes and resolves `*`-escapes into the
//! stored text, and the emitter is the one that appends the EOT byte when
//! it lays the string into the pool. Character constants pack up to four
//! bytes into a single word, byte 0 (the first character written) in the
//! least-significant position, right-justified and zero-filled.

use bcc_util::ErrorCode;

use crate::escape;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a, 'h> Lexer<'a, 'h> {
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // consume opening '"'
        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() || self.cursor.current() == b'\n' {
                self.report_error(ErrorCode::BadExpr, "unterminated string literal");
                break;
            }
            let c = self.cursor.current();
            if c == b'"' {
                self.cursor.advance();
                break;
            }
            if c == b'*' {
                self.cursor.advance();
                let lead = self.cursor.current();
                match escape::resolve(lead) {
                    Some(byte) => {
                        self.cursor.advance();
                        content.push(byte as char);
                    }
                    None => {
                        self.report_error(ErrorCode::BadExpr, format!("unknown escape '*{}'", lead as char));
                        self.cursor.advance();
                    }
                }
                continue;
            }
            content.push(c as char);
            self.cursor.advance();
        }
        let sym = self.interner.intern(&content);
        Token::with_text(TokenKind::StringLit, self.span(), sym)
    }

    pub(crate) fn lex_char(&mut self) -> Token {
        self.cursor.advance(); // consume opening '\''
        let mut bytes: Vec<u8> = Vec::with_capacity(4);
        loop {
            if self.cursor.is_at_end() || self.cursor.current() == b'\n' {
                self.report_error(ErrorCode::BadExpr, "unterminated character constant");
                break;
            }
            let c = self.cursor.current();
            if c == b'\'' {
                self.cursor.advance();
                break;
            }
            if c == b'*' {
                self.cursor.advance();
                let lead = self.cursor.current();
                match escape::resolve(lead) {
                    Some(byte) => {
                        self.cursor.advance();
                        bytes.push(byte);
                    }
                    None => {
                        self.report_error(ErrorCode::BadExpr, format!("unknown escape '*{}'", lead as char));
                        self.cursor.advance();
                    }
                }
            } else {
                bytes.push(c);
                self.cursor.advance();
            }
            if bytes.len() > 4 {
                self.report_error(ErrorCode::BadExpr, "character constant holds at most four bytes");
            }
        }
        let value = pack_chars(&bytes);
        Token::with_value(TokenKind::CharConst, self.span(), value)
    }
}

/// Packs up to four bytes into a single word: the first byte written ends
/// up in the low byte, matching the PDP-11 B compiler's in-memory layout.
fn pack_chars(bytes: &[u8]) -> i64 {
    let mut word: i64 = 0;
    for (i, &b) in bytes.iter().take(4).enumerate() {
        word |= (b as i64) << (8 * i);
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_util::{FileId, Handler, Idx, Interner};

    fn lex_one(source: &str) -> (Token, Handler) {
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let tok = {
            let mut lexer = Lexer::new(source, file, &mut handler, &interner);
            lexer.next_token()
        };
        (tok, handler)
    }

    #[test]
    fn resolves_star_escapes_in_strings() {
        let (tok, handler) = lex_one("\"hi*n*e\"");
        assert!(!handler.has_errors());
        assert_eq!(tok.kind, TokenKind::StringLit);
    }

    #[test]
    fn unknown_escape_in_string_is_an_error() {
        let (_, handler) = lex_one("\"*q\"");
        assert!(handler.has_errors());
    }

    #[test]
    fn single_char_constant_packs_into_low_byte() {
        let (tok, _) = lex_one("'a'");
        assert_eq!(tok.kind, TokenKind::CharConst);
        assert_eq!(tok.value, b'a' as i64);
    }

    #[test]
    fn multi_char_constant_packs_first_byte_low() {
        let (tok, _) = lex_one("'ab'");
        assert_eq!(tok.value, (b'a' as i64) | ((b'b' as i64) << 8));
    }

    #[test]
    fn four_char_constant_fills_the_word() {
        let (tok, _) = lex_one("'abcd'");
        let expected = (b'a' as i64) | ((b'b' as i64) << 8) | ((b'c' as i64) << 16) | ((b'd' as i64) << 24);
        assert_eq!(tok.value, expected);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let (_, handler) = lex_one("\"never closed");
        assert!(handler.has_errors());
    }
}
