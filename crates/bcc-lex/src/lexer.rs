//! Core lexer: dispatch by current byte, plus whitespace/comment skipping
//! and identifier/keyword recognition. Operator disambiguation, string and
//! character literals, and number lexing live in their own modules.

use bcc_util::{DiagnosticBuilder, ErrorCode, FileId, Handler, Interner, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a, 'h> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) handler: &'h mut Handler,
    pub(crate) interner: &'a Interner,
    pub(crate) file: FileId,
    pub(crate) token_start: usize,
    pub(crate) token_start_line: u32,
    pub(crate) token_start_column: u32,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

impl<'a, 'h> Lexer<'a, 'h> {
    pub fn new(source: &'a str, file: FileId, handler: &'h mut Handler, interner: &'a Interner) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            handler,
            interner,
            file,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, or `TokenKind::Eof` once input is exhausted.
    /// Whitespace and comments are skipped between calls.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.make(TokenKind::Eof);
        }

        let c = self.cursor.current();
        match c {
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b'?' => self.single(TokenKind::Question),
            b'"' => self.lex_string(),
            b'\'' => self.lex_char(),
            b'0'..=b'9' => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),
            b'=' => self.lex_equals(),
            b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'!' | b'<' | b'>' | b':' => self.lex_operator(),
            b'.' => self.lex_dot(),
            _ => {
                let text = (c as char).to_string();
                self.cursor.advance();
                self.report_error(ErrorCode::BadExpr, format!("unexpected character '{}'", text));
                let sym = self.interner.intern(&text);
                Token::with_text(TokenKind::Invalid, self.span(), sym)
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make(kind)
    }

    /// Exposes the handler this lexer reports through, so a caller that
    /// holds a `Lexer` as its only path to the diagnostic sink (the parser)
    /// can emit its own diagnostics without a second `&mut Handler`.
    pub fn handler_mut(&mut self) -> &mut Handler {
        self.handler
    }

    pub fn interner(&self) -> &'a Interner {
        self.interner
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub(crate) fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.span())
    }

    pub(crate) fn span(&self) -> Span {
        Span::new(
            self.file,
            self.token_start as u32,
            self.cursor.position() as u32,
            self.token_start_line,
            self.token_start_column,
        )
    }

    pub(crate) fn report_error(&mut self, code: ErrorCode, message: impl Into<String>) {
        DiagnosticBuilder::error_with_message(code, message)
            .span(self.span())
            .emit(self.handler);
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.cursor.advance();
                }
                b'/' if self.cursor.peek(1) == b'*' => {
                    self.skip_block_comment();
                }
                b'/' if self.cursor.peek(1) == b'/' => {
                    while !self.cursor.is_at_end() && self.cursor.current() != b'\n' {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_col = self.cursor.column();
        self.cursor.advance_n(2); // consume "/*"
        loop {
            if self.cursor.is_at_end() {
                let span = Span::new(self.file, start as u32, self.cursor.position() as u32, start_line, start_col);
                DiagnosticBuilder::error(ErrorCode::UnterminatedComment)
                    .span(span)
                    .emit(self.handler);
                return;
            }
            if self.cursor.current() == b'*' && self.cursor.peek(1) == b'/' {
                self.cursor.advance_n(2);
                return;
            }
            self.cursor.advance();
        }
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        if let Some(kw) = TokenKind::keyword(text) {
            return self.make(kw);
        }
        let sym = self.interner.intern(text);
        Token::with_text(TokenKind::Ident, self.span(), sym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_util::Idx;

    fn lex_all(source: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let mut lexer = Lexer::new(source, file, &mut handler, &interner);
        let mut kinds = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            kinds.push(tok.kind);
            if done {
                break;
            }
        }
        kinds
    }

    #[test]
    fn skips_whitespace_and_line_comments() {
        let kinds = lex_all("  x // comment\n  y\n");
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn skips_block_comments() {
        let kinds = lex_all("a /* multi\nline */ b");
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let mut lexer = Lexer::new("/* never closed", file, &mut handler, &interner);
        lexer.next_token();
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics()[0].code, Some(ErrorCode::UnterminatedComment));
    }

    #[test]
    fn recognizes_keywords_vs_identifiers() {
        let kinds = lex_all("auto extrn case default if else while switch goto return foo");
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwAuto,
                TokenKind::KwExtrn,
                TokenKind::KwCase,
                TokenKind::KwDefault,
                TokenKind::KwIf,
                TokenKind::KwElse,
                TokenKind::KwWhile,
                TokenKind::KwSwitch,
                TokenKind::KwGoto,
                TokenKind::KwReturn,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unknown_character_is_fatal_ex() {
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let mut lexer = Lexer::new("@", file, &mut handler, &interner);
        lexer.next_token();
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics()[0].code, Some(ErrorCode::BadExpr));
    }
}
