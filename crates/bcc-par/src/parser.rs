//! Recursive-descent parser with Pratt precedence climbing for binary
//! operators. Look-ahead is a small buffered window of already-lexed
//! tokens (`buf`/`cursor`) rather than a cloned lexer, so distinguishing a
//! label from an expression statement costs one extra `peek_at(1)` instead
//! of lexer-state duplication.

use bcc_lex::{Lexer, Token, TokenKind};
use bcc_util::{Arena, DiagnosticBuilder, ErrorCode, Span, Symbol};

use crate::ast::*;

pub struct Parser<'a, 'h> {
    arena: &'a Arena,
    lexer: Lexer<'a, 'h>,
    buf: Vec<Token>,
    cursor: usize,
    switch_depth: u32,
}

type PResult<T> = Result<T, ()>;

impl<'a, 'h> Parser<'a, 'h> {
    pub fn new(arena: &'a Arena, lexer: Lexer<'a, 'h>) -> Self {
        Parser {
            arena,
            lexer,
            buf: Vec::new(),
            cursor: 0,
            switch_depth: 0,
        }
    }

    pub fn parse_program(mut self) -> Program<'a> {
        let mut items = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            if self.lexer.handler_mut().has_errors() {
                break;
            }
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(()) => break,
            }
        }
        Program { items }
    }

    // ---- token buffer -------------------------------------------------

    fn fill_to(&mut self, idx: usize) {
        while self.buf.len() <= idx {
            let t = self.lexer.next_token();
            self.buf.push(t);
        }
    }

    fn peek_at(&mut self, k: usize) -> Token {
        self.fill_to(self.cursor + k);
        self.buf[self.cursor + k]
    }

    fn peek(&mut self) -> Token {
        self.peek_at(0)
    }

    fn bump(&mut self) -> Token {
        let t = self.peek();
        self.cursor += 1;
        t
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, err: ErrorCode, msg: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            self.error(err, msg);
            Err(())
        }
    }

    fn error(&mut self, code: ErrorCode, msg: impl Into<String>) {
        let span = self.peek().span;
        DiagnosticBuilder::error_with_message(code, msg)
            .span(span)
            .emit(self.lexer.handler_mut());
    }

    fn ident_symbol(&mut self, tok: Token) -> Symbol {
        tok.text.expect("Ident token always carries interned text")
    }

    // ---- top level ------------------------------------------------------

    fn parse_item(&mut self) -> PResult<Item<'a>> {
        if self.eat(TokenKind::KwExtrn) {
            return self.parse_extern_decl();
        }
        if self.eat(TokenKind::KwAuto) {
            let decl = self.parse_declarator()?;
            self.expect(TokenKind::Semicolon, ErrorCode::BadStmt, "expected ';' after global auto declaration")?;
            return Ok(Item::GlobalAuto(decl));
        }
        let name_tok = self.expect(TokenKind::Ident, ErrorCode::BadExternDef, "expected a top-level name")?;
        let name = self.ident_symbol(name_tok);

        if self.check(TokenKind::LParen) {
            return self.parse_function(name, name_tok.span);
        }

        self.parse_extern_def(name, name_tok.span)
    }

    fn parse_extern_decl(&mut self) -> PResult<Item<'a>> {
        let mut names = Vec::new();
        loop {
            let tok = self.expect(TokenKind::Ident, ErrorCode::BadExternDef, "expected a name after 'extrn'")?;
            names.push(self.ident_symbol(tok));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, ErrorCode::BadStmt, "expected ';' after extrn declaration")?;
        Ok(Item::ExternDecl(self.arena.alloc_slice(&names)))
    }

    fn parse_function(&mut self, name: Symbol, start: Span) -> PResult<Item<'a>> {
        self.bump(); // '('
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let tok = self.expect(TokenKind::Ident, ErrorCode::BadExternDef, "expected a parameter name")?;
                params.push(self.ident_symbol(tok));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, ErrorCode::UnmatchedParen, "expected ')' after parameter list")?;
        let body = self.parse_stmt()?;
        let span = start.to(body.span);
        Ok(Item::Function(Function {
            name,
            params: self.arena.alloc_slice(&params),
            body,
            span,
        }))
    }

    fn parse_extern_def(&mut self, name: Symbol, start: Span) -> PResult<Item<'a>> {
        if self.eat(TokenKind::LBracket) {
            let bound = if self.check(TokenKind::RBracket) {
                None
            } else {
                Some(&*self.parse_assign()?)
            };
            self.expect(TokenKind::RBracket, ErrorCode::UnmatchedBracket, "expected ']' after vector bound")?;
            let init = self.parse_optional_initializer_list()?;
            self.expect(TokenKind::Semicolon, ErrorCode::BadExternDef, "expected ';' after vector definition")?;
            return Ok(Item::ExternDef(ExternDef {
                name,
                kind: ExternKind::Vector,
                bound,
                init,
                implicit_static: false,
                span: start,
            }));
        }

        if self.check(TokenKind::LBrace) {
            let init = self.parse_optional_initializer_list()?;
            self.expect(TokenKind::Semicolon, ErrorCode::BadExternDef, "expected ';' after blob definition")?;
            return Ok(Item::ExternDef(ExternDef {
                name,
                kind: ExternKind::Blob,
                bound: None,
                init,
                implicit_static: false,
                span: start,
            }));
        }

        // B-style scalar with comma-separated ivals: `name ival, ival ...;`
        let mut ivals = Vec::new();
        if !self.check(TokenKind::Semicolon) {
            loop {
                ivals.push(Initializer::Expr(self.parse_assign()?));
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::Semicolon, ErrorCode::BadExternDef, "expected ';' after external definition")?;
        let init = match ivals.len() {
            0 => None,
            1 => Some(ivals[0]),
            _ => Some(Initializer::List(self.arena.alloc_slice(&ivals))),
        };
        Ok(Item::ExternDef(ExternDef {
            name,
            kind: ExternKind::Scalar,
            bound: None,
            init,
            implicit_static: false,
            span: start,
        }))
    }

    fn parse_optional_initializer_list(&mut self) -> PResult<Option<Initializer<'a>>> {
        if !self.eat(TokenKind::LBrace) {
            return Ok(None);
        }
        let mut items = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                items.push(self.parse_initializer()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, ErrorCode::UnmatchedBrace, "expected '}' after initializer list")?;
        Ok(Some(Initializer::List(self.arena.alloc_slice(&items))))
    }

    fn parse_initializer(&mut self) -> PResult<Initializer<'a>> {
        if self.check(TokenKind::LBrace) {
            return Ok(self.parse_optional_initializer_list()?.expect("saw '{'"));
        }
        Ok(Initializer::Expr(self.parse_assign()?))
    }

    fn parse_declarator(&mut self) -> PResult<Declarator<'a>> {
        let tok = self.expect(TokenKind::Ident, ErrorCode::BadStmt, "expected a declarator name")?;
        let name = self.ident_symbol(tok);
        let mut span = tok.span;
        let vector_size = if self.eat(TokenKind::LBracket) {
            let size = if self.check(TokenKind::RBracket) {
                None
            } else {
                Some(&*self.parse_assign()?)
            };
            let close = self.expect(TokenKind::RBracket, ErrorCode::UnmatchedBracket, "expected ']' after declarator bound")?;
            span = span.to(close.span);
            size
        } else {
            None
        };
        Ok(Declarator { name, vector_size, span })
    }

    // ---- statements -------------------------------------------------------

    fn parse_stmt(&mut self) -> PResult<&'a Stmt<'a>> {
        let tok = self.peek();
        let stmt = match tok.kind {
            TokenKind::Semicolon => {
                self.bump();
                Stmt { kind: StmtKind::Empty, span: tok.span }
            }
            TokenKind::LBrace => self.parse_block()?,
            TokenKind::KwAuto => self.parse_auto_stmt()?,
            TokenKind::KwExtrn => self.parse_extern_stmt()?,
            TokenKind::KwIf => self.parse_if_stmt()?,
            TokenKind::KwWhile => self.parse_while_stmt()?,
            TokenKind::KwReturn => self.parse_return_stmt()?,
            TokenKind::KwGoto => self.parse_goto_stmt()?,
            TokenKind::KwSwitch => self.parse_switch_stmt()?,
            TokenKind::KwCase => self.parse_case_stmt()?,
            TokenKind::KwDefault => self.parse_default_stmt()?,
            TokenKind::Ident if self.peek_at(1).kind == TokenKind::Colon => self.parse_label_stmt()?,
            _ => {
                let expr = self.parse_expr()?;
                let semi = self.expect(TokenKind::Semicolon, ErrorCode::BadStmt, "expected ';' after expression statement")?;
                Stmt { kind: StmtKind::Expr(expr), span: expr.span.to(semi.span) }
            }
        };
        Ok(self.arena.alloc(stmt))
    }

    fn parse_block(&mut self) -> PResult<Stmt<'a>> {
        let open = self.bump();
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        let close = self.expect(TokenKind::RBrace, ErrorCode::UnmatchedBrace, "expected '}' to close block")?;
        Ok(Stmt {
            kind: StmtKind::Block(self.arena.alloc_slice(&stmts)),
            span: open.span.to(close.span),
        })
    }

    fn parse_auto_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        let mut decls = Vec::new();
        loop {
            decls.push(self.parse_declarator()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let semi = self.expect(TokenKind::Semicolon, ErrorCode::BadStmt, "expected ';' after auto declaration")?;
        Ok(Stmt {
            kind: StmtKind::Auto(self.arena.alloc_slice(&decls)),
            span: start.to(semi.span),
        })
    }

    fn parse_extern_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        let mut names = Vec::new();
        loop {
            let tok = self.expect(TokenKind::Ident, ErrorCode::BadStmt, "expected a name after 'extrn'")?;
            names.push(self.ident_symbol(tok));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let semi = self.expect(TokenKind::Semicolon, ErrorCode::BadStmt, "expected ';' after extrn declaration")?;
        Ok(Stmt {
            kind: StmtKind::Extern(self.arena.alloc_slice(&names)),
            span: start.to(semi.span),
        })
    }

    fn parse_if_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        self.expect(TokenKind::LParen, ErrorCode::UnmatchedParen, "expected '(' after 'if'")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, ErrorCode::UnmatchedParen, "expected ')' after if condition")?;
        let then_branch = self.parse_stmt()?;
        let mut span = start.to(then_branch.span);
        let else_branch = if self.eat(TokenKind::KwElse) {
            let e = self.parse_stmt()?;
            span = span.to(e.span);
            Some(e)
        } else {
            None
        };
        Ok(Stmt { kind: StmtKind::If(cond, then_branch, else_branch), span })
    }

    fn parse_while_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        self.expect(TokenKind::LParen, ErrorCode::UnmatchedParen, "expected '(' after 'while'")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, ErrorCode::UnmatchedParen, "expected ')' after while condition")?;
        let body = self.parse_stmt()?;
        Ok(Stmt { kind: StmtKind::While(cond, body), span: start.to(body.span) })
    }

    fn parse_return_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else if self.eat(TokenKind::LParen) {
            let e = self.parse_expr()?;
            self.expect(TokenKind::RParen, ErrorCode::UnmatchedParen, "expected ')' after return value")?;
            Some(&*e)
        } else {
            Some(&*self.parse_expr()?)
        };
        let semi = self.expect(TokenKind::Semicolon, ErrorCode::BadStmt, "expected ';' after return")?;
        Ok(Stmt { kind: StmtKind::Return(value), span: start.to(semi.span) })
    }

    fn parse_goto_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        let tok = self.expect(TokenKind::Ident, ErrorCode::BadStmt, "expected a label name after 'goto'")?;
        let semi = self.expect(TokenKind::Semicolon, ErrorCode::BadStmt, "expected ';' after goto")?;
        Ok(Stmt { kind: StmtKind::Goto(self.ident_symbol(tok)), span: start.to(semi.span) })
    }

    fn parse_label_stmt(&mut self) -> PResult<Stmt<'a>> {
        let tok = self.bump();
        self.bump(); // ':'
        let name = self.ident_symbol(tok);
        let body = self.parse_stmt()?;
        Ok(Stmt { kind: StmtKind::Label(name, body), span: tok.span.to(body.span) })
    }

    fn parse_switch_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        self.expect(TokenKind::LParen, ErrorCode::UnmatchedParen, "expected '(' after 'switch'")?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::RParen, ErrorCode::UnmatchedParen, "expected ')' after switch value")?;
        self.switch_depth += 1;
        let body = self.parse_stmt();
        self.switch_depth -= 1;
        let body = body?;
        Ok(Stmt { kind: StmtKind::Switch(value, body), span: start.to(body.span) })
    }

    fn parse_case_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        if self.switch_depth == 0 {
            self.error(ErrorCode::BadStmt, "'case' outside of a switch");
            return Err(());
        }
        let bound = self.parse_case_bound()?;
        self.expect(TokenKind::Colon, ErrorCode::BadStmt, "expected ':' after case value")?;
        let body = self.parse_stmt()?;
        Ok(Stmt { kind: StmtKind::Case(bound, body), span: start.to(body.span) })
    }

    fn parse_default_stmt(&mut self) -> PResult<Stmt<'a>> {
        let start = self.bump().span;
        if self.switch_depth == 0 {
            self.error(ErrorCode::BadStmt, "'default' outside of a switch");
            return Err(());
        }
        self.expect(TokenKind::Colon, ErrorCode::BadStmt, "expected ':' after 'default'")?;
        let body = self.parse_stmt()?;
        Ok(Stmt { kind: StmtKind::Case(CaseBound::Default, body), span: start.to(body.span) })
    }

    /// `case N:` is the common form; `case <N:`, `case <=N:`, etc. select
    /// the historical relational extension, and `case lo..hi:` selects a
    /// range.
    fn parse_case_bound(&mut self) -> PResult<CaseBound<'a>> {
        let rel = match self.peek().kind {
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Ge => Some(BinOp::Ge),
            _ => None,
        };
        if let Some(op) = rel {
            self.bump();
            let bound = self.parse_assign()?;
            return Ok(CaseBound::Relational(op, bound));
        }
        let bound = self.parse_assign()?;
        if self.check(TokenKind::DotDot) {
            self.bump();
            let hi = self.parse_assign()?;
            return Ok(CaseBound::Range(bound, hi));
        }
        Ok(CaseBound::Equals(bound))
    }

    // ---- expressions ----------------------------------------------------

    fn parse_expr(&mut self) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_assign()?;
        while self.check(TokenKind::Comma) {
            self.bump();
            let rhs = self.parse_assign()?;
            let span = lhs.span.to(rhs.span);
            lhs = self.arena.alloc(Expr { kind: ExprKind::Comma(lhs, rhs), span });
        }
        Ok(lhs)
    }

    fn parse_assign(&mut self) -> PResult<&'a Expr<'a>> {
        let lhs = self.parse_ternary()?;
        let tok = self.peek();
        if tok.kind.is_assign_op() {
            if !lhs.is_lvalue() {
                self.error(ErrorCode::NotAnLvalue, "left side of an assignment must be an lvalue");
                return Err(());
            }
            self.bump();
            let op = assign_op_for(tok.kind);
            let rhs = self.parse_assign()?;
            let span = lhs.span.to(rhs.span);
            return Ok(self.arena.alloc(Expr { kind: ExprKind::Assign(op, lhs, rhs), span }));
        }
        Ok(lhs)
    }

    fn parse_ternary(&mut self) -> PResult<&'a Expr<'a>> {
        let cond = self.parse_binary(4)?;
        if self.eat(TokenKind::Question) {
            let then_branch = self.parse_assign()?;
            self.expect(TokenKind::Colon, ErrorCode::BadExpr, "expected ':' in conditional expression")?;
            let else_branch = self.parse_ternary()?;
            let span = cond.span.to(else_branch.span);
            return Ok(self.arena.alloc(Expr {
                kind: ExprKind::Ternary(cond, then_branch, else_branch),
                span,
            }));
        }
        Ok(cond)
    }

    /// Precedence-climbing over levels 4 (`||`) through 10 (binary `&`).
    fn parse_binary(&mut self, min_level: u8) -> PResult<&'a Expr<'a>> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some((level, op)) = bin_op_info(self.peek().kind) else { break };
            if level < min_level {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(level + 1)?;
            let span = lhs.span.to(rhs.span);
            lhs = self.arena.alloc(Expr { kind: ExprKind::Binary(op, lhs, rhs), span });
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<&'a Expr<'a>> {
        let tok = self.peek();
        let op = match tok.kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Star => Some(UnaryOp::Deref),
            TokenKind::Amp => Some(UnaryOp::AddrOf),
            TokenKind::Inc => Some(UnaryOp::PreInc),
            TokenKind::Dec => Some(UnaryOp::PreDec),
            _ => None,
        };
        let Some(op) = op else { return self.parse_postfix() };
        self.bump();
        let operand = self.parse_unary()?;
        if matches!(op, UnaryOp::AddrOf | UnaryOp::PreInc | UnaryOp::PreDec) && !operand.is_lvalue() {
            self.error(ErrorCode::NotAnLvalue, "operand must be an lvalue");
            return Err(());
        }
        let span = tok.span.to(operand.span);
        Ok(self.arena.alloc(Expr { kind: ExprKind::Unary(op, operand), span }))
    }

    fn parse_postfix(&mut self) -> PResult<&'a Expr<'a>> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    if !self.check(TokenKind::RParen) {
                        loop {
                            args.push(&*self.parse_assign()?);
                            if !self.eat(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    let close = self.expect(TokenKind::RParen, ErrorCode::UnmatchedParen, "expected ')' after call arguments")?;
                    let span = expr.span.to(close.span);
                    expr = self.arena.alloc(Expr { kind: ExprKind::Call(expr, self.arena.alloc_slice(&args)), span });
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    let close = self.expect(TokenKind::RBracket, ErrorCode::UnmatchedBracket, "expected ']' after index")?;
                    let span = expr.span.to(close.span);
                    expr = self.arena.alloc(Expr { kind: ExprKind::Index(expr, index), span });
                }
                TokenKind::Inc | TokenKind::Dec => {
                    if !expr.is_lvalue() {
                        self.error(ErrorCode::NotAnLvalue, "operand of postfix '++'/'--' must be an lvalue");
                        return Err(());
                    }
                    let postfix_op = if self.peek().kind == TokenKind::Inc { PostfixOp::PostInc } else { PostfixOp::PostDec };
                    let tok = self.bump();
                    let span = expr.span.to(tok.span);
                    expr = self.arena.alloc(Expr { kind: ExprKind::Postfix(postfix_op, expr), span });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<&'a Expr<'a>> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Number => {
                self.bump();
                Ok(self.arena.alloc(Expr { kind: ExprKind::Number(tok.value), span: tok.span }))
            }
            TokenKind::CharConst => {
                self.bump();
                Ok(self.arena.alloc(Expr { kind: ExprKind::CharConst(tok.value), span: tok.span }))
            }
            TokenKind::StringLit => {
                self.bump();
                Ok(self.arena.alloc(Expr {
                    kind: ExprKind::StringLit(tok.text.expect("string literal always carries interned text")),
                    span: tok.span,
                }))
            }
            TokenKind::Ident => {
                self.bump();
                Ok(self.arena.alloc(Expr { kind: ExprKind::Var(self.ident_symbol(tok)), span: tok.span }))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, ErrorCode::UnmatchedParen, "expected ')'")?;
                Ok(inner)
            }
            _ => {
                self.error(ErrorCode::BadExpr, "expected an expression");
                Err(())
            }
        }
    }
}

fn assign_op_for(kind: TokenKind) -> AssignOp {
    use TokenKind::*;
    match kind {
        Assign => AssignOp::Assign,
        AssignAdd => AssignOp::Add,
        AssignSub => AssignOp::Sub,
        AssignMul => AssignOp::Mul,
        AssignDiv => AssignOp::Div,
        AssignMod => AssignOp::Mod,
        AssignAnd => AssignOp::And,
        AssignOr => AssignOp::Or,
        AssignShl => AssignOp::Shl,
        AssignShr => AssignOp::Shr,
        AssignLt => AssignOp::Lt,
        AssignLe => AssignOp::Le,
        AssignGt => AssignOp::Gt,
        AssignGe => AssignOp::Ge,
        AssignEq => AssignOp::Eq,
        AssignNe => AssignOp::Ne,
        _ => unreachable!("assign_op_for called on a non-assign token"),
    }
}

/// Returns `(precedence level, operator)` for tokens that can appear at
/// binary-operator levels 4 through 10.
fn bin_op_info(kind: TokenKind) -> Option<(u8, BinOp)> {
    use TokenKind::*;
    Some(match kind {
        OrOr => (4, BinOp::OrOr),
        EqEq => (5, BinOp::Eq),
        NotEq => (5, BinOp::Ne),
        Lt => (6, BinOp::Lt),
        Le => (6, BinOp::Le),
        Gt => (6, BinOp::Gt),
        Ge => (6, BinOp::Ge),
        Plus => (7, BinOp::Add),
        Minus => (7, BinOp::Sub),
        Shl => (7, BinOp::Shl),
        Shr => (7, BinOp::Shr),
        Star => (8, BinOp::Mul),
        Slash => (8, BinOp::Div),
        Percent => (8, BinOp::Mod),
        Pipe => (9, BinOp::BitOr),
        Amp => (10, BinOp::BitAnd),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_util::{FileId, Handler, Idx, Interner};

    /// Parses `$source` and runs `$body` with `program` and `handler` bound,
    /// all within one scope so the arena-tied `Program` never needs to
    /// escape a helper function's lifetime.
    macro_rules! parse_ok {
        ($source:expr, |$program:ident, $handler:ident| $body:block) => {{
            let arena = Arena::new();
            let mut handler = Handler::new();
            let interner = Interner::new();
            let file = FileId::from_usize(0);
            let lexer = Lexer::new($source, file, &mut handler, &interner);
            let parser = Parser::new(&arena, lexer);
            let $program = parser.parse_program();
            assert!(!handler.has_errors(), "unexpected parse errors for: {}", $source);
            let $handler = &handler;
            $body
        }};
    }

    #[test]
    fn parses_return_42() {
        parse_ok!("main() { return(42); }", |program, _handler| {
            assert_eq!(program.items.len(), 1);
            match &program.items[0] {
                Item::Function(f) => assert_eq!(f.params.len(), 0),
                _ => panic!("expected a function item"),
            }
        });
    }

    #[test]
    fn precedence_climbing_matches_the_table() {
        // `+` (level 7) binds tighter than `==` (level 5): `a == b + c`
        // parses as `a == (b + c)`.
        parse_ok!("f() { return(a == b + c); }", |program, _handler| {
            let Item::Function(f) = &program.items[0] else { panic!() };
            let StmtKind::Return(Some(expr)) = f.body.kind else { panic!() };
            let ExprKind::Binary(BinOp::Eq, _, rhs) = expr.kind else { panic!("expected top-level ==") };
            assert!(matches!(rhs.kind, ExprKind::Binary(BinOp::Add, _, _)));
        });
    }

    #[test]
    fn assignment_is_right_associative() {
        parse_ok!("f() { a = b = 1; }", |program, _handler| {
            let Item::Function(f) = &program.items[0] else { panic!() };
            let StmtKind::Block(stmts) = f.body.kind else { panic!() };
            let StmtKind::Expr(expr) = stmts[0].kind else { panic!() };
            let ExprKind::Assign(AssignOp::Assign, _, rhs) = expr.kind else { panic!() };
            assert!(matches!(rhs.kind, ExprKind::Assign(AssignOp::Assign, _, _)));
        });
    }

    #[test]
    fn assigning_to_a_non_lvalue_is_an_error() {
        let arena = Arena::new();
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let lexer = Lexer::new("f() { 1 = 2; }", file, &mut handler, &interner);
        let parser = Parser::new(&arena, lexer);
        parser.parse_program();
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics()[0].code, Some(ErrorCode::NotAnLvalue));
    }

    #[test]
    fn case_outside_switch_is_an_error() {
        let arena = Arena::new();
        let mut handler = Handler::new();
        let interner = Interner::new();
        let file = FileId::from_usize(0);
        let lexer = Lexer::new("f() { case 1: ; }", file, &mut handler, &interner);
        let parser = Parser::new(&arena, lexer);
        parser.parse_program();
        assert!(handler.has_errors());
    }

    #[test]
    fn parses_switch_with_fallthrough_cases() {
        parse_ok!(
            "main() { auto n; n = 0; switch(2) { case 1: n =+ 1; case 2: n =+ 10; case 3: n =+ 100; } return(n); }",
            |program, _handler| {
                let Item::Function(f) = &program.items[0] else { panic!() };
                let StmtKind::Block(stmts) = f.body.kind else { panic!() };
                assert!(stmts.iter().any(|s| matches!(s.kind, StmtKind::Switch(_, _))));
            }
        );
    }

    #[test]
    fn parses_case_range_bound() {
        parse_ok!(
            "main() { auto n; switch(n) { case 1..3: n = 1; default: n = 0; } return(n); }",
            |program, _handler| {
                let Item::Function(f) = &program.items[0] else { panic!() };
                let StmtKind::Block(stmts) = f.body.kind else { panic!() };
                let switch_stmt = stmts.iter().find(|s| matches!(s.kind, StmtKind::Switch(_, _))).unwrap();
                let StmtKind::Switch(_, body) = switch_stmt.kind else { panic!() };
                let StmtKind::Block(inner) = body.kind else { panic!() };
                let StmtKind::Case(bound, _) = inner[0].kind else { panic!("expected a case statement") };
                assert!(matches!(bound, CaseBound::Range(_, _)));
            }
        );
    }

    #[test]
    fn parses_vector_extern_definition() {
        parse_ok!("v[10];", |program, _handler| {
            match &program.items[0] {
                Item::ExternDef(def) => assert_eq!(def.kind, ExternKind::Vector),
                _ => panic!("expected an extern vector definition"),
            }
        });
    }

    #[test]
    fn relational_assign_family_round_trips() {
        parse_ok!("f() { a =< b; }", |program, _handler| {
            let Item::Function(f) = &program.items[0] else { panic!() };
            let StmtKind::Block(stmts) = f.body.kind else { panic!() };
            let StmtKind::Expr(expr) = stmts[0].kind else { panic!() };
            assert!(matches!(expr.kind, ExprKind::Assign(AssignOp::Lt, _, _)));
        });
    }
}
