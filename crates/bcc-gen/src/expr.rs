//! Expression emission. Every arithmetic/bitwise/shift result is routed
//! through the `W*` macros from the preamble so it can never trigger C
//! undefined behaviour regardless of the B-level operand values; every
//! lvalue mutation goes through a runtime helper that takes its address,
//! so the lvalue expression is only evaluated once.

use bcc_par::ast::{AssignOp, BinOp, Expr, ExprKind, PostfixOp, UnaryOp};

use crate::Emitter;

impl<'i> Emitter<'i> {
    pub(crate) fn emit_expr(&mut self, expr: &Expr) -> String {
        match expr.kind {
            ExprKind::Number(n) => format!("((word){n})"),
            ExprKind::CharConst(n) => format!("((word){n})"),
            ExprKind::StringLit(sym) => {
                let text = self.interner.resolve(sym);
                let id = self.strings.intern(&text);
                format!("B_PTR({})", crate::strings::StringPool::symbol_name(id))
            }
            ExprKind::Var(name) => self.emit_var(name),
            ExprKind::Call(callee, args) => self.emit_call(callee, args),
            ExprKind::Index(base, index) => {
                let base = self.emit_expr(base);
                let index = self.emit_expr(index);
                format!("B_DEREF(B_INDEX({base}, {index}))")
            }
            ExprKind::Unary(op, operand) => self.emit_unary(op, operand),
            ExprKind::Postfix(op, operand) => self.emit_postfix(op, operand),
            ExprKind::Binary(op, lhs, rhs) => self.emit_binary(op, lhs, rhs),
            ExprKind::Assign(op, lhs, rhs) => self.emit_assign(op, lhs, rhs),
            ExprKind::Ternary(c, t, e) => {
                let c = self.emit_expr(c);
                let t = self.emit_expr(t);
                let e = self.emit_expr(e);
                format!("((({c}) != 0) ? ({t}) : ({e}))")
            }
            ExprKind::Comma(lhs, rhs) => {
                let lhs = self.emit_expr(lhs);
                let rhs = self.emit_expr(rhs);
                format!("(({lhs}), ({rhs}))")
            }
        }
    }

    /// Renders `expr` as a C lvalue. Only called on expressions that
    /// passed `Expr::is_lvalue` during semantic analysis.
    pub(crate) fn emit_lvalue(&mut self, expr: &Expr) -> String {
        match expr.kind {
            ExprKind::Var(name) => self.mangled(name),
            ExprKind::Unary(UnaryOp::Deref, inner) => {
                let inner = self.emit_expr(inner);
                format!("B_DEREF({inner})")
            }
            ExprKind::Index(base, index) => {
                let base = self.emit_expr(base);
                let index = self.emit_expr(index);
                format!("B_DEREF(B_INDEX({base}, {index}))")
            }
            _ => unreachable!("non-lvalue expression reached emit_lvalue"),
        }
    }

    fn emit_var(&mut self, name: bcc_util::Symbol) -> String {
        let text = self.name(name);
        if bcc_util::is_runtime_intrinsic(&text) {
            format!("b_{text}")
        } else {
            self.mangled(name)
        }
    }

    fn emit_call(&mut self, callee: &Expr, args: &[&Expr]) -> String {
        if let ExprKind::Var(name) = callee.kind {
            let text = self.name(name);
            if bcc_util::is_runtime_intrinsic(&text) {
                return self.emit_runtime_call(&text, args);
            }
            let rendered_args: Vec<String> = args.iter().map(|a| self.emit_expr(a)).collect();
            let name = self.mangled(name);
            return format!("{name}({})", rendered_args.join(", "));
        }
        let rendered_args: Vec<String> = args.iter().map(|a| self.emit_expr(a)).collect();
        let callee = self.emit_expr(callee);
        format!("((word (*)())B_CPTR({callee}))({})", rendered_args.join(", "))
    }

    /// Routes a call to a B-facing runtime name straight to its `b_`
    /// entry point, bypassing the mangler entirely. `callf` is the one
    /// exception: its first argument names the function to dispatch to
    /// and the rest are forwarded, so it lowers to the dispatch shim with
    /// an explicit argument count ahead of them.
    fn emit_runtime_call(&mut self, name: &str, args: &[&Expr]) -> String {
        if name == "callf" {
            let rendered: Vec<String> = args.iter().map(|a| self.emit_expr(a)).collect();
            let count = rendered.len().saturating_sub(1);
            return match rendered.split_first() {
                Some((target, rest)) => {
                    let mut call = format!("b_callf_dispatch(((word){count}), {target}");
                    for a in rest {
                        call.push_str(", ");
                        call.push_str(a);
                    }
                    call.push(')');
                    call
                }
                None => "b_callf_dispatch(((word)0))".to_string(),
            };
        }
        let rendered: Vec<String> = args.iter().map(|a| self.emit_expr(a)).collect();
        format!("b_{name}({})", rendered.join(", "))
    }

    fn emit_unary(&mut self, op: UnaryOp, operand: &Expr) -> String {
        match op {
            UnaryOp::Neg => {
                let v = self.emit_expr(operand);
                format!("WNEG({v})")
            }
            UnaryOp::Not => {
                let v = self.emit_expr(operand);
                format!("((word)(({v}) == 0))")
            }
            UnaryOp::Deref => {
                let v = self.emit_expr(operand);
                format!("B_DEREF({v})")
            }
            UnaryOp::AddrOf => self.emit_addr_of(operand),
            UnaryOp::PreInc => {
                let lv = self.emit_lvalue(operand);
                format!("b_preinc(&({lv}))")
            }
            UnaryOp::PreDec => {
                let lv = self.emit_lvalue(operand);
                format!("b_predec(&({lv}))")
            }
        }
    }

    fn emit_addr_of(&mut self, operand: &Expr) -> String {
        match operand.kind {
            ExprKind::Var(name) => {
                let name = self.mangled(name);
                format!("B_ADDR({name})")
            }
            ExprKind::Unary(UnaryOp::Deref, inner) => self.emit_expr(inner),
            ExprKind::Index(base, index) => {
                let base = self.emit_expr(base);
                let index = self.emit_expr(index);
                format!("B_INDEX({base}, {index})")
            }
            _ => unreachable!("non-lvalue operand of & reached the emitter"),
        }
    }

    fn emit_postfix(&mut self, op: PostfixOp, operand: &Expr) -> String {
        let lv = self.emit_lvalue(operand);
        match op {
            PostfixOp::PostInc => format!("b_postinc(&({lv}))"),
            PostfixOp::PostDec => format!("b_postdec(&({lv}))"),
        }
    }

    fn emit_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> String {
        let l = self.emit_expr(lhs);
        let r = self.emit_expr(rhs);
        match op {
            BinOp::Add => format!("WVAL(WADD({l}, {r}))"),
            BinOp::Sub => format!("WVAL(WSUB({l}, {r}))"),
            BinOp::Mul => format!("WVAL(WMUL({l}, {r}))"),
            BinOp::Div => format!("WVAL(WDIV({l}, {r}))"),
            BinOp::Mod => format!("WVAL(WMOD({l}, {r}))"),
            BinOp::Shl => format!("WVAL(WSHL({l}, {r}))"),
            BinOp::Shr => format!("WVAL(WSHR({l}, {r}))"),
            BinOp::BitAnd => format!("WVAL(WAND({l}, {r}))"),
            BinOp::BitOr => format!("WVAL(WOR({l}, {r}))"),
            BinOp::Lt => format!("((word)(({l}) < ({r})))"),
            BinOp::Le => format!("((word)(({l}) <= ({r})))"),
            BinOp::Gt => format!("((word)(({l}) > ({r})))"),
            BinOp::Ge => format!("((word)(({l}) >= ({r})))"),
            BinOp::Eq => format!("((word)(({l}) == ({r})))"),
            BinOp::Ne => format!("((word)(({l}) != ({r})))"),
            BinOp::OrOr => format!("((word)((({l}) != 0) || (({r}) != 0)))"),
        }
    }

    fn emit_assign(&mut self, op: AssignOp, lhs: &Expr, rhs: &Expr) -> String {
        let lv = self.emit_lvalue(lhs);
        let rv = self.emit_expr(rhs);
        if let AssignOp::Assign = op {
            return format!("({lv} = ({rv}))");
        }
        if op.is_relational() {
            let cop = rel_c_op(op);
            return format!("({lv} = (word)(({lv}) {cop} ({rv})))");
        }
        let helper = compound_helper(op);
        format!("{helper}(&({lv}), {rv})")
    }
}

fn rel_c_op(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Lt => "<",
        AssignOp::Le => "<=",
        AssignOp::Gt => ">",
        AssignOp::Ge => ">=",
        AssignOp::Eq => "==",
        AssignOp::Ne => "!=",
        _ => unreachable!("non-relational AssignOp passed to rel_c_op"),
    }
}

fn compound_helper(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Add => "b_add_assign",
        AssignOp::Sub => "b_sub_assign",
        AssignOp::Mul => "b_mul_assign",
        AssignOp::Div => "b_div_assign",
        AssignOp::Mod => "b_mod_assign",
        AssignOp::And => "b_and_assign",
        AssignOp::Or => "b_or_assign",
        AssignOp::Shl => "b_lsh_assign",
        AssignOp::Shr => "b_rsh_assign",
        _ => unreachable!("non-compound AssignOp passed to compound_helper"),
    }
}

#[cfg(test)]
mod tests {
    use bcc_lex::Lexer;
    use bcc_par::{ast::ExprKind, Parser};
    use bcc_util::{Arena, FileId, Handler, Idx, Interner};

    use super::*;
    use crate::{PointerModel, WordWidth};

    fn parse_expr<'a>(arena: &'a Arena, src: &'a str, interner: &'a Interner) -> &'a Expr<'a> {
        let mut handler = Handler::new();
        let file = FileId::from_usize(0);
        let lexer = Lexer::new(src, file, &mut handler, interner);
        let parser = Parser::new(arena, lexer);
        let program = parser.parse_program();
        assert!(!handler.has_errors(), "unexpected parse errors for: {src}");
        match &program.items[0] {
            bcc_par::ast::Item::Function(f) => match f.body.kind {
                bcc_par::ast::StmtKind::Block(stmts) => match stmts[0].kind {
                    bcc_par::ast::StmtKind::Return(Some(e)) => e,
                    _ => panic!("expected a return statement"),
                },
                _ => panic!("expected a block body"),
            },
            _ => panic!("expected a function item"),
        }
    }

    fn emitter(interner: &Interner) -> Emitter<'_> {
        Emitter::for_test(interner, WordWidth::Host, PointerModel::Byte)
    }

    #[test]
    fn addition_routes_through_the_word_macro() {
        let arena = Arena::new();
        let interner = Interner::new();
        let e = parse_expr(&arena, "f() { return(1 + 2); }", &interner);
        let mut em = emitter(&interner);
        assert!(matches!(e.kind, ExprKind::Binary(BinOp::Add, _, _)));
        assert_eq!(em.emit_expr(e), "WVAL(WADD(((word)1), ((word)2)))");
    }

    #[test]
    fn preincrement_takes_the_address_of_the_lvalue() {
        let arena = Arena::new();
        let interner = Interner::new();
        let e = parse_expr(&arena, "f() { return(++x); }", &interner);
        let mut em = emitter(&interner);
        assert_eq!(em.emit_expr(e), "b_preinc(&(x))");
    }

    #[test]
    fn relational_assign_compares_and_reassigns() {
        let arena = Arena::new();
        let interner = Interner::new();
        let e = parse_expr(&arena, "f() { return(x =< y); }", &interner);
        let mut em = emitter(&interner);
        assert_eq!(em.emit_expr(e), "(x = (word)((x) < (y)))");
    }

    #[test]
    fn runtime_intrinsic_call_bypasses_the_mangler() {
        let arena = Arena::new();
        let interner = Interner::new();
        let e = parse_expr(&arena, "f() { return(putchar('a')); }", &interner);
        let mut em = emitter(&interner);
        assert_eq!(em.emit_expr(e), "b_putchar(((word)97))");
    }

    #[test]
    fn address_of_index_is_an_explicit_index_computation() {
        let arena = Arena::new();
        let interner = Interner::new();
        let e = parse_expr(&arena, "f() { return(&v[2]); }", &interner);
        let mut em = emitter(&interner);
        assert_eq!(em.emit_expr(e), "B_INDEX(v, ((word)2))");
    }
}
