//! Statement emission, including the goto-dispatch lowering `switch` needs
//! since B's `switch` is just a multi-way `goto` with fall-through cases.

use bcc_par::ast::{BinOp, CaseBound, Declarator, Expr, Stmt, StmtKind};

use crate::Emitter;

/// Renders a function body, turning the last expression statement reached
/// in straight-line tail position into a `return`.
pub(crate) fn emit_function_body<'i>(emitter: &mut Emitter<'i>, body: &Stmt) -> String {
    emitter.emit_stmt(body, true)
}

impl<'i> Emitter<'i> {
    pub(crate) fn emit_stmt(&mut self, stmt: &Stmt, tail: bool) -> String {
        match stmt.kind {
            StmtKind::Empty => ";\n".to_string(),
            StmtKind::Block(stmts) => {
                let mut out = String::from("{\n");
                for (i, s) in stmts.iter().enumerate() {
                    let s_tail = tail && i + 1 == stmts.len();
                    out.push_str(&self.line_directive(s.span));
                    out.push_str(&self.emit_stmt(s, s_tail));
                }
                out.push_str("}\n");
                out
            }
            StmtKind::Auto(decls) => self.emit_auto(decls),
            StmtKind::Extern(_) => String::new(),
            StmtKind::If(cond, then_b, else_b) => {
                let cond = self.emit_expr(cond);
                let mut out = format!("if (({cond}) != 0) {}\n", self.emit_stmt(then_b, tail && else_b.is_none()));
                if let Some(e) = else_b {
                    out.push_str(&format!("else {}\n", self.emit_stmt(e, tail)));
                }
                out
            }
            StmtKind::While(cond, body) => {
                let cond = self.emit_expr(cond);
                format!("while (({cond}) != 0) {}\n", self.emit_stmt(body, false))
            }
            StmtKind::Return(value) => match value {
                Some(e) => {
                    let e = self.emit_expr(e);
                    format!("return ({e});\n")
                }
                None => "return 0;\n".to_string(),
            },
            StmtKind::Expr(e) => {
                let rendered = self.emit_expr(e);
                if tail {
                    format!("return ({rendered});\n")
                } else {
                    format!("({rendered});\n")
                }
            }
            StmtKind::Goto(label) => {
                let label = self.name(label);
                format!("goto L_{label};\n")
            }
            StmtKind::Label(name, body) => {
                let name = self.name(name);
                format!("L_{name}: {}\n", self.emit_stmt(body, tail))
            }
            StmtKind::Switch(value, body) => self.emit_switch(value, body),
            StmtKind::Case(_, _) => {
                // Only reachable if a `case` sits outside any `switch`,
                // which the semantic pass rejects upstream of codegen.
                String::new()
            }
        }
    }

    fn emit_auto(&mut self, decls: &[Declarator]) -> String {
        let mut out = String::new();
        for d in decls {
            let name = self.mangled(d.name);
            match d.vector_size {
                None => out.push_str(&format!("word {name};\n")),
                Some(size_expr) => {
                    let size = self.emit_expr(size_expr);
                    out.push_str(&format!("word {name}[({size}) + 1];\n"));
                }
            }
        }
        out
    }

    /// Lowers a `switch` to a `for(;;)` wrapping a `goto`-based dispatch:
    /// the body is emitted once with its case labels inlined, then a
    /// second, separate block tests the switch value against each case in
    /// source order and jumps to the matching label.
    fn emit_switch(&mut self, value: &Expr, body: &Stmt) -> String {
        let id = self.switch_counter;
        self.switch_counter += 1;

        let mut cases = Vec::new();
        collect_cases(body, &mut cases);

        let value = self.emit_expr(value);
        let var = format!("__bsw{id}_val");
        let dispatch_label = format!("__bsw{id}_dispatch");
        let end_label = format!("__bsw{id}_end");

        let mut case_idx = 0u32;
        let mut body_out = String::new();
        self.emit_switch_body(body, &mut body_out, id, &mut case_idx);

        let mut dispatch = String::new();
        let mut default_label = None;
        for (k, bound) in cases.iter().enumerate() {
            let case_label = format!("__bsw{id}_case{k}");
            match bound {
                CaseBound::Default => default_label = Some(case_label),
                CaseBound::Equals(e) => {
                    let e = self.emit_expr(e);
                    dispatch.push_str(&format!("if (({var}) == ({e})) goto {case_label};\n"));
                }
                CaseBound::Relational(op, e) => {
                    let e = self.emit_expr(e);
                    let cop = case_rel_c_op(*op);
                    dispatch.push_str(&format!("if (({var}) {cop} ({e})) goto {case_label};\n"));
                }
                CaseBound::Range(lo, hi) => {
                    let lo = self.emit_expr(lo);
                    let hi = self.emit_expr(hi);
                    dispatch.push_str(&format!("if (({var}) >= ({lo}) && ({var}) <= ({hi})) goto {case_label};\n"));
                }
            }
        }
        dispatch.push_str(&match &default_label {
            Some(l) => format!("goto {l};\n"),
            None => format!("goto {end_label};\n"),
        });

        format!(
            "for (;;) {{\n\
             word {var} = ({value});\n\
             goto {dispatch_label};\n\
             {body_out}\
             goto {end_label};\n\
             {dispatch_label}:\n\
             {dispatch}\
             goto {end_label};\n\
             {end_label}: break;\n\
             }}\n"
        )
    }

    /// Renders a switch body with case/default labels inlined immediately
    /// before the statement that follows them, preserving fall-through.
    /// `case_idx` assigns labels in the same source order `collect_cases`
    /// walks in, so the two stay in lockstep. Does not descend into a
    /// nested switch's own body -- that gets its own `emit_switch` call.
    fn emit_switch_body(&mut self, stmt: &Stmt, out: &mut String, id: u32, case_idx: &mut u32) {
        match stmt.kind {
            StmtKind::Block(stmts) => {
                out.push_str("{\n");
                for s in stmts {
                    self.emit_switch_body(s, out, id, case_idx);
                }
                out.push_str("}\n");
            }
            StmtKind::Case(_, body) => {
                let k = *case_idx;
                *case_idx += 1;
                out.push_str(&format!("__bsw{id}_case{k}: ;\n"));
                self.emit_switch_body(body, out, id, case_idx);
            }
            StmtKind::If(cond, then_b, else_b) => {
                let cond = self.emit_expr(cond);
                out.push_str(&format!("if (({cond}) != 0) {{\n"));
                self.emit_switch_body(then_b, out, id, case_idx);
                out.push_str("}\n");
                if let Some(e) = else_b {
                    out.push_str("else {\n");
                    self.emit_switch_body(e, out, id, case_idx);
                    out.push_str("}\n");
                }
            }
            StmtKind::Label(name, body) => {
                let name = self.name(name);
                out.push_str(&format!("L_{name}:\n"));
                self.emit_switch_body(body, out, id, case_idx);
            }
            StmtKind::While(cond, body) => {
                let cond = self.emit_expr(cond);
                out.push_str(&format!("while (({cond}) != 0) {{\n"));
                self.emit_switch_body(body, out, id, case_idx);
                out.push_str("}\n");
            }
            _ => out.push_str(&self.emit_stmt(stmt, false)),
        }
    }
}

fn case_rel_c_op(op: BinOp) -> &'static str {
    use BinOp::*;
    match op {
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
        Eq => "==",
        Ne => "!=",
        _ => unreachable!("non-relational BinOp in a case bound"),
    }
}

/// Collects every `case`/`default` bound reachable in a switch body in
/// source order, without descending into a nested switch's own body.
fn collect_cases<'a>(stmt: &'a Stmt<'a>, out: &mut Vec<CaseBound<'a>>) {
    match stmt.kind {
        StmtKind::Block(stmts) => {
            for s in stmts {
                collect_cases(s, out);
            }
        }
        StmtKind::Case(bound, body) => {
            out.push(bound);
            collect_cases(body, out);
        }
        StmtKind::If(_, then_b, else_b) => {
            collect_cases(then_b, out);
            if let Some(e) = else_b {
                collect_cases(e, out);
            }
        }
        StmtKind::Label(_, body) => collect_cases(body, out),
        StmtKind::While(_, body) => collect_cases(body, out),
        // A nested switch owns its own cases and gets its own dispatch.
        StmtKind::Switch(_, _) => {}
        _ => {}
    }
}
