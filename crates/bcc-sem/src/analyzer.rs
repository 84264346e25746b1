//! Two-pass semantic analysis: install top-level names, then walk
//! every function body resolving references, collecting implicit statics,
//! and checking call targets.

use bcc_par::ast::*;
use bcc_par::const_fold;
use bcc_util::{DiagnosticBuilder, ErrorCode, FileId, Span, Symbol};
use rustc_hash::FxHashSet;

use crate::scope::{ScopeTree, SymbolInfo, SymbolKind};

pub struct AnalysisResult {
    /// Names referenced as variables in some function body that resolved
    /// to neither a lexical binding nor the extern-names list, in
    /// first-encounter order.
    pub implicit_statics: Vec<Symbol>,
}

pub struct Analyzer<'h> {
    handler: &'h mut bcc_util::Handler,
    file: FileId,
    scopes: ScopeTree,
    /// Names pulled in by an `extrn` statement inside the function body
    /// currently being walked, or declared in file scope during pass one.
    extern_names: FxHashSet<Symbol>,
    implicit_statics: Vec<Symbol>,
    implicit_statics_seen: FxHashSet<Symbol>,
}

impl<'h> Analyzer<'h> {
    /// `interner` is used once here, to seed `extern_names` with the
    /// runtime library's B-facing entry points (`putchar`, `printf`,
    /// `callf`, ...) so references to them resolve without a matching
    /// `extrn` declaration in source.
    pub fn new(handler: &'h mut bcc_util::Handler, file: FileId, interner: &bcc_util::Interner) -> Self {
        let mut extern_names = FxHashSet::default();
        for &name in bcc_util::RUNTIME_INTRINSICS {
            extern_names.insert(interner.intern(name));
        }
        Analyzer {
            handler,
            file,
            scopes: ScopeTree::new(),
            extern_names,
            implicit_statics: Vec::new(),
            implicit_statics_seen: FxHashSet::default(),
        }
    }

    pub fn analyze<'a>(mut self, program: &mut Program<'a>) -> AnalysisResult {
        self.install_top_level(&program.items);
        if self.handler.has_errors() {
            return AnalysisResult { implicit_statics: self.implicit_statics };
        }
        for item in &program.items {
            if let Item::Function(f) = item {
                self.analyze_function(f);
                if self.handler.has_errors() {
                    break;
                }
            }
        }
        let synthetic_span = Span::point(self.file, 0, 0, 0);
        for name in &self.implicit_statics {
            program.items.push(Item::ExternDef(ExternDef {
                name: *name,
                kind: ExternKind::Scalar,
                bound: None,
                init: None,
                implicit_static: true,
                span: synthetic_span,
            }));
        }
        AnalysisResult { implicit_statics: self.implicit_statics }
    }

    fn install_top_level<'a>(&mut self, items: &[Item<'a>]) {
        for item in items {
            let (name, span) = match item {
                Item::GlobalAuto(d) => (d.name, d.span),
                Item::Function(f) => (f.name, f.span),
                Item::ExternDef(d) => (d.name, d.span),
                Item::ExternDecl(names) => {
                    let span = Span::point(self.file, 0, 0, 0);
                    for &name in *names {
                        self.extern_names.insert(name);
                        self.scopes.declare_root(name, SymbolInfo::new(SymbolKind::Variable, span));
                    }
                    continue;
                }
            };
            let kind = if matches!(item, Item::Function(_)) { SymbolKind::Function } else { SymbolKind::Variable };
            self.extern_names.insert(name);
            if let Some(prev) = self.scopes.declare_root(name, SymbolInfo::new(kind, span)) {
                let _ = prev;
                self.error_at(ErrorCode::Redeclared, span, "name already declared at file scope");
            }
            if let Item::ExternDef(def) = item {
                if def.kind == ExternKind::Vector {
                    if let Some(bound_expr) = def.bound {
                        match const_fold::fold_nonneg_bound(bound_expr) {
                            Ok(n) => {
                                if let Some(info) = self.scopes.resolve(name) {
                                    let mut info = *info;
                                    info.vector_bound = Some(n);
                                    self.scopes.declare_root(name, info);
                                }
                            }
                            Err(_) => self.error_at(ErrorCode::BadExternDef, span, "vector bound must fold to a non-negative constant"),
                        }
                    }
                }
            }
        }
    }

    fn analyze_function<'a>(&mut self, f: &Function<'a>) {
        self.scopes.push();
        for &param in f.params {
            self.scopes.declare(param, SymbolInfo::new(SymbolKind::Variable, f.span));
        }
        self.walk_stmt(f.body);
        self.scan_switch_fallthrough(f.body, false);
        self.scopes.pop();
    }

    fn walk_stmt<'a>(&mut self, stmt: &Stmt<'a>) {
        match stmt.kind {
            StmtKind::Empty | StmtKind::Goto(_) => {}
            StmtKind::Block(stmts) => {
                self.scopes.push();
                for s in stmts {
                    self.walk_stmt(s);
                }
                self.scopes.pop();
            }
            StmtKind::Auto(decls) => {
                for decl in decls {
                    if let Some(size) = decl.vector_size {
                        self.walk_expr(size);
                    }
                    if self.scopes.declare(decl.name, SymbolInfo::new(SymbolKind::Variable, decl.span)).is_some() {
                        self.error_at(ErrorCode::Redeclared, decl.span, "name already declared in this scope");
                    }
                }
            }
            StmtKind::Extern(names) => {
                for &name in names {
                    self.extern_names.insert(name);
                    if self.scopes.resolve(name).is_none() {
                        self.scopes.declare(name, SymbolInfo::new(SymbolKind::Variable, stmt.span));
                    }
                }
            }
            StmtKind::If(cond, then_b, else_b) => {
                self.walk_expr(cond);
                self.walk_stmt(then_b);
                if let Some(e) = else_b {
                    self.walk_stmt(e);
                }
            }
            StmtKind::While(cond, body) => {
                self.walk_expr(cond);
                self.walk_stmt(body);
            }
            StmtKind::Return(value) => {
                if let Some(e) = value {
                    self.walk_expr(e);
                }
            }
            StmtKind::Expr(e) => self.walk_expr(e),
            StmtKind::Label(_, body) => self.walk_stmt(body),
            StmtKind::Switch(value, body) => {
                self.walk_expr(value);
                self.walk_stmt(body);
            }
            StmtKind::Case(bound, body) => {
                match bound {
                    CaseBound::Default => {}
                    CaseBound::Equals(e) | CaseBound::Relational(_, e) => self.walk_expr(e),
                    CaseBound::Range(lo, hi) => {
                        self.walk_expr(lo);
                        self.walk_expr(hi);
                    }
                }
                self.walk_stmt(body);
            }
        }
    }

    fn walk_expr<'a>(&mut self, expr: &Expr<'a>) {
        match expr.kind {
            ExprKind::Number(_) | ExprKind::StringLit(_) | ExprKind::CharConst(_) => {}
            ExprKind::Var(name) => self.resolve_var(name),
            ExprKind::Call(callee, args) => {
                if let ExprKind::Var(name) = callee.kind {
                    self.check_call_target(name, callee.span);
                } else {
                    self.walk_expr(callee);
                }
                for a in args {
                    self.walk_expr(a);
                }
            }
            ExprKind::Index(base, index) => {
                self.walk_expr(base);
                self.walk_expr(index);
            }
            ExprKind::Unary(_, operand) | ExprKind::Postfix(_, operand) => self.walk_expr(operand),
            ExprKind::Binary(_, lhs, rhs) | ExprKind::Comma(lhs, rhs) => {
                self.walk_expr(lhs);
                self.walk_expr(rhs);
            }
            ExprKind::Assign(_, lhs, rhs) => {
                self.walk_expr(lhs);
                self.walk_expr(rhs);
            }
            ExprKind::Ternary(c, t, e) => {
                self.walk_expr(c);
                self.walk_expr(t);
                self.walk_expr(e);
            }
        }
    }

    fn resolve_var(&mut self, name: Symbol) {
        if self.scopes.resolve(name).is_some() {
            return;
        }
        if self.extern_names.contains(&name) {
            return;
        }
        if self.implicit_statics_seen.insert(name) {
            self.implicit_statics.push(name);
        }
    }

    fn check_call_target(&mut self, name: Symbol, span: Span) {
        if self.scopes.resolve(name).is_some() || self.extern_names.contains(&name) {
            return;
        }
        self.error_at(ErrorCode::Undefined, span, "call to an undeclared name");
    }

    /// Warns when a `case`/`default` label is immediately followed by
    /// another `case`/`default` with no statement between them. Descends
    /// into a nested switch's body too, since its own case labels are
    /// subject to the same rule, just checked against each other rather
    /// than against the outer switch's labels.
    fn scan_switch_fallthrough<'a>(&mut self, stmt: &Stmt<'a>, in_switch_body: bool) {
        match stmt.kind {
            StmtKind::Block(stmts) => {
                for s in stmts {
                    self.scan_switch_fallthrough(s, in_switch_body);
                }
            }
            StmtKind::If(_, then_b, else_b) => {
                self.scan_switch_fallthrough(then_b, in_switch_body);
                if let Some(e) = else_b {
                    self.scan_switch_fallthrough(e, in_switch_body);
                }
            }
            StmtKind::While(_, body) => self.scan_switch_fallthrough(body, in_switch_body),
            StmtKind::Label(_, body) => self.scan_switch_fallthrough(body, in_switch_body),
            StmtKind::Switch(_, body) => self.scan_switch_fallthrough(body, true),
            StmtKind::Case(_, body) if in_switch_body => {
                if matches!(body.kind, StmtKind::Case(_, _)) {
                    DiagnosticBuilder::warning("case label with no statement before the next case")
                        .span(stmt.span)
                        .emit(self.handler);
                }
                self.scan_switch_fallthrough(body, in_switch_body);
            }
            _ => {}
        }
    }

    fn error_at(&mut self, code: ErrorCode, span: Span, msg: impl Into<String>) {
        DiagnosticBuilder::error_with_message(code, msg).span(span).emit(self.handler);
    }
}
