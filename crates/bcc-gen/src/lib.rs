//! Direct-to-C emitter. Walks a parsed, semantically checked program and
//! renders a self-contained C translation unit: word-arithmetic macros,
//! the pointer-model macros, the string-literal pool, global storage, an
//! `__b_init` function for top-level initializers, every function body,
//! and a `main` wrapper that packs `argv` and calls the user's `main`.
//!
//! There is no intermediate representation between the AST and the
//! rendered C text -- every node is emitted directly.

mod config;
mod error;
mod expr;
mod init;
mod mangle;
mod preamble;
mod stmt;
mod strings;

pub use config::{PointerModel, WordWidth};
pub use error::{GenError, GenResult};

use bcc_par::ast::{Item, Program};
use bcc_util::{Interner, Span, Symbol};

use mangle::Mangler;
use strings::StringPool;

pub struct Emitter<'i> {
    interner: &'i Interner,
    width: WordWidth,
    ptr_model: PointerModel,
    mangler: Mangler,
    strings: StringPool,
    switch_counter: u32,
    edge_counter: u32,
    /// Path rendered into `#line` directives; only read when `no_line` is
    /// false.
    source_path: String,
    /// Suppresses `#line` emission (`--no-line`), for reproducible output
    /// when the host compiler's diagnostics pointing back at the `.b`
    /// source aren't wanted.
    no_line: bool,
}

/// Renders `program` as a complete C translation unit. `source_path` is the
/// name `#line` directives point back at; pass `no_line = true` to suppress
/// them entirely.
pub fn emit_program(
    program: &Program,
    interner: &Interner,
    width: WordWidth,
    ptr_model: PointerModel,
    source_path: &str,
    no_line: bool,
) -> GenResult<String> {
    let mut emitter = Emitter {
        interner,
        width,
        ptr_model,
        mangler: Mangler::new(),
        strings: StringPool::new(),
        switch_counter: 0,
        edge_counter: 0,
        source_path: source_path.to_string(),
        no_line,
    };
    emitter.run(program)
}

impl<'i> Emitter<'i> {
    #[cfg(test)]
    fn for_test(interner: &'i Interner, width: WordWidth, ptr_model: PointerModel) -> Self {
        Emitter {
            interner,
            width,
            ptr_model,
            mangler: Mangler::new(),
            strings: StringPool::new(),
            switch_counter: 0,
            edge_counter: 0,
            source_path: "t.b".to_string(),
            no_line: true,
        }
    }

    fn run(&mut self, program: &Program) -> GenResult<String> {
        self.collect_strings(program);

        let mut out = String::new();
        preamble::emit_preamble(&mut out, self.width, self.ptr_model);
        out.push('\n');
        self.strings.emit(&mut out, self.word_bytes());
        out.push('\n');

        let mut main_fn = None;
        for item in &program.items {
            if let Item::Function(f) = item {
                if self.interner.resolve(f.name) == "main" {
                    main_fn = Some(f.name);
                }
                out.push_str(&self.function_prototype(f));
                out.push_str(";\n");
            }
        }
        out.push('\n');

        for item in &program.items {
            match item {
                Item::GlobalAuto(d) => out.push_str(&self.emit_global_auto(d)?),
                Item::ExternDef(def) => out.push_str(&self.emit_extern_def(def)?),
                Item::ExternDecl(names) => {
                    for &name in *names {
                        if bcc_util::is_runtime_intrinsic(&self.name(name)) {
                            continue;
                        }
                        let name = self.mangled(name);
                        out.push_str(&format!("extern word {name};\n"));
                    }
                }
                Item::Function(_) => {}
            }
        }
        out.push('\n');

        out.push_str(&init::emit_b_init(self, program)?);
        out.push('\n');

        for item in &program.items {
            if let Item::Function(f) = item {
                out.push_str(&self.function_prototype(f));
                out.push_str(" {\n");
                out.push_str(&self.line_directive(f.body.span));
                out.push_str(&stmt::emit_function_body(self, f.body));
                out.push_str("}\n\n");
            }
        }

        out.push_str(&self.emit_main_wrapper(main_fn));
        Ok(out)
    }

    fn word_bytes(&self) -> usize {
        (self.width.bits() / 8) as usize
    }

    fn name(&self, sym: Symbol) -> String {
        self.interner.resolve(sym)
    }

    fn mangled(&mut self, sym: Symbol) -> String {
        let text = self.interner.resolve(sym);
        self.mangler.mangle(&text)
    }

    /// A `#line` directive pointing at `span`'s line in the original `.b`
    /// source, or an empty string when directives are suppressed.
    pub(crate) fn line_directive(&self, span: Span) -> String {
        if self.no_line {
            return String::new();
        }
        let escaped = self.source_path.replace('\\', "\\\\").replace('"', "\\\"");
        format!("#line {} \"{}\"\n", span.line, escaped)
    }

    fn function_prototype(&mut self, f: &bcc_par::ast::Function) -> String {
        let name = self.mangled(f.name);
        let params: Vec<String> = f.params.iter().map(|&p| format!("word {}", self.mangled(p))).collect();
        if params.is_empty() {
            format!("word {name}(void)")
        } else {
            format!("word {name}({})", params.join(", "))
        }
    }

    /// `main(argc, argv)` stashes the argument vector for `b_argc`/`b_argv`,
    /// runs `__b_init`, then calls the user's `main` (renamed, since the
    /// wrapper owns the C entry point) and maps its word result to an exit
    /// code.
    fn emit_main_wrapper(&mut self, main_fn: Option<Symbol>) -> String {
        let call = match main_fn {
            Some(name) => {
                let name = self.mangled(name);
                format!("(int)WVAL({name}())")
            }
            None => "0".to_string(),
        };
        format!(
            "int main(int argc, char **argv) {{\n\
             __b_setargs(argc, argv);\n\
             __b_init();\n\
             return {call};\n\
             }}\n"
        )
    }

    fn collect_strings(&mut self, program: &Program) {
        for item in &program.items {
            match item {
                Item::Function(f) => self.collect_strings_stmt(f.body),
                Item::ExternDef(def) => {
                    if let Some(init) = &def.init {
                        self.collect_strings_init(init);
                    }
                }
                Item::GlobalAuto(_) | Item::ExternDecl(_) => {}
            }
        }
    }

    fn collect_strings_init(&mut self, init: &bcc_par::ast::Initializer) {
        match init {
            bcc_par::ast::Initializer::Expr(e) => self.collect_strings_expr(e),
            bcc_par::ast::Initializer::List(items) => {
                for item in *items {
                    self.collect_strings_init(item);
                }
            }
        }
    }

    fn collect_strings_stmt(&mut self, stmt: &bcc_par::ast::Stmt) {
        use bcc_par::ast::StmtKind::*;
        match stmt.kind {
            Empty | Extern(_) | Goto(_) => {}
            Block(stmts) => {
                for s in stmts {
                    self.collect_strings_stmt(s);
                }
            }
            Auto(decls) => {
                for d in decls {
                    if let Some(size) = d.vector_size {
                        self.collect_strings_expr(size);
                    }
                }
            }
            If(cond, then_b, else_b) => {
                self.collect_strings_expr(cond);
                self.collect_strings_stmt(then_b);
                if let Some(e) = else_b {
                    self.collect_strings_stmt(e);
                }
            }
            While(cond, body) => {
                self.collect_strings_expr(cond);
                self.collect_strings_stmt(body);
            }
            Return(Some(e)) => self.collect_strings_expr(e),
            Return(None) => {}
            Expr(e) => self.collect_strings_expr(e),
            Label(_, body) => self.collect_strings_stmt(body),
            Switch(value, body) => {
                self.collect_strings_expr(value);
                self.collect_strings_stmt(body);
            }
            Case(bound, body) => {
                use bcc_par::ast::CaseBound::*;
                match bound {
                    Default => {}
                    Equals(e) | Relational(_, e) => self.collect_strings_expr(e),
                    Range(lo, hi) => {
                        self.collect_strings_expr(lo);
                        self.collect_strings_expr(hi);
                    }
                }
                self.collect_strings_stmt(body);
            }
        }
    }

    fn collect_strings_expr(&mut self, expr: &bcc_par::ast::Expr) {
        use bcc_par::ast::ExprKind::*;
        match expr.kind {
            Number(_) | CharConst(_) | Var(_) => {}
            StringLit(sym) => {
                let text = self.interner.resolve(sym);
                self.strings.intern(&text);
            }
            Call(callee, args) => {
                self.collect_strings_expr(callee);
                for a in args {
                    self.collect_strings_expr(a);
                }
            }
            Index(base, index) => {
                self.collect_strings_expr(base);
                self.collect_strings_expr(index);
            }
            Unary(_, operand) | Postfix(_, operand) => self.collect_strings_expr(operand),
            Binary(_, lhs, rhs) | Comma(lhs, rhs) | Assign(_, lhs, rhs) => {
                self.collect_strings_expr(lhs);
                self.collect_strings_expr(rhs);
            }
            Ternary(c, t, e) => {
                self.collect_strings_expr(c);
                self.collect_strings_expr(t);
                self.collect_strings_expr(e);
            }
        }
    }
}
