//! Global storage declarations and the `__b_init` function that runs every
//! top-level initializer once, before `main` is called. A nested `{ ... }`
//! initializer (an "edge vector") materialises as its own backing array,
//! with the slot that names it holding a pointer to it.

use bcc_par::ast::{ExternDef, ExternKind, Initializer};
use bcc_par::const_fold;

use crate::error::{GenError, GenResult};
use crate::Emitter;

fn initializer_len(init: &Option<Initializer<'_>>) -> usize {
    match init {
        Some(Initializer::List(items)) => items.len(),
        Some(Initializer::Expr(_)) => 1,
        None => 0,
    }
}

impl<'i> Emitter<'i> {
    pub(crate) fn emit_global_auto(&mut self, d: &bcc_par::ast::Declarator) -> GenResult<String> {
        let name = self.mangled(d.name);
        match d.vector_size {
            None => Ok(format!("word {name};\n")),
            Some(bound_expr) => {
                let bound = const_fold::fold_nonneg_bound(bound_expr).map_err(|_| GenError::NonConstantBound)?;
                Ok(format!("word {name}[{}];\n", bound + 1))
            }
        }
    }

    pub(crate) fn emit_extern_def(&mut self, def: &ExternDef) -> GenResult<String> {
        let name = self.mangled(def.name);
        let storage = if def.implicit_static { "static " } else { "" };
        match def.kind {
            ExternKind::Scalar | ExternKind::Blob => Ok(format!("{storage}word {name};\n")),
            ExternKind::Vector => {
                let init_len = initializer_len(&def.init) as i64;
                let size = match def.bound {
                    Some(b) => {
                        let n = const_fold::fold_nonneg_bound(b).map_err(|_| GenError::NonConstantBound)?;
                        (n + 1).max(init_len)
                    }
                    None => {
                        if init_len == 0 {
                            return Err(GenError::UnsizedVector(self.name(def.name)));
                        }
                        init_len
                    }
                };
                Ok(format!("{storage}word {name}[{size}];\n"))
            }
        }
    }

    /// Flattens one initializer tree into the value its containing slot
    /// should hold. A plain expression renders directly; a nested list
    /// allocates a fresh backing array (declared into `storage`, filled by
    /// statements appended to `body`) and yields a pointer to it.
    fn flatten_initializer(&mut self, storage: &mut String, body: &mut String, init: &Initializer) -> String {
        match init {
            Initializer::Expr(e) => self.emit_expr(e),
            Initializer::List(items) => {
                let id = self.edge_counter;
                self.edge_counter += 1;
                let temp = format!("__b_edge{id}");
                storage.push_str(&format!("static word {temp}[{}];\n", items.len().max(1)));
                for (i, item) in items.iter().enumerate() {
                    let value = self.flatten_initializer(storage, body, item);
                    body.push_str(&format!("{temp}[{i}] = ({value});\n"));
                }
                format!("B_PTR({temp})")
            }
        }
    }
}

/// Renders the `__b_init` function that assigns every top-level
/// initializer, in program order, before `main` is invoked.
pub(crate) fn emit_b_init<'i>(emitter: &mut Emitter<'i>, program: &bcc_par::ast::Program) -> GenResult<String> {
    let mut storage = String::new();
    let mut body = String::new();
    for item in &program.items {
        if let bcc_par::ast::Item::ExternDef(def) = item {
            let init = match &def.init {
                Some(init) => init,
                None => continue,
            };
            let name = emitter.mangled(def.name);
            match def.kind {
                ExternKind::Vector => match init {
                    Initializer::List(items) => {
                        for (i, item) in items.iter().enumerate() {
                            let value = emitter.flatten_initializer(&mut storage, &mut body, item);
                            body.push_str(&format!("{name}[{i}] = ({value});\n"));
                        }
                    }
                    Initializer::Expr(e) => {
                        let value = emitter.emit_expr(e);
                        body.push_str(&format!("{name}[0] = ({value});\n"));
                    }
                },
                ExternKind::Scalar | ExternKind::Blob => {
                    let value = emitter.flatten_initializer(&mut storage, &mut body, init);
                    body.push_str(&format!("{name} = ({value});\n"));
                }
            }
        }
    }
    Ok(format!("{storage}void __b_init(void) {{\n{body}}}\n"))
}
