//! Maps every B identifier to a unique C identifier.
//!
//! B identifiers are already C-identifier shaped (B has no identifier
//! characters C disallows), so mangling here is really just keyword
//! avoidance plus collision resolution -- but the table exists so the
//! property "same source name always yields the same mangled name, for the
//! lifetime of one translation unit" holds even if that ever changes.

use rustc_hash::FxHashMap;

use bcc_util::RUNTIME_INTRINSICS;

const C_RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "word", "uword", "main",
];

#[derive(Default)]
pub struct Mangler {
    mapping: FxHashMap<String, String>,
    used: FxHashMap<String, u32>,
}

impl Mangler {
    pub fn new() -> Self {
        Mangler::default()
    }

    /// Returns the mangled C name for `name`, computing and caching it on
    /// first use.
    pub fn mangle(&mut self, name: &str) -> String {
        if let Some(existing) = self.mapping.get(name) {
            return existing.clone();
        }
        let escaped = escape_non_identifier_chars(name);
        let base = if is_reserved(&escaped) { format!("b_{escaped}") } else { escaped };
        let mangled = self.resolve_collision(base);
        self.mapping.insert(name.to_string(), mangled.clone());
        mangled
    }

    fn resolve_collision(&mut self, base: String) -> String {
        let count = self.used.entry(base.clone()).or_insert(0);
        if *count == 0 {
            *count += 1;
            base
        } else {
            let n = *count;
            *count += 1;
            format!("{base}_{n}")
        }
    }
}

/// A name collides with the runtime's reserved surface if it's a C keyword,
/// a runtime intrinsic (declared by the included headers, e.g. libc's own
/// `putchar`), or that intrinsic's `b_`-prefixed entry point (declared in
/// the preamble's runtime prototypes).
fn is_reserved(name: &str) -> bool {
    if C_RESERVED.contains(&name) || RUNTIME_INTRINSICS.contains(&name) {
        return true;
    }
    if let Some(suffix) = name.strip_prefix("b_") {
        return RUNTIME_INTRINSICS.contains(&suffix);
    }
    false
}

fn escape_non_identifier_chars(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.char_indices() {
        let valid = c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit());
        if valid {
            out.push(c);
        } else {
            out.push_str(&format!("_x{:02x}", c as u32));
        }
    }
    if out.is_empty() || out.chars().next().unwrap().is_ascii_digit() {
        out.insert_str(0, "_");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle("counter"), "counter");
    }

    #[test]
    fn same_name_always_mangles_the_same() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle("x"), m.mangle("x"));
    }

    #[test]
    fn c_keyword_gets_a_b_prefix() {
        let mut m = Mangler::new();
        assert_eq!(m.mangle("return"), "b_return");
    }

    #[test]
    fn colliding_names_get_numeric_suffixes() {
        // `return` escapes to `b_return`, which collides with the B name
        // `b_return` itself (not reserved, so it mangles to its own text).
        let mut m = Mangler::new();
        let a = m.mangle("return");
        let b = m.mangle("b_return");
        assert_ne!(a, b);
    }

    #[test]
    fn runtime_intrinsic_name_gets_a_b_prefix() {
        // `putchar` is pulled in unprefixed by the included headers, so an
        // `auto putchar;` must not collide with libc's own declaration.
        let mut m = Mangler::new();
        assert_eq!(m.mangle("putchar"), "b_putchar");
    }

    #[test]
    fn b_prefixed_runtime_entry_point_is_also_reserved() {
        // `extrn b_putchar;` would otherwise collide with the prototype the
        // preamble declares for the intrinsic's own entry point.
        let mut m = Mangler::new();
        assert_eq!(m.mangle("b_putchar"), "b_b_putchar");
    }
}
