//! String literal pool: every distinct literal is packed little-endian
//! into an array of words, EOT-terminated and zero-padded, and assigned an
//! id in first-encounter order so output stays deterministic.

use rustc_hash::FxHashMap;

const EOT: u8 = 0x04;

#[derive(Default)]
pub struct StringPool {
    order: Vec<String>,
    ids: FxHashMap<String, usize>,
}

impl StringPool {
    pub fn new() -> Self {
        StringPool::default()
    }

    /// Interns `text` into the pool, returning its id. Repeated calls with
    /// the same text return the same id.
    pub fn intern(&mut self, text: &str) -> usize {
        if let Some(&id) = self.ids.get(text) {
            return id;
        }
        let id = self.order.len();
        self.ids.insert(text.to_string(), id);
        self.order.push(text.to_string());
        id
    }

    pub fn symbol_name(id: usize) -> String {
        format!("__b_str{id}")
    }

    /// Emits one `static const word __b_strN[] = { ... };` per interned
    /// literal, packing the literal's bytes plus a trailing EOT into words
    /// least-significant-byte first.
    pub fn emit(&self, out: &mut String, word_bytes: usize) {
        for (id, text) in self.order.iter().enumerate() {
            let mut bytes: Vec<u8> = text.bytes().collect();
            bytes.push(EOT);
            while bytes.len() % word_bytes != 0 {
                bytes.push(0);
            }
            let words: Vec<String> = bytes
                .chunks(word_bytes)
                .map(|chunk| {
                    let mut w: u64 = 0;
                    for (i, &b) in chunk.iter().enumerate() {
                        w |= (b as u64) << (8 * i);
                    }
                    format!("(word){w}")
                })
                .collect();
            out.push_str(&format!(
                "static const word {}[] = {{ {} }};\n",
                Self::symbol_name(id),
                words.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_literal_shares_one_id() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern("hi"), pool.intern("hi"));
    }

    #[test]
    fn distinct_literals_get_increasing_ids_in_first_encounter_order() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern("a"), 0);
        assert_eq!(pool.intern("b"), 1);
        assert_eq!(pool.intern("a"), 0);
    }

    #[test]
    fn emitted_words_include_the_eot_terminator() {
        let mut pool = StringPool::new();
        pool.intern("Hi");
        let mut out = String::new();
        pool.emit(&mut out, 8);
        // 'H' = 0x48, 'i' = 0x69, EOT = 0x04, then zero padding to 8 bytes.
        let expected = 0x48u64 | (0x69 << 8) | (0x04 << 16);
        assert!(out.contains(&format!("(word){expected}")));
    }
}
