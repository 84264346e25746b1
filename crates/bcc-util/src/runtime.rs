//! The fixed set of B-facing names the runtime library provides. These are
//! never declared with `extrn` in B source -- they are recognised by name,
//! both so the semantic pass doesn't flag them as undefined and so the
//! emitter can route calls to them straight to the runtime's `b_`-prefixed
//! entry points instead of through the ordinary name mangler.

pub const RUNTIME_INTRINSICS: &[&str] = &[
    "putchar", "getchar", "putchr", "getchr", "putstr", "getstr", "flush", "print", "printf",
    "printn", "putnum", "open", "openr", "openw", "close", "read", "write", "creat", "seek",
    "alloc", "char", "lchar", "load", "store", "fork", "wait", "execl", "execv", "system", "exit",
    "abort", "usleep", "chdir", "chmod", "chown", "link", "unlink", "stat", "fstat", "makdir",
    "getuid", "setuid", "time", "ctime", "gtty", "stty", "intr", "callf", "argc", "argv", "reread",
];

pub fn is_runtime_intrinsic(name: &str) -> bool {
    RUNTIME_INTRINSICS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_a_few_representative_names() {
        assert!(is_runtime_intrinsic("putchar"));
        assert!(is_runtime_intrinsic("callf"));
        assert!(!is_runtime_intrinsic("counter"));
    }
}
