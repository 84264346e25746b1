//! The fixed header text every translation unit opens with: includes,
//! the `word`/`uword` typedefs, the word-arithmetic and pointer-model
//! macros, and the runtime function prototypes.

use crate::config::{PointerModel, WordWidth};

pub fn emit_preamble(out: &mut String, width: WordWidth, ptr_model: PointerModel) {
    out.push_str(HEADERS);
    out.push('\n');
    emit_word_typedefs(out, width);
    out.push('\n');
    emit_word_macros(out, width);
    out.push('\n');
    emit_pointer_macros(out, ptr_model);
    out.push('\n');
    out.push_str(RUNTIME_PROTOTYPES);
    out.push('\n');
}

const HEADERS: &str = r#"#include <stdint.h>
#include <stdio.h>
#include <stdlib.h>
#include <unistd.h>
#include <fcntl.h>
#include <termios.h>
#include <dlfcn.h>
#include <math.h>
"#;

fn emit_word_typedefs(out: &mut String, width: WordWidth) {
    match width {
        WordWidth::Host => {
            out.push_str("typedef intptr_t word;\n");
            out.push_str("typedef uintptr_t uword;\n");
        }
        WordWidth::W16 => {
            out.push_str("typedef int16_t word;\n");
            out.push_str("typedef uint16_t uword;\n");
        }
        WordWidth::W32 => {
            out.push_str("typedef int32_t word;\n");
            out.push_str("typedef uint32_t uword;\n");
        }
    }
}

/// Every arithmetic binary op runs through unsigned operands so no C
/// undefined behaviour (signed overflow, oversized shift count) is ever
/// reachable; `WVAL` reintroduces the sign at the end.
fn emit_word_macros(out: &mut String, width: WordWidth) {
    let bits = width.bits();
    let uty = width.unsigned_c_type();
    let sty = width.signed_c_type();
    out.push_str(&format!("#define SHIFT_MASK ((uword)({bits} - 1))\n"));
    out.push_str(&format!(
        "#define WVAL(x) (({sty})({uty})(x))\n\
         #define WADD(a, b) (({uty})(a) + ({uty})(b))\n\
         #define WSUB(a, b) (({uty})(a) - ({uty})(b))\n\
         #define WMUL(a, b) (({uty})(a) * ({uty})(b))\n\
         #define WDIV(a, b) (({uty})(a) / ({uty})(b))\n\
         #define WMOD(a, b) (({uty})(a) % ({uty})(b))\n\
         #define WSHL(a, b) (({uty})(a) << (({uty})(b) & SHIFT_MASK))\n\
         #define WSHR(a, b) (({uty})(a) >> (({uty})(b) & SHIFT_MASK))\n\
         #define WAND(a, b) (({uty})(a) & ({uty})(b))\n\
         #define WOR(a, b) (({uty})(a) | ({uty})(b))\n\
         #define WXOR(a, b) (({uty})(a) ^ ({uty})(b))\n\
         #define WNEG(a) WVAL(-({uty})(a))\n"
    ));
}

fn emit_pointer_macros(out: &mut String, ptr_model: PointerModel) {
    match ptr_model {
        PointerModel::Byte => {
            out.push_str(
                "#define B_PTR(p) ((word)(uintptr_t)(p))\n\
                 #define B_CPTR(w) ((void *)(uintptr_t)(word)(w))\n\
                 #define B_DEREF(w) (*(word *)(uintptr_t)(word)(w))\n\
                 #define B_ADDR(lv) ((word)(uintptr_t)&(lv))\n\
                 #define B_INDEX(base, i) ((word)(uintptr_t)((char *)(uintptr_t)(word)(base) + (word)(i) * (word)sizeof(word)))\n\
                 #define B_STR(w) ((char *)(uintptr_t)(word)(w))\n",
            );
        }
        PointerModel::Word => {
            out.push_str(
                "#define B_PTR(p) ((word)((uintptr_t)(p) / (uintptr_t)sizeof(word)))\n\
                 #define B_CPTR(w) ((void *)((uintptr_t)(word)(w) * (uintptr_t)sizeof(word)))\n\
                 #define B_DEREF(w) (*(word *)B_CPTR(w))\n\
                 #define B_ADDR(lv) B_PTR(&(lv))\n\
                 #define B_INDEX(base, i) ((word)(base) + (word)(i))\n\
                 #define B_STR(w) ((char *)B_CPTR(w))\n",
            );
        }
    }
}

const RUNTIME_PROTOTYPES: &str = r#"word b_putchar(word c);
word b_getchar(void);
word b_putchr(word c);
word b_getchr(void);
word b_putstr(word s);
word b_getstr(word s, word n);
word b_flush(void);
word b_print(word s);
word b_printf(word fmt, ...);
word b_printn(word n, word base);
word b_putnum(word n);
word b_open(word path, word mode);
word b_openr(word path);
word b_openw(word path);
word b_close(word fd);
word b_read(word fd, word buf, word n);
word b_write(word fd, word buf, word n);
word b_creat(word path, word mode);
word b_seek(word fd, word off, word whence);
word b_alloc(word n);
word b_char(word s, word i);
word b_lchar(word s, word i, word c);
word b_load(word addr);
word b_store(word addr, word val);
char *__b_cstr(word s);
char *__b_pack_cstr(word s, char *buf, word n);
word __b_bstr_to_cstr(word s, char *buf, word n);
word b_fork(void);
word b_wait(void);
word b_execl(word path, ...);
word b_execv(word path, word argv);
word b_system(word cmd);
word b_exit(word code);
word b_abort(void);
word b_usleep(word usec);
word b_chdir(word path);
word b_chmod(word path, word mode);
word b_chown(word path, word uid, word gid);
word b_link(word old, word new_);
word b_unlink(word path);
word b_stat(word path, word buf);
word b_fstat(word fd, word buf);
word b_makdir(word path, word mode);
word b_getuid(void);
word b_setuid(word uid);
word b_time(void);
word b_ctime(word t, word buf);
word b_gtty(word fd, word buf);
word b_stty(word fd, word buf);
word b_intr(word on);
word b_callf_dispatch(word n, word name, ...);
void __b_setargs(int argc, char **argv);
word b_argc(void);
word b_argv(word i);
word b_reread(void);
word b_preinc(word *lv);
word b_predec(word *lv);
word b_postinc(word *lv);
word b_postdec(word *lv);
word b_add_assign(word *lv, word rhs);
word b_sub_assign(word *lv, word rhs);
word b_mul_assign(word *lv, word rhs);
word b_div_assign(word *lv, word rhs);
word b_mod_assign(word *lv, word rhs);
word b_lsh_assign(word *lv, word rhs);
word b_rsh_assign(word *lv, word rhs);
word b_and_assign(word *lv, word rhs);
word b_or_assign(word *lv, word rhs);
word b_xor_assign(word *lv, word rhs);
"#;
