//! Command-line surface, parsed with `clap`'s derive API.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// A single-pass B-to-C compiler.
#[derive(Parser, Debug)]
#[command(name = "bcc")]
#[command(author, version, about = "Compiles B source to a C99 translation unit", long_about = None)]
pub struct Cli {
    /// B source file to compile
    pub input: PathBuf,

    /// Write the final output to this path
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Emit the translated C to stdout and stop before invoking the host compiler
    #[arg(short = 'S')]
    pub emit_stdout: bool,

    /// Stop after producing an object file
    #[arg(short = 'c')]
    pub object_only: bool,

    /// Emit the translated C to a file and stop before invoking the host compiler
    #[arg(short = 'E')]
    pub emit_file: bool,

    /// Pass `-g` through to the host C compiler, so its debugger info lines
    /// up with the `#line` directives in the generated C
    #[arg(short = 'g')]
    pub debug_info: bool,

    /// Enable the fallthrough-without-statement warning
    #[arg(long = "Wall")]
    pub wall: bool,

    /// Treat warnings as errors
    #[arg(long = "Werror")]
    pub werror: bool,

    /// Use the byte pointer model instead of the word pointer model
    #[arg(long)]
    pub byteptr: bool,

    /// Word width the emitted arithmetic is performed at
    #[arg(long = "word", value_enum, default_value_t = WordArg::Host)]
    pub word: WordArg,

    /// Print the token stream and stop
    #[arg(long)]
    pub dump_tokens: bool,

    /// Print the parsed AST and stop
    #[arg(long)]
    pub dump_ast: bool,

    /// Print the generated C to stderr before handing it to the host compiler
    #[arg(long)]
    pub dump_c: bool,

    /// Omit `#line` directives from the generated C
    #[arg(long = "no-line")]
    pub no_line: bool,

    /// Render diagnostics as `file:line:col: error: message` instead of the historic two-letter form
    #[arg(long)]
    pub verbose_errors: bool,

    /// Log operator-facing progress at DEBUG instead of INFO
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Explicit path to a `bcc.toml`, overriding the usual search
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Additional include search path (repeatable)
    #[arg(short = 'I', action = clap::ArgAction::Append)]
    pub include: Vec<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordArg {
    Host,
    #[value(name = "16")]
    W16,
    #[value(name = "32")]
    W32,
}

impl From<WordArg> for bcc_gen::WordWidth {
    fn from(w: WordArg) -> Self {
        match w {
            WordArg::Host => bcc_gen::WordWidth::Host,
            WordArg::W16 => bcc_gen::WordWidth::W16,
            WordArg::W32 => bcc_gen::WordWidth::W32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_host_word_width_and_word_pointer_model() {
        let cli = Cli::parse_from(["bcc", "main.b"]);
        assert_eq!(cli.word, WordArg::Host);
        assert!(!cli.byteptr);
    }

    #[test]
    fn dash_i_is_repeatable() {
        let cli = Cli::parse_from(["bcc", "main.b", "-I", "lib", "-I", "vendor"]);
        assert_eq!(cli.include, vec![PathBuf::from("lib"), PathBuf::from("vendor")]);
    }

    #[test]
    fn word_flag_selects_the_narrow_width() {
        let cli = Cli::parse_from(["bcc", "main.b", "--word", "16"]);
        assert_eq!(cli.word, WordArg::W16);
    }
}
