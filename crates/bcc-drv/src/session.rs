//! Wires the phases together for one invocation: read source, lex, parse,
//! analyse, emit C, then hand the C to the host compiler unless a dump
//! flag already satisfied the request. Per the single-`Compilation`-context
//! design this mirrors, a `Session` owns nothing beyond one run -- the
//! arena, interner, and source map are all fresh per invocation and dropped
//! when `run` returns.

use bcc_util::{Arena, DiagnosticBuilder, Handler, Interner, Register, SourceMap};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{DriverError, DriverResult};

/// What the pipeline produced. Dump flags (`--dump-tokens`, `--dump-ast`)
/// and `-E` satisfy the whole request themselves; otherwise the generated
/// C still needs to reach the host compiler.
pub enum Output {
    Done,
    GeneratedC(String),
}

pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, cli: &Cli) -> DriverResult<Output> {
        let path = &cli.input;
        tracing::info!(file = %path.display(), "reading source");
        let content = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
            path: path.clone(),
            source,
        })?;

        let mut sources = SourceMap::new();
        let file = sources.add_file(path.clone(), content.clone());
        let interner = Interner::new();
        let mut handler = Handler::new();

        tracing::info!("lexing");
        let lexer = bcc_lex::Lexer::new(&content, file, &mut handler, &interner);

        if cli.dump_tokens {
            return self.dump_tokens(lexer, &sources);
        }

        let arena = Arena::new();
        tracing::info!("parsing");
        let parser = bcc_par::Parser::new(&arena, lexer);
        let mut program = parser.parse_program();
        if handler.has_errors() {
            self.report(&handler, &sources);
            return Err(DriverError::CompileFailed);
        }

        if cli.dump_ast {
            println!("{:#?}", program);
            return Ok(Output::Done);
        }

        tracing::info!("running semantic analysis");
        let mut sem_handler = Handler::new();
        let analyzer = bcc_sem::Analyzer::new(&mut sem_handler, file, &interner);
        analyzer.analyze(&mut program);
        if sem_handler.has_errors() {
            self.report(&sem_handler, &sources);
            return Err(DriverError::CompileFailed);
        }

        tracing::info!(
            word = ?self.config.word,
            pointer_model = ?self.config.pointer_model,
            "generating C"
        );
        let source_path = cli.input.display().to_string();
        let c = match bcc_gen::emit_program(
            &program,
            &interner,
            self.config.word,
            self.config.pointer_model,
            &source_path,
            self.config.no_line,
        ) {
            Ok(c) => c,
            Err(e) => {
                let mut gen_handler = Handler::new();
                DiagnosticBuilder::fatal(e.to_string()).emit(&mut gen_handler);
                self.report(&gen_handler, &sources);
                return Err(DriverError::CompileFailed);
            }
        };

        if cli.dump_c {
            eprintln!("{c}");
        }

        Ok(Output::GeneratedC(c))
    }

    fn dump_tokens(&self, mut lexer: bcc_lex::Lexer, sources: &SourceMap) -> DriverResult<Output> {
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == bcc_lex::TokenKind::Eof;
            println!("{:?}", tok);
            if done {
                break;
            }
        }
        if lexer.handler_mut().has_errors() {
            self.report(lexer.handler_mut(), sources);
            return Err(DriverError::CompileFailed);
        }
        Ok(Output::Done)
    }

    fn report(&self, handler: &Handler, sources: &SourceMap) {
        let register = if self.config.verbose_errors {
            Register::Verbose
        } else {
            Register::Historic
        };
        let _ = handler.render(sources, register, &mut std::io::stderr());
    }
}
