//! The `bcc` command-line driver: argument parsing, configuration layering,
//! operator-facing logging, and orchestration of the lex/parse/analyse/emit
//! pipeline plus the hand-off to the host C compiler.

mod cli;
mod config;
mod error;
mod logging;
mod session;

pub use cli::Cli;
pub use config::{Config, FileConfig};
pub use error::{DriverError, DriverResult};
pub use session::{Output, Session};

use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;

/// Parses arguments, runs the pipeline, and returns the process exit code.
/// Usage errors (bad flags, missing input, an unreadable config) map to 2;
/// a fatal diagnostic from the pipeline maps to 1; success is 0.
pub fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("error: {e}");
        return 2;
    }

    match try_run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

fn try_run(cli: &Cli) -> DriverResult<i32> {
    let file_config = FileConfig::load(cli.config.as_deref())?;
    let config = Config::merge(file_config, cli)?;
    let session = Session::new(config);

    let output = session.run(cli)?;
    let c = match output {
        Output::Done => return Ok(0),
        Output::GeneratedC(c) => c,
    };

    if cli.emit_stdout {
        println!("{c}");
        return Ok(0);
    }

    if cli.emit_file {
        let path = cli.output.clone().unwrap_or_else(|| cli.input.with_extension("c"));
        write_file(&path, &c)?;
        return Ok(0);
    }

    let c_path = cli.input.with_extension("c");
    write_file(&c_path, &c)?;

    let mut args = vec!["-std=c99"];
    if session.config().debug_info {
        args.push("-g");
    }

    if cli.object_only {
        let out = cli.output.clone().unwrap_or_else(|| cli.input.with_extension("o"));
        args.push("-c");
        args.push(c_path.to_str().unwrap_or_default());
        args.push("-o");
        args.push(out.to_str().unwrap_or_default());
        run_host_compiler(&args, &c_path)?;
        return Ok(0);
    }

    let out = cli.output.clone().unwrap_or_else(|| stem(&cli.input));
    args.push(c_path.to_str().unwrap_or_default());
    args.push("-o");
    args.push(out.to_str().unwrap_or_default());
    run_host_compiler(&args, &c_path)?;
    Ok(0)
}

fn stem(input: &Path) -> PathBuf {
    match input.file_stem() {
        Some(s) => PathBuf::from(s),
        None => PathBuf::from("a.out"),
    }
}

fn write_file(path: &Path, contents: &str) -> DriverResult<()> {
    std::fs::write(path, contents).map_err(|source| DriverError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Invokes the host C compiler (`$CC`, or `cc` if unset) on the generated
/// translation unit. On failure the generated C is left on disk so the
/// developer can inspect it, per the error-handling design.
fn run_host_compiler(args: &[&str], generated_c: &Path) -> DriverResult<()> {
    let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());
    tracing::info!(cc = %cc, "invoking host compiler");
    let status = Command::new(&cc).args(args).status().map_err(DriverError::HostCompilerUnavailable)?;
    if !status.success() {
        return Err(DriverError::HostCompilerFailed(generated_c.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_drops_the_extension() {
        assert_eq!(stem(Path::new("src/main.b")), PathBuf::from("main"));
    }

    #[test]
    fn stem_falls_back_when_there_is_no_file_name() {
        assert_eq!(stem(Path::new("/")), PathBuf::from("a.out"));
    }
}
