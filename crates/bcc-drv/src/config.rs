//! Layered configuration: built-in defaults, then an optional `bcc.toml`
//! project file, then command-line flags -- each layer overriding the last.
//! The merged result is constructed once per invocation and threaded by
//! reference through the pipeline; there is no global mutable config state.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::{Cli, WordArg};
use crate::error::{DriverError, DriverResult};

pub const CONFIG_FILE_NAME: &str = "bcc.toml";

/// The subset of settings a `bcc.toml` may override. Every field is
/// optional so a project file only needs to mention what it changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub word: Option<String>,
    pub byteptr: Option<bool>,
    pub wall: Option<bool>,
    pub werror: Option<bool>,
    pub verbose_errors: Option<bool>,
    pub no_line: Option<bool>,
    pub include: Option<Vec<PathBuf>>,
}

impl FileConfig {
    /// Loads `bcc.toml` from an explicit path, or falls back to searching
    /// the current directory, the user's config directory, then the
    /// system config directory. Returns the default (empty) config if none
    /// is found anywhere.
    pub fn load(explicit: Option<&Path>) -> DriverResult<Self> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => match Self::find() {
                Some(path) => Self::load_from_path(&path),
                None => Ok(FileConfig::default()),
            },
        }
    }

    fn load_from_path(path: &Path) -> DriverResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| DriverError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find() -> Option<PathBuf> {
        let here = PathBuf::from(CONFIG_FILE_NAME);
        if here.exists() {
            return Some(here);
        }
        if let Some(dir) = dirs::home_dir() {
            let path = dir.join(".config").join("bcc").join(CONFIG_FILE_NAME);
            if path.exists() {
                return Some(path);
            }
        }
        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("bcc").join(CONFIG_FILE_NAME);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

/// The fully merged configuration a compilation session runs with.
#[derive(Debug, Clone)]
pub struct Config {
    pub word: bcc_gen::WordWidth,
    pub pointer_model: bcc_gen::PointerModel,
    pub wall: bool,
    pub werror: bool,
    pub verbose_errors: bool,
    pub no_line: bool,
    pub debug_info: bool,
    pub include: Vec<PathBuf>,
}

impl Config {
    /// Merges the file layer under the CLI layer: any flag the user
    /// actually passed wins, otherwise the project file's value is used,
    /// otherwise the built-in default applies.
    pub fn merge(file: FileConfig, cli: &Cli) -> DriverResult<Self> {
        let byteptr = cli.byteptr || file.byteptr.unwrap_or(false);
        let pointer_model = if byteptr {
            bcc_gen::PointerModel::Byte
        } else {
            bcc_gen::PointerModel::Word
        };

        let word = if cli.word != WordArg::Host {
            cli.word.into()
        } else {
            match file.word.as_deref() {
                Some("16") => bcc_gen::WordWidth::W16,
                Some("32") => bcc_gen::WordWidth::W32,
                Some("host") | None => bcc_gen::WordWidth::Host,
                Some(other) => return Err(DriverError::Usage(format!("unknown word width in bcc.toml: {other}"))),
            }
        };

        let mut include = file.include.unwrap_or_default();
        include.extend(cli.include.iter().cloned());

        Ok(Config {
            word,
            pointer_model,
            wall: cli.wall || file.wall.unwrap_or(false),
            werror: cli.werror || file.werror.unwrap_or(false),
            verbose_errors: cli.verbose_errors || file.verbose_errors.unwrap_or(false),
            no_line: cli.no_line || file.no_line.unwrap_or(false),
            debug_info: cli.debug_info,
            include,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["bcc"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn cli_word_flag_overrides_file_config() {
        let file = FileConfig {
            word: Some("32".to_string()),
            ..Default::default()
        };
        let merged = Config::merge(file, &cli(&["main.b", "--word", "16"])).unwrap();
        assert_eq!(merged.word, bcc_gen::WordWidth::W16);
    }

    #[test]
    fn file_config_applies_when_cli_is_silent() {
        let file = FileConfig {
            word: Some("32".to_string()),
            wall: Some(true),
            ..Default::default()
        };
        let merged = Config::merge(file, &cli(&["main.b"])).unwrap();
        assert_eq!(merged.word, bcc_gen::WordWidth::W32);
        assert!(merged.wall);
    }

    #[test]
    fn defaults_are_word_pointer_model_and_host_width() {
        let merged = Config::merge(FileConfig::default(), &cli(&["main.b"])).unwrap();
        assert_eq!(merged.pointer_model, bcc_gen::PointerModel::Word);
        assert_eq!(merged.word, bcc_gen::WordWidth::Host);
    }

    #[test]
    fn include_paths_from_file_and_cli_are_concatenated() {
        let file = FileConfig {
            include: Some(vec![PathBuf::from("vendor")]),
            ..Default::default()
        };
        let merged = Config::merge(file, &cli(&["main.b", "-I", "lib"])).unwrap();
        assert_eq!(merged.include, vec![PathBuf::from("vendor"), PathBuf::from("lib")]);
    }
}
