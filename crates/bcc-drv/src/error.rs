//! Driver-level errors: everything that can stop a run before or after the
//! compiler pipeline proper. Usage errors (bad flags, missing input, an
//! unreadable config) map to exit code 2; a fatal diagnostic from the
//! pipeline itself maps to exit code 1.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("compilation failed")]
    CompileFailed,

    #[error("host C compiler failed; generated translation unit left at {0}")]
    HostCompilerFailed(PathBuf),

    #[error("failed to invoke host C compiler: {0}")]
    HostCompilerUnavailable(#[source] std::io::Error),
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Exit code this error should produce at the process boundary.
impl DriverError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::CompileFailed | DriverError::HostCompilerFailed(_) => 1,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_failed_maps_to_exit_code_one() {
        assert_eq!(DriverError::CompileFailed.exit_code(), 1);
    }

    #[test]
    fn usage_error_maps_to_exit_code_two() {
        assert_eq!(DriverError::Usage("missing input file".into()).exit_code(), 2);
    }
}
