//! CLI error types.

use fjson_config::ConfigError;
use fjson_site::{LoadError, WriteError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Write(#[from] WriteError),

    #[error("{0} of {1} documents failed")]
    Build(usize, usize),
}
