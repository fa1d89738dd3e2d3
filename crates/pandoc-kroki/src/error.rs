//! CLI error types.

use kroki_config::ConfigError;
use kroki_pandoc::FilterError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("failed to read pandoc JSON from stdin: {0}")]
    Input(#[source] serde_json::Error),

    #[error("failed to write pandoc JSON to stdout: {0}")]
    Output(#[source] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
