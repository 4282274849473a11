use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DictError>;

#[derive(Debug, Error)]
pub enum DictError {
    /// Conversion refuses to guess a tone table.
    #[error("unsupported dialect '{0}' (expected 'siyen' or 'hoiliuk')")]
    UnsupportedDialect(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
