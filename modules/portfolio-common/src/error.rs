use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourcerError>;

#[derive(Error, Debug)]
pub enum SourcerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SourcerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourcerError::Io {
            path: path.into(),
            source,
        }
    }
}
