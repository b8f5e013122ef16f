use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Media probe failed: {0}")]
    Probe(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Nothing to export")]
    NothingToExport,
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
