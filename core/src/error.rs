use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("encoding failed: {0}")]
    Encode(String),

    /// Read or write failure on a bare stream, before a path is attached.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The existence check for a candidate output path failed with something
    /// other than "not found", so the path may or may not be free.
    #[error("cannot check output path {path}: {source}")]
    PathCheck {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
