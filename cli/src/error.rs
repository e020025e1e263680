use std::path::PathBuf;
use thiserror::Error;

use imgconv_core::ConvertError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("{0}: no such file or directory")]
    MissingRoot(PathBuf),

    #[error("cannot access {path}: {source}")]
    RootAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        source: ConvertError,
    },
}
