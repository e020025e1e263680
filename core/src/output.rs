//! Collision-free output naming.
//!
//! A converted file never replaces an existing entry. The first candidate is
//! `base + ext`; after that ` (2)`, ` (3)`, ... is inserted before the
//! extension until a free name is found.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

/// An output file that has been created and is ready to be written.
#[derive(Debug)]
pub struct OutputFile {
    pub path: PathBuf,
    pub file: File,
}

/// Drop the extension of an input path, keeping its directory component.
pub fn strip_extension(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Candidate number `n` for `base`; `n < 2` is the undecorated name.
fn candidate(base: &Path, n: u64, ext: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    if n >= 2 {
        name.push(format!(" ({})", n));
    }
    name.push(ext);
    PathBuf::from(name)
}

/// Find the first candidate path with no filesystem entry behind it.
///
/// `ext` includes the leading dot. Nothing is created: in a concurrent
/// setting use [`reserve_output_path`] instead.
pub fn resolve_output_path(base: &Path, ext: &str) -> Result<PathBuf, ConvertError> {
    let mut n = 1;
    loop {
        let path = candidate(base, n, ext);
        // symlink_metadata so that a dangling link still counts as taken
        match fs::symlink_metadata(&path) {
            Ok(_) => n += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(path),
            Err(e) => return Err(ConvertError::PathCheck { path, source: e }),
        }
    }
}

/// Like [`resolve_output_path`], but claims the name with an exclusive create
/// so that two workers can never pick the same one.
pub fn reserve_output_path(base: &Path, ext: &str) -> Result<OutputFile, ConvertError> {
    let mut n = 1;
    loop {
        let path = candidate(base, n, ext);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok(OutputFile { path, file }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(ConvertError::PathCheck { path, source: e }),
        }
    }
}

/// Create the output file at a path returned by [`resolve_output_path`].
pub fn create_output(path: PathBuf) -> Result<OutputFile, ConvertError> {
    match File::create(&path) {
        Ok(file) => Ok(OutputFile { path, file }),
        Err(e) => Err(ConvertError::WriteFile { path, source: e }),
    }
}
