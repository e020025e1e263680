use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BatchError;

/// Collect every file under `root` whose extension is exactly `ext`.
///
/// `root` may also be a single file. Entries are sorted by file name so the
/// conversion order, and therefore the ` (n)` numbering, is reproducible.
pub fn collect_files(root: &Path, ext: &str) -> Result<Vec<PathBuf>, BatchError> {
    if let Err(e) = fs::metadata(root) {
        return Err(if e.kind() == ErrorKind::NotFound {
            BatchError::MissingRoot(root.to_path_buf())
        } else {
            BatchError::RootAccess {
                path: root.to_path_buf(),
                source: e,
            }
        });
    }

    let wanted = OsStr::new(ext);
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension() == Some(wanted) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Output base (extension stripped) for `input_file`.
///
/// Without an output directory the base sits next to the input. With one, the
/// layout below `root` is mirrored inside it.
pub fn output_base(input_file: &Path, root: &Path, output_dir: Option<&Path>) -> PathBuf {
    let target = match output_dir {
        None => input_file.to_path_buf(),
        Some(out) => {
            let relative = match input_file.strip_prefix(root) {
                Ok(rel) if !rel.as_os_str().is_empty() => rel,
                // root is the file itself
                _ => input_file.file_name().map(Path::new).unwrap_or(input_file),
            };
            out.join(relative)
        }
    };
    imgconv_core::output::strip_extension(&target)
}
