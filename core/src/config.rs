use std::path::PathBuf;

/// Settings for one conversion run, built once from the command line.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Extension of the files to convert, without the dot
    pub input_ext: String,
    /// Extension of the files to produce, without the dot
    pub output_ext: String,
    /// JPEG quality 1-100; anything else means "encoder default"
    pub quality: i32,
    /// Write outputs under this directory instead of next to the inputs
    pub output_dir: Option<PathBuf>,
    /// Print the planned conversions without writing anything
    pub dry_run: bool,
    /// Convert files on a thread pool
    pub parallel: bool,
    /// Stop at the first file that fails
    pub fail_fast: bool,
}

impl ConvertConfig {
    /// Output extension with its leading dot, as the path resolver expects it.
    pub fn output_suffix(&self) -> String {
        format!(".{}", self.output_ext)
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_ext: "jpg".into(),
            output_ext: "png".into(),
            quality: 75,
            output_dir: None,
            dry_run: false,
            parallel: false,
            fail_fast: false,
        }
    }
}
