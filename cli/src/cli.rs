use std::path::PathBuf;

use clap::Parser;

use imgconv_core::config::ConvertConfig;

/// Convert every image of one format under a directory tree to another format
#[derive(Debug, Parser)]
#[command(name = "imgconv", version, about)]
pub struct Cli {
    /// Directory to convert (a single file also works)
    pub image_dir: PathBuf,

    /// Input file extension <png, jpeg, jpg>
    #[arg(short, long, value_name = "EXT", default_value = "jpg")]
    pub input: String,

    /// Output file extension <png, jpeg, jpg, gif>
    #[arg(short, long, value_name = "EXT", default_value = "png")]
    pub output: String,

    /// Directory to write output files to, mirroring the input tree
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Output encoding quality, higher is better <1-100>; other values use the default
    #[arg(short, long, default_value_t = 75, allow_negative_numbers = true)]
    pub quality: i32,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be done without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Convert files in parallel
    #[arg(short = 'j', long)]
    pub parallel: bool,

    /// Stop at the first file that fails to convert
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    pub fn to_config(&self) -> ConvertConfig {
        ConvertConfig {
            input_ext: normalize_ext(&self.input),
            output_ext: normalize_ext(&self.output),
            quality: self.quality,
            output_dir: self.dir.clone(),
            dry_run: self.dry_run,
            parallel: self.parallel,
            fail_fast: self.fail_fast,
        }
    }
}

/// Extension flags are case-insensitive and may be given with a leading dot.
fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
