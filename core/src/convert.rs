use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::codec::{Decoder, Encoder};
use crate::error::ConvertError;
use crate::output::OutputFile;

/// Outcome of one successful file conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub original_size: u64,
    pub converted_size: u64,
}

/// Convert the file at `input`, writing to the file produced by `open_output`.
///
/// The input is read and decoded before `open_output` is called, so a missing
/// or corrupt input never leaves an empty output behind. Both files are closed
/// on every return path. If encoding fails the partially written output stays
/// on disk; removing it is up to the caller.
pub fn convert_file<F>(
    input: &Path,
    open_output: F,
    decoder: &dyn Decoder,
    encoder: &dyn Encoder,
) -> Result<Conversion, ConvertError>
where
    F: FnOnce() -> Result<OutputFile, ConvertError>,
{
    let data = fs::read(input).map_err(|e| ConvertError::ReadFile {
        path: input.to_path_buf(),
        source: e,
    })?;
    let original_size = data.len() as u64;

    let img = decoder.decode(&mut data.as_slice())?;
    drop(data);
    let (width, height) = img.dimensions();

    log::debug!(
        "Converting {}: {}x{} pixels {} to {}",
        input.display(),
        width,
        height,
        decoder.format().as_str(),
        encoder.format().as_str()
    );

    let OutputFile { path: output, file } = open_output()?;
    let write_err = |e| ConvertError::WriteFile {
        path: output.clone(),
        source: e,
    };

    let mut writer = BufWriter::new(file);
    encoder.encode(&mut writer, &img).map_err(|e| match e {
        ConvertError::Io(source) => write_err(source),
        other => other,
    })?;
    let file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
    let converted_size = file.metadata().map_err(write_err)?.len();

    Ok(Conversion {
        input: input.to_path_buf(),
        output,
        width,
        height,
        original_size,
        converted_size,
    })
}
