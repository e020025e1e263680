//! Extension-driven codec registry.
//!
//! Every supported format is one row of [`CODECS`]. Resolving an extension
//! returns a small adapter that wraps the row's plain decode or encode
//! function, so adding a format never touches the call sites.

use std::io::{Read, Write};

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageError};

use crate::error::ConvertError;
use crate::format::SupportedFormat;

/// Quality used when the requested one is outside 1..=100.
/// Matches `JpegEncoder::new`.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Reads an encoded byte stream into an in-memory image.
pub trait Decoder: Send + Sync {
    fn format(&self) -> SupportedFormat;
    fn decode(&self, input: &mut dyn Read) -> Result<DynamicImage, ConvertError>;
}

/// Writes an in-memory image as an encoded byte stream.
pub trait Encoder: Send + Sync {
    fn format(&self) -> SupportedFormat;
    /// Quality bound at resolution time, `None` for lossless formats.
    fn quality(&self) -> Option<u8>;
    fn encode(&self, output: &mut dyn Write, image: &DynamicImage) -> Result<(), ConvertError>;
}

type DecodeFn = fn(&mut dyn Read) -> Result<DynamicImage, ConvertError>;
type EncodeFn = fn(&mut dyn Write, &DynamicImage, Option<u8>) -> Result<(), ConvertError>;

struct Codec {
    format: SupportedFormat,
    decode: Option<DecodeFn>,
    encode: EncodeFn,
    default_quality: Option<u8>,
}

const CODECS: &[Codec] = &[
    Codec {
        format: SupportedFormat::Jpeg,
        decode: Some(decode_jpeg),
        encode: encode_jpeg,
        default_quality: Some(DEFAULT_JPEG_QUALITY),
    },
    Codec {
        format: SupportedFormat::Png,
        decode: Some(decode_png),
        encode: encode_png,
        default_quality: None,
    },
    // No GIF decoding: converting from GIF is not offered.
    Codec {
        format: SupportedFormat::Gif,
        decode: None,
        encode: encode_gif,
        default_quality: None,
    },
];

fn lookup(extension: &str) -> Option<&'static Codec> {
    let format = SupportedFormat::from_extension(extension)?;
    CODECS.iter().find(|c| c.format == format)
}

/// Adapter turning a plain decode function into a [`Decoder`].
pub struct FormatDecoder {
    format: SupportedFormat,
    decode: DecodeFn,
}

impl Decoder for FormatDecoder {
    fn format(&self) -> SupportedFormat {
        self.format
    }

    fn decode(&self, input: &mut dyn Read) -> Result<DynamicImage, ConvertError> {
        (self.decode)(input)
    }
}

/// Adapter turning a plain encode function and a bound quality into an [`Encoder`].
pub struct FormatEncoder {
    format: SupportedFormat,
    encode: EncodeFn,
    quality: Option<u8>,
}

impl Encoder for FormatEncoder {
    fn format(&self) -> SupportedFormat {
        self.format
    }

    fn quality(&self) -> Option<u8> {
        self.quality
    }

    fn encode(&self, output: &mut dyn Write, image: &DynamicImage) -> Result<(), ConvertError> {
        (self.encode)(output, image, self.quality)
    }
}

/// Look up the decoder for an extension token (`jpg`, `jpeg`, `png`).
pub fn resolve_decoder(extension: &str) -> Result<Box<dyn Decoder>, ConvertError> {
    let codec = lookup(extension)
        .ok_or_else(|| ConvertError::UnsupportedFormat(extension.to_string()))?;
    let decode = codec.decode.ok_or_else(|| {
        ConvertError::UnsupportedFormat(format!("{} (decoding not supported)", extension))
    })?;

    Ok(Box::new(FormatDecoder {
        format: codec.format,
        decode,
    }))
}

/// Look up the encoder for an extension token (`jpg`, `jpeg`, `png`, `gif`).
///
/// `quality` only applies to lossy formats. Values outside 1..=100 are not an
/// error: the format's default quality is used instead.
pub fn resolve_encoder(extension: &str, quality: i32) -> Result<Box<dyn Encoder>, ConvertError> {
    let codec = lookup(extension)
        .ok_or_else(|| ConvertError::UnsupportedFormat(extension.to_string()))?;

    let quality = codec
        .default_quality
        .map(|default| requested_quality(quality).unwrap_or(default));

    Ok(Box::new(FormatEncoder {
        format: codec.format,
        encode: codec.encode,
        quality,
    }))
}

fn requested_quality(quality: i32) -> Option<u8> {
    u8::try_from(quality).ok().filter(|q| (1..=100).contains(q))
}

fn read_all(input: &mut dyn Read) -> Result<Vec<u8>, ConvertError> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    Ok(data)
}

fn decode_jpeg(input: &mut dyn Read) -> Result<DynamicImage, ConvertError> {
    let data = read_all(input)?;
    image::load_from_memory_with_format(&data, image::ImageFormat::Jpeg)
        .map_err(|e| ConvertError::Decode(e.to_string()))
}

fn decode_png(input: &mut dyn Read) -> Result<DynamicImage, ConvertError> {
    let data = read_all(input)?;
    image::load_from_memory_with_format(&data, image::ImageFormat::Png)
        .map_err(|e| ConvertError::Decode(e.to_string()))
}

/// Write failures stay I/O errors; everything else is the codec's fault.
fn encode_error(format: SupportedFormat, err: ImageError) -> ConvertError {
    match err {
        ImageError::IoError(e) => ConvertError::Io(e),
        other => ConvertError::Encode(format!("Failed to encode {}: {}", format.as_str(), other)),
    }
}

fn encode_jpeg(
    output: &mut dyn Write,
    img: &DynamicImage,
    quality: Option<u8>,
) -> Result<(), ConvertError> {
    // JPEG has no alpha channel and only 8-bit samples; gray stays gray
    let flattened;
    let img = match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img,
        ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            flattened = DynamicImage::ImageLuma8(img.to_luma8());
            &flattened
        }
        _ => {
            flattened = DynamicImage::ImageRgb8(img.to_rgb8());
            &flattened
        }
    };

    let quality = quality.unwrap_or(DEFAULT_JPEG_QUALITY);
    let (width, height) = img.dimensions();
    log::debug!("Encoding {}x{} JPEG at quality {}", width, height, quality);

    img.write_with_encoder(JpegEncoder::new_with_quality(output, quality))
        .map_err(|e| encode_error(SupportedFormat::Jpeg, e))
}

fn encode_png(
    output: &mut dyn Write,
    img: &DynamicImage,
    _quality: Option<u8>,
) -> Result<(), ConvertError> {
    img.write_with_encoder(PngEncoder::new(output))
        .map_err(|e| encode_error(SupportedFormat::Png, e))
}

fn encode_gif(
    output: &mut dyn Write,
    img: &DynamicImage,
    _quality: Option<u8>,
) -> Result<(), ConvertError> {
    let rgba = img.to_rgba8();
    let (width, height) = img.dimensions();

    // The trailer is written when the encoder is dropped at the end of this scope.
    let mut encoder = GifEncoder::new(output);
    encoder
        .encode(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| encode_error(SupportedFormat::Gif, e))
}
