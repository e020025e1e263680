#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFormat {
    Jpeg,
    Png,
    Gif,
}

impl SupportedFormat {
    /// Match an extension token without its leading dot.
    ///
    /// Matching is exact: `"JPG"` is not a known token. Callers that accept
    /// user input lower-case it first.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(SupportedFormat::Jpeg),
            "png" => Some(SupportedFormat::Png),
            "gif" => Some(SupportedFormat::Gif),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedFormat::Jpeg => "JPEG",
            SupportedFormat::Png => "PNG",
            SupportedFormat::Gif => "GIF",
        }
    }
}
