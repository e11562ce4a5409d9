use std::path::Path;

use crate::DomainError;

/// Upload boundary cap: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
    Gif,
    Unsupported,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/webp" => Self::WebP,
            "image/gif" => Self::Gif,
            _ => Self::Unsupported,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Unsupported => "application/octet-stream",
        }
    }

    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

pub fn detect_image_kind(path: &Path) -> ImageKind {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return ImageKind::Unsupported;
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => ImageKind::Jpeg,
        "png" => ImageKind::Png,
        "webp" => ImageKind::WebP,
        "gif" => ImageKind::Gif,
        _ => ImageKind::Unsupported,
    }
}

/// Decoded pixel data of the loaded file. Fields are private: the handle is
/// created once per upload and read-only for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SourceImage {
    /// Takes ownership of an RGBA8 buffer. Zero-sized images and buffers
    /// that disagree with the dimensions are rejected.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(DomainError::PixelBufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Output of one composite-chain application, sized to the source. Replaced
/// wholesale on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}
