use std::io::Cursor;

use image::io::Reader as ImageReader;
use log::debug;
use pixelcraft_application::{ApplicationError, ImageDecoder};
use pixelcraft_domain::SourceImage;

/// Decodes upload bytes with format sniffing and converts to RGBA8. The
/// declared MIME was already checked at the boundary; sniffing catches
/// files whose extension lies about their contents.
#[derive(Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, ApplicationError> {
        let decoded = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?
            .decode()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?;

        let rgba = decoded.to_rgba8();
        debug!("decoded {}x{} image", rgba.width(), rgba.height());
        SourceImage::from_rgba8(rgba.width(), rgba.height(), rgba.into_raw())
            .map_err(Into::into)
    }
}
