use std::io::Cursor;

use image::{ColorType, ImageFormat};
use pixelcraft_application::{ApplicationError, FrameEncoder};
use pixelcraft_domain::RenderedFrame;

/// Lossless PNG encoding of a rendered frame, so the exported file decodes
/// back to exactly the previewed pixels.
#[derive(Debug, Default)]
pub struct PngFrameEncoder;

impl FrameEncoder for PngFrameEncoder {
    fn encode(&self, frame: &RenderedFrame) -> Result<Vec<u8>, ApplicationError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(ApplicationError::Encode(format!(
                "cannot encode a {}x{} frame",
                frame.width, frame.height
            )));
        }

        let mut bytes = Vec::new();
        image::write_buffer_with_format(
            &mut Cursor::new(&mut bytes),
            &frame.pixels,
            frame.width,
            frame.height,
            ColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(|error| ApplicationError::Encode(error.to_string()))?;
        Ok(bytes)
    }
}
