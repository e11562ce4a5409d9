use pixelcraft_domain::{EffectParams, ImageKind, RenderedFrame, SourceImage};

use crate::ApplicationError;

/// Summary handed back to the caller after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub kind: ImageKind,
}

/// Encoded export plus the timestamp-qualified file name it should be
/// offered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, ApplicationError>;
}

/// The compositor contract: apply the fixed effect chain to `source` and
/// produce a frame at the source's native resolution. Implementations must
/// be deterministic — the same `(source, effects)` pair yields byte-identical
/// pixels on every call — and must never mutate `source`.
pub trait FrameRenderer {
    fn render(
        &self,
        source: &SourceImage,
        effects: &EffectParams,
    ) -> Result<RenderedFrame, ApplicationError>;
}

pub trait FrameEncoder {
    fn encode(&self, frame: &RenderedFrame) -> Result<Vec<u8>, ApplicationError>;
}

pub trait Clock {
    fn now_timestamp_string(&self) -> String;
}
