mod error;
mod ports;
mod service;
mod use_cases;

pub use error::ApplicationError;
pub use ports::{Clock, ExportArtifact, FrameEncoder, FrameRenderer, ImageDecoder, LoadedImage};
pub use service::EditorService;
pub use use_cases::{
    CloseImageCommand, EffectParamsQuery, ExportImageCommand, LoadImageCommand,
    RenderPreviewCommand, ResetEffectsCommand, SetEffectCommand,
};
