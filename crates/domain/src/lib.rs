mod effects;
mod error;
mod image;

pub use effects::{EffectParam, EffectParams, ParamRange};
pub use error::DomainError;
pub use image::{
    detect_image_kind, ImageKind, RenderedFrame, SourceImage, MAX_UPLOAD_BYTES,
};
