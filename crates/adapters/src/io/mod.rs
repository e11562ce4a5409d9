mod clock;
mod decode;
mod encode;

pub use clock::SystemClock;
pub use decode::ImageCrateDecoder;
pub use encode::PngFrameEncoder;
