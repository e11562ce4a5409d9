pub mod compose;
pub mod io;
pub mod presenters;

pub use compose::CpuCompositor;
pub use io::{ImageCrateDecoder, PngFrameEncoder, SystemClock};
pub use presenters::{present_effect_params, present_export, present_loaded};
