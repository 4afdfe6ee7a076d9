pub mod decode;
pub mod handle;

pub use decode::decode_frames;
pub use handle::{ImageHandle, RenderOptions, SourceKind};
