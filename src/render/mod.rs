pub mod ansi;
pub mod cluster;
pub mod engine;
pub mod layout;
pub mod sampler;
pub mod size;

pub use ansi::Rgb;
pub use engine::render;
pub use layout::{HAlign, Padding, VAlign};
pub use sampler::{sample, Filter, SampledPixels, DEFAULT_ALPHA_THRESHOLD};
pub use size::{resolve, Bounds, RenderSize, Scale, SizeRequest};
