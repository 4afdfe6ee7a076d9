//! Render images in a truecolor terminal using half-block glyphs.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as the cell background.

pub mod app;
pub mod browse;
pub mod config;
pub mod fetch;
pub mod media;
pub mod render;
pub mod terminal;
pub mod utils;

pub use media::{ImageHandle, RenderOptions};
pub use render::{Bounds, Filter, RenderSize, Scale, SizeRequest};
pub use utils::{BlockviewError, Result};
