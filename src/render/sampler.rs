//! Resamples a source image to the pixel grid of a render.

use super::ansi::Rgb;
use super::size::RenderSize;
use image::imageops::FilterType;
use image::DynamicImage;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Resampling filter used when resizing to the render grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl Filter {
    pub const NAMES: [&'static str; 5] = ["nearest", "triangle", "catmull-rom", "gaussian", "lanczos3"];

    pub fn name(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmull-rom",
            Self::Gaussian => "gaussian",
            Self::Lanczos3 => "lanczos3",
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" => Ok(Self::Triangle),
            "catmull-rom" | "catmullrom" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" => Ok(Self::Lanczos3),
            other => Err(format!(
                "unknown filter '{}' (expected one of: {})",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
            Filter::CatmullRom => FilterType::CatmullRom,
            Filter::Gaussian => FilterType::Gaussian,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Alpha values below this are treated as fully transparent (40/255)
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 40;

/// Row-major pixels for one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledPixels {
    pub size: RenderSize,
    pub rgb: Vec<Rgb>,
    /// Present only when the source carries an alpha channel
    pub alpha: Option<Vec<u8>>,
}

impl SampledPixels {
    /// Drop the alpha channel so every pixel is drawn as opaque
    pub fn without_alpha(mut self) -> Self {
        self.alpha = None;
        self
    }

    /// Clear alpha values below `threshold` so faint pixels, such as the
    /// fringe a resize leaves around transparent areas, render as background.
    pub fn with_alpha_threshold(mut self, threshold: u8) -> Self {
        if let Some(alpha) = self.alpha.as_mut() {
            for a in alpha.iter_mut().filter(|a| **a < threshold) {
                *a = 0;
            }
        }
        self
    }

    /// Blend every pixel over `background` and drop the alpha channel
    pub fn composite_onto(mut self, background: Rgb) -> Self {
        let Some(alpha) = self.alpha.take() else {
            return self;
        };
        for (pixel, a) in self.rgb.iter_mut().zip(alpha) {
            let blend = |fg: u8, bg: u8| {
                let a = u32::from(a);
                ((u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
            };
            *pixel = Rgb::new(
                blend(pixel.r, background.r),
                blend(pixel.g, background.g),
                blend(pixel.b, background.b),
            );
        }
        self
    }

    pub fn render(&self) -> String {
        super::engine::render(
            &self.rgb,
            self.alpha.as_deref(),
            self.size.width as usize,
            self.size.height as usize,
        )
    }
}

/// Resize `image` to `size.width` x `size.height * 2` pixels and split the
/// result into color and alpha buffers.
pub fn sample(image: &DynamicImage, size: RenderSize, filter: Filter) -> SampledPixels {
    let (width, height) = size.pixel_size();
    let has_alpha = image.color().has_alpha();

    let resized = if image.width() == width && image.height() == height {
        Cow::Borrowed(image)
    } else {
        log::debug!(
            "Resampling {}x{} -> {}x{} with {}",
            image.width(),
            image.height(),
            width,
            height,
            filter
        );
        Cow::Owned(image.resize_exact(width, height, filter.into()))
    };

    let rgba = resized.to_rgba8();
    let pixel_count = rgba.width() as usize * rgba.height() as usize;
    let mut rgb = Vec::with_capacity(pixel_count);
    let mut alpha = Vec::with_capacity(if has_alpha { pixel_count } else { 0 });

    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.push(Rgb::new(r, g, b));
        if has_alpha {
            alpha.push(a);
        }
    }

    SampledPixels {
        size,
        rgb,
        alpha: has_alpha.then_some(alpha),
    }
}
