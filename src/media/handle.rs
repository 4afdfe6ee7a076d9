use super::decode::decode_frames;
use crate::fetch;
use crate::render::{self, Bounds, Filter, RenderSize, Rgb, Scale, SizeRequest};
use crate::utils::{BlockviewError, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where an image was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Memory,
    File,
    Url,
}

#[derive(Debug)]
enum Source {
    Memory,
    File(PathBuf),
    Url {
        url: String,
        /// Downloaded copy, removed on close
        file: Option<NamedTempFile>,
    },
}

/// Per-render settings that are not part of the image itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Honor the alpha channel; when false every pixel is drawn opaque
    pub alpha: bool,
    /// Alpha values below this count as transparent
    pub alpha_threshold: u8,
    /// Blend transparent pixels over this color instead of leaving the
    /// terminal background visible
    pub background: Option<Rgb>,
    pub filter: Filter,
    /// Refuse sources with more pixels than this unless `force` is set
    pub max_pixels: Option<u64>,
    pub force: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            alpha_threshold: render::DEFAULT_ALPHA_THRESHOLD,
            background: None,
            filter: Filter::default(),
            max_pixels: None,
            force: false,
        }
    }
}

/// A decoded image together with the size it renders at
#[derive(Debug)]
pub struct ImageHandle {
    source: Source,
    /// `None` once the handle is closed
    frames: Option<Vec<DynamicImage>>,
    original_size: (u32, u32),
    frame: usize,
    request: SizeRequest,
    bounds: Option<Bounds>,
    scale: Scale,
    size: RenderSize,
}

impl ImageHandle {
    /// Wrap an already decoded image
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        Self::new(Source::Memory, vec![image])
    }

    /// Decode the image file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BlockviewError::source_not_found(path.display().to_string()));
        }
        if path.is_dir() {
            return Err(BlockviewError::unsupported_source(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let frames = decode_frames(path)?;
        log::info!("Loaded {}", path.display());
        Self::new(Source::File(path.to_path_buf()), frames)
    }

    /// Download and decode the image at `url`
    pub async fn from_url(url: &str, client: &reqwest::Client) -> Result<Self> {
        let file = fetch::fetch_to_tempfile(client, url).await?;
        let frames = decode_frames(file.path())?;
        log::info!("Loaded {}", url);
        Self::new(
            Source::Url {
                url: url.to_string(),
                file: Some(file),
            },
            frames,
        )
    }

    fn new(source: Source, frames: Vec<DynamicImage>) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| BlockviewError::unsupported_source("image has no frames"))?;
        let original_size = (first.width(), first.height());
        if original_size.0 == 0 || original_size.1 == 0 {
            return Err(BlockviewError::unsupported_source(format!(
                "image has no pixels ({}x{})",
                original_size.0, original_size.1
            )));
        }

        Ok(Self {
            source,
            frames: Some(frames),
            original_size,
            frame: 0,
            request: SizeRequest::default(),
            bounds: None,
            scale: Scale::ONE,
            size: render::size::natural_size(original_size, Scale::ONE),
        })
    }

    fn frames(&self) -> Result<&[DynamicImage]> {
        self.frames.as_deref().ok_or(BlockviewError::ClosedHandle)
    }

    pub fn is_closed(&self) -> bool {
        self.frames.is_none()
    }

    pub fn source_kind(&self) -> SourceKind {
        match self.source {
            Source::Memory => SourceKind::Memory,
            Source::File(_) => SourceKind::File,
            Source::Url { .. } => SourceKind::Url,
        }
    }

    /// Path or URL the image came from; `None` for in-memory images
    pub fn source_name(&self) -> Option<String> {
        match &self.source {
            Source::Memory => None,
            Source::File(path) => Some(path.display().to_string()),
            Source::Url { url, .. } => Some(url.clone()),
        }
    }

    /// Local file backing the image, the temporary download for URLs
    pub fn local_path(&self) -> Option<&Path> {
        match &self.source {
            Source::Memory => None,
            Source::File(path) => Some(path),
            Source::Url { file, .. } => file.as_ref().map(NamedTempFile::path),
        }
    }

    /// Pixel dimensions of the source
    pub fn original_size(&self) -> (u32, u32) {
        self.original_size
    }

    pub fn n_frames(&self) -> Result<usize> {
        Ok(self.frames()?.len())
    }

    pub fn is_animated(&self) -> Result<bool> {
        Ok(self.n_frames()? > 1)
    }

    /// Index of the frame that renders
    pub fn tell(&self) -> Result<usize> {
        self.frames()?;
        Ok(self.frame)
    }

    /// Select the frame to render
    pub fn seek(&mut self, frame: usize) -> Result<()> {
        let n_frames = self.n_frames()?;
        if frame >= n_frames {
            return Err(BlockviewError::invalid_frame(format!(
                "frame {} out of range (image has {})",
                frame, n_frames
            )));
        }
        self.frame = frame;
        Ok(())
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn set_scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.frames()?;
        let scale = Scale::new(x, y)?;
        self.size = render::resolve(self.original_size, self.request, scale, self.bounds)?;
        self.scale = scale;
        Ok(())
    }

    /// Set the render size; an empty request means the natural size
    pub fn set_size(&mut self, request: SizeRequest, bounds: Option<Bounds>) -> Result<()> {
        self.frames()?;
        self.size = render::resolve(self.original_size, request, self.scale, bounds)?;
        self.request = request;
        self.bounds = bounds;
        Ok(())
    }

    /// Size in cells the next render will have
    pub fn rendered_size(&self) -> Result<RenderSize> {
        self.frames()?;
        Ok(self.size)
    }

    /// Render the current frame to an escape-sequence string
    pub fn render(&self, options: &RenderOptions) -> Result<String> {
        let frames = self.frames()?;

        let (width, height) = self.original_size;
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_pixels) = options.max_pixels {
            if pixels > max_pixels && !options.force {
                return Err(BlockviewError::too_large(format!(
                    "{}x{} has more than {} pixels",
                    width, height, max_pixels
                )));
            }
        }

        let sampled = render::sample(&frames[self.frame], self.size, options.filter);
        let sampled = match (options.alpha, options.background) {
            (false, _) => sampled.without_alpha(),
            (true, Some(background)) => sampled.composite_onto(background),
            (true, None) => sampled.with_alpha_threshold(options.alpha_threshold),
        };
        Ok(sampled.render())
    }

    /// Release the decoded frames and any downloaded file.
    ///
    /// Closing an already closed handle does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.frames.take().is_none() {
            return Ok(());
        }

        if let Source::Url { url, file } = &mut self.source {
            if let Some(file) = file.take() {
                log::debug!("Removing downloaded copy of {}", url);
                file.close()?;
            }
        }
        Ok(())
    }
}
