use crate::browse::{scan_dir, Entry, ScanOptions};
use crate::config::Config;
use crate::fetch;
use crate::media::{ImageHandle, RenderOptions};
use crate::render::{Bounds, Padding, SizeRequest};
use crate::terminal::{TerminalSize, TerminalSupport};
use crate::utils::{BlockviewError, Result};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Per-invocation settings that do not belong in the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewSettings {
    pub request: SizeRequest,
    pub frame: Option<usize>,
    /// Render images above the pixel limit
    pub force: bool,
    /// Let tall images scroll instead of fitting the terminal height
    pub scroll: bool,
    /// Area to place a single image in
    pub padding: Padding,
    /// Refuse to start on a terminal without truecolor support
    pub require_truecolor: bool,
}

/// Central application state
pub struct App {
    config: Config,
    settings: ViewSettings,
    bounds: Bounds,
    client: reqwest::Client,
}

impl App {
    pub fn new(
        config: Config,
        support: TerminalSupport,
        settings: ViewSettings,
        terminal: TerminalSize,
    ) -> Result<Self> {
        if !support.truecolor {
            if settings.require_truecolor {
                return Err(BlockviewError::unsupported_terminal(
                    "truecolor not reported by COLORTERM/TERM",
                ));
            }
            log::warn!("Terminal does not report truecolor support; colors may be wrong");
        }

        let mut bounds = terminal
            .bounds()
            .with_allowance(config.viewer.h_allow, config.viewer.v_allow);
        bounds.ignore_vertical = settings.scroll;

        let client = fetch::build_client(Duration::from_secs(config.fetch.timeout_secs))?;

        log::info!(
            "Viewer bounds {}x{} (scroll: {})",
            bounds.columns,
            bounds.rows,
            bounds.ignore_vertical
        );

        Ok(Self {
            config,
            settings,
            bounds,
            client,
        })
    }

    fn render_options(&self) -> Result<RenderOptions> {
        Ok(RenderOptions {
            alpha: self.config.render.alpha,
            alpha_threshold: self.config.render.alpha_threshold,
            background: self.config.render.background()?,
            filter: self.config.render.filter()?,
            max_pixels: Some(self.config.viewer.max_pixels),
            force: self.settings.force,
        })
    }

    /// Display `source`: an image file, a directory of images or a URL
    pub async fn show(&self, source: &str, out: &mut impl Write) -> Result<()> {
        if fetch::is_url(source) {
            let handle = ImageHandle::from_url(source, &self.client).await?;
            return self.show_image(handle, out);
        }

        let path = Path::new(source);
        if path.is_dir() {
            self.show_dir(path, out)
        } else {
            let handle = ImageHandle::from_file(path)?;
            self.show_image(handle, out)
        }
    }

    fn show_image(&self, mut handle: ImageHandle, out: &mut impl Write) -> Result<()> {
        let [sx, sy] = self.config.render.scale;
        handle.set_scale(sx, sy)?;

        // Explicit sizes may exceed the terminal; only automatic sizing is fitted
        let request = self.settings.request;
        let bounds = (request == SizeRequest::default()).then_some(self.bounds);
        handle.set_size(request, bounds)?;

        if let Some(frame) = self.settings.frame {
            handle.seek(frame)?;
        }

        let rendered = handle.render(&self.render_options()?)?;
        let rendered = self.settings.padding.apply(&rendered, handle.rendered_size()?);
        writeln!(out, "{}", rendered)?;
        handle.close()
    }

    fn show_dir(&self, dir: &Path, out: &mut impl Write) -> Result<()> {
        let options = ScanOptions {
            recursive: self.config.viewer.recursive,
            show_hidden: self.config.viewer.show_hidden,
        };
        let entries = scan_dir(dir, options)?;
        if entries.is_empty() {
            log::warn!("No images found in {}", dir.display());
            return Ok(());
        }

        let total: usize = entries.iter().map(Entry::image_count).sum();
        log::info!("Showing {} image(s) from {}", total, dir.display());
        self.show_entries(&entries, "", out)
    }

    fn show_entries(&self, entries: &[Entry], prefix: &str, out: &mut impl Write) -> Result<()> {
        let width = self.config.viewer.grid_cell_width.min(self.bounds.columns);
        let options = self.render_options()?;

        for entry in entries {
            match entry {
                Entry::Image { name, path } => {
                    writeln!(out, "{}{}", prefix, name)?;
                    match self.render_thumbnail(path, width, &options) {
                        Ok(rendered) => writeln!(out, "{}", rendered)?,
                        Err(e) => {
                            log::warn!("Skipping {}: {}", path.display(), e);
                            writeln!(out, "  ({})", e)?;
                        }
                    }
                }
                Entry::Directory { name, entries } => {
                    let nested = format!("{}{}/", prefix, name);
                    writeln!(out, "{}", nested)?;
                    self.show_entries(entries, &nested, out)?;
                }
            }
        }
        Ok(())
    }

    fn render_thumbnail(&self, path: &Path, width: u32, options: &RenderOptions) -> Result<String> {
        let mut handle = ImageHandle::from_file(path)?;
        let [sx, sy] = self.config.render.scale;
        handle.set_scale(sx, sy)?;
        handle.set_size(SizeRequest::width(width), None)?;
        let rendered = handle.render(options);
        handle.close()?;
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ansi::strip_escapes;
    use crate::utils::BlockviewError;
    use image::{Rgb, RgbImage};

    fn app(settings: ViewSettings) -> App {
        let support = TerminalSupport::from_vars("truecolor", "");
        App::new(Config::default(), support, settings, TerminalSize { cols: 40, rows: 12 }).unwrap()
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]))
            .save(path)
            .unwrap();
    }

    async fn show(app: &App, source: &Path) -> Result<String> {
        let mut out = Vec::new();
        app.show(source.to_str().unwrap(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn single_image_fits_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 200, 100);

        let out = show(&app(ViewSettings::default()), &path).await.unwrap();
        let text = strip_escapes(&out);
        let lines: Vec<&str> = text.trim_end_matches('\n').split('\n').collect();
        // 40 columns by 10 rows after the two-line allowance
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|line| line.chars().count() == 40));
    }

    #[test]
    fn truecolor_can_be_required() {
        let settings = ViewSettings {
            require_truecolor: true,
            ..ViewSettings::default()
        };
        let terminal = TerminalSize { cols: 40, rows: 12 };

        let plain = TerminalSupport::from_vars("", "xterm");
        let err = App::new(Config::default(), plain, settings, terminal).err().unwrap();
        assert!(matches!(err, BlockviewError::UnsupportedTerminal(_)));

        assert!(App::new(Config::default(), plain, ViewSettings::default(), terminal).is_ok());
        let truecolor = TerminalSupport::from_vars("truecolor", "");
        assert!(App::new(Config::default(), truecolor, settings, terminal).is_ok());
    }

    #[tokio::test]
    async fn padding_centers_single_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        write_png(&path, 4, 4);

        let settings = ViewSettings {
            padding: Padding {
                width: 8,
                height: 4,
                ..Padding::default()
            },
            ..ViewSettings::default()
        };
        let out = show(&app(settings), &path).await.unwrap();
        let text = strip_escapes(&out);
        let lines: Vec<&str> = text.trim_end_matches('\n').split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], " ".repeat(8));
        assert!(lines[1].starts_with("  ") && lines[1].ends_with("  "));
        assert!(lines.iter().all(|line| line.chars().count() == 8));
    }

    #[tokio::test]
    async fn background_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clear.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]))
            .save(&path)
            .unwrap();

        let mut config = Config::default();
        config.render.background = Some("#00ff00".to_string());
        let support = TerminalSupport::from_vars("truecolor", "");
        let terminal = TerminalSize { cols: 40, rows: 12 };
        let app = App::new(config, support, ViewSettings::default(), terminal).unwrap();

        let out = show(&app, &path).await.unwrap();
        assert_eq!(out, "\x1b[48;2;0;255;0m  \x1b[0m\n");
    }

    #[tokio::test]
    async fn explicit_width_is_not_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.png");
        write_png(&path, 64, 64);

        let settings = ViewSettings {
            request: SizeRequest::width(60),
            ..ViewSettings::default()
        };
        let out = show(&app(settings), &path).await.unwrap();
        let first = strip_escapes(&out).lines().next().unwrap().chars().count();
        assert_eq!(first, 60);
    }

    #[tokio::test]
    async fn conflicting_size_request_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.png");
        write_png(&path, 8, 8);

        let settings = ViewSettings {
            request: SizeRequest {
                width: Some(10),
                height: Some(5),
            },
            ..ViewSettings::default()
        };
        let err = show(&app(settings), &path).await.unwrap_err();
        assert!(matches!(err, BlockviewError::InvalidSize(_)));
    }

    #[tokio::test]
    async fn directory_lists_each_image() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("one.png"), 10, 10);
        write_png(&dir.path().join("two.png"), 10, 10);

        let out = show(&app(ViewSettings::default()), dir.path()).await.unwrap();
        let text = strip_escapes(&out);
        assert!(text.starts_with("one.png\n"));
        assert!(text.contains("two.png\n"));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = show(&app(ViewSettings::default()), &dir.path().join("gone.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlockviewError::SourceNotFound(_)));
    }
}
