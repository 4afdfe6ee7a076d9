use crate::render::{Filter, Rgb, Scale, DEFAULT_ALPHA_THRESHOLD};
use crate::utils::{BlockviewError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Draw transparent pixels as the terminal background
    #[serde(default = "default_alpha")]
    pub alpha: bool,

    /// Alpha values (0-255) below this are treated as fully transparent
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,

    /// "#rrggbb" to blend transparent pixels over instead of the terminal background
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    /// Resampling filter: "nearest", "triangle", "catmull-rom", "gaussian" or "lanczos3"
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Width and height scale factors, each in (0.0, 1.0]
    #[serde(default = "default_scale")]
    pub scale: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Column width of each image when listing a directory
    #[serde(default = "default_grid_cell_width")]
    pub grid_cell_width: u32,

    /// Images with more pixels are skipped unless forced
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,

    /// Columns to leave free at the right edge
    #[serde(default)]
    pub h_allow: u32,

    /// Lines to leave free at the bottom, for the shell prompt
    #[serde(default = "default_v_allow")]
    pub v_allow: u32,

    #[serde(default)]
    pub recursive: bool,

    #[serde(default)]
    pub show_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default functions
fn default_alpha() -> bool {
    true
}

fn default_alpha_threshold() -> u8 {
    DEFAULT_ALPHA_THRESHOLD
}

fn default_filter() -> String {
    Filter::default().name().to_string()
}

fn default_scale() -> [f64; 2] {
    [1.0, 1.0]
}

fn default_grid_cell_width() -> u32 {
    30
}

fn default_max_pixels() -> u64 {
    // 2048x2048
    1 << 22
}

fn default_v_allow() -> u32 {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            alpha_threshold: default_alpha_threshold(),
            background: None,
            filter: default_filter(),
            scale: default_scale(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            grid_cell_width: default_grid_cell_width(),
            max_pixels: default_max_pixels(),
            h_allow: 0,
            v_allow: default_v_allow(),
            recursive: false,
            show_hidden: false,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            viewer: ViewerConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn filter(&self) -> Result<Filter> {
        self.filter.parse().map_err(BlockviewError::config)
    }

    pub fn background(&self) -> Result<Option<Rgb>> {
        self.background
            .as_deref()
            .map(|color| {
                color
                    .parse()
                    .map_err(|e| BlockviewError::config(format!("render.background: {}", e)))
            })
            .transpose()
    }

    pub fn scale(&self) -> Result<Scale> {
        let [x, y] = self.scale;
        Scale::new(x, y).map_err(|e| BlockviewError::config(format!("render.scale: {}", e)))
    }
}

impl Config {
    /// Reject values that would only fail later, at render time
    pub fn validate(&self) -> Result<()> {
        self.render.filter()?;
        self.render.scale()?;
        self.render.background()?;

        if self.viewer.grid_cell_width == 0 {
            return Err(BlockviewError::config("viewer.grid_cell_width must be positive"));
        }
        if self.viewer.max_pixels == 0 {
            return Err(BlockviewError::config("viewer.max_pixels must be positive"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(BlockviewError::config("fetch.timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render.filter().unwrap(), Filter::Lanczos3);
        assert_eq!(config.viewer.max_pixels, 4_194_304);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("render:\n  alpha: false\n").unwrap();
        assert!(!config.render.alpha);
        assert_eq!(config.render.scale, [1.0, 1.0]);
        assert_eq!(config.viewer, ViewerConfig::default());
    }

    #[test]
    fn transparency_settings() {
        let yaml = "render:\n  alpha_threshold: 0\n  background: \"#102030\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.render.alpha_threshold, 0);
        assert_eq!(config.render.background().unwrap(), Some(Rgb::new(16, 32, 48)));

        let config = Config::default();
        assert_eq!(config.render.alpha_threshold, 40);
        assert_eq!(config.render.background().unwrap(), None);
        assert!(!serde_yaml::to_string(&config).unwrap().contains("background"));
    }

    #[test]
    fn bad_values_fail_validation() {
        let mut config = Config::default();
        config.render.filter = "bicubic".to_string();
        assert!(matches!(config.validate(), Err(BlockviewError::Config(_))));

        let mut config = Config::default();
        config.render.scale = [0.5, 2.0];
        assert!(matches!(config.validate(), Err(BlockviewError::Config(_))));

        let mut config = Config::default();
        config.render.background = Some("blue".to_string());
        assert!(matches!(config.validate(), Err(BlockviewError::Config(_))));

        let mut config = Config::default();
        config.viewer.grid_cell_width = 0;
        assert!(config.validate().is_err());
    }
}
