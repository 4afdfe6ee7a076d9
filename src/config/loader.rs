use crate::config::Config;
use crate::utils::{BlockviewError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default config file path: ~/.config/blockview/config.yaml
pub fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| BlockviewError::config("HOME environment variable not set"))?;

    let mut path = PathBuf::from(home);
    path.push(".config");
    path.push("blockview");
    path.push("config.yaml");

    Ok(path)
}

/// Read and validate the config file at `path`
pub fn load_config_from(path: &Path) -> Result<Config> {
    log::info!("Loading config from: {}", path.display());
    let content = fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is used
/// when present and built-in defaults otherwise.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(BlockviewError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            load_config_from(&path)
        }
        None => {
            let default_path = match default_config_path() {
                Ok(p) => p,
                Err(e) => {
                    log::info!("{}, using defaults", e);
                    return Ok(Config::default());
                }
            };
            if default_path.exists() {
                load_config_from(&default_path)
            } else {
                log::info!("Config file not found at {}, using defaults", default_path.display());
                Ok(Config::default())
            }
        }
    }
}

/// Write `config` to `path`, creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;

    log::info!("Config saved to: {}", path.display());
    Ok(())
}
