mod loader;
mod types;

pub use loader::{default_config_path, load_config, load_config_from, save_config};
pub use types::{Config, FetchConfig, RenderConfig, ViewerConfig};
