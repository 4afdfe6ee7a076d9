pub mod capability;
pub mod size;

pub use capability::{is_supported, TerminalSupport};
pub use size::{get_size, size_or_default, TerminalSize};
