pub mod error;

pub use error::{BlockviewError, Result};
