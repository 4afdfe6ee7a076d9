use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlockviewError>;

#[derive(Error, Debug)]
pub enum BlockviewError {
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid scale: {0}")]
    InvalidScale(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Image handle has been closed")]
    ClosedHandle,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Image too large: {0}")]
    TooLarge(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported terminal: {0}")]
    UnsupportedTerminal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// Convenience constructors
impl BlockviewError {
    pub fn invalid_size(msg: impl Into<String>) -> Self {
        Self::InvalidSize(msg.into())
    }

    pub fn invalid_scale(msg: impl Into<String>) -> Self {
        Self::InvalidScale(msg.into())
    }

    pub fn unsupported_source(msg: impl Into<String>) -> Self {
        Self::UnsupportedSource(msg.into())
    }

    pub fn source_not_found(msg: impl Into<String>) -> Self {
        Self::SourceNotFound(msg.into())
    }

    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    pub fn too_large(msg: impl Into<String>) -> Self {
        Self::TooLarge(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unsupported_terminal(msg: impl Into<String>) -> Self {
        Self::UnsupportedTerminal(msg.into())
    }

    /// Whether the error stems from bad user input rather than a runtime failure
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSize(_)
                | Self::InvalidScale(_)
                | Self::InvalidUrl(_)
                | Self::InvalidFrame(_)
                | Self::Config(_)
                | Self::Yaml(_)
        )
    }
}

/// Map a decoder failure to the error kind callers care about
impl From<image::ImageError> for BlockviewError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::Io(e),
            other => Self::UnsupportedSource(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_are_classified() {
        assert!(BlockviewError::invalid_size("both").is_usage_error());
        assert!(BlockviewError::invalid_scale("2.0").is_usage_error());
        assert!(!BlockviewError::ClosedHandle.is_usage_error());
        assert!(!BlockviewError::source_not_found("x.png").is_usage_error());
    }

    #[test]
    fn display_includes_message() {
        let err = BlockviewError::unsupported_source("not an image");
        assert_eq!(err.to_string(), "Unsupported source: not an image");
    }
}
