//! Truecolor detection from the environment.

use std::sync::OnceLock;

/// Whether the terminal can display the half-block renderer's 24-bit colors.
///
/// Computed once at startup and handed to whoever decides which renderer to
/// use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSupport {
    pub truecolor: bool,
}

impl TerminalSupport {
    /// Read `COLORTERM` and `TERM` from the process environment
    pub fn from_env() -> Self {
        let colorterm = std::env::var("COLORTERM").unwrap_or_default();
        let term = std::env::var("TERM").unwrap_or_default();
        Self::from_vars(&colorterm, &term)
    }

    pub fn from_vars(colorterm: &str, term: &str) -> Self {
        let truecolor =
            colorterm.contains("truecolor") || colorterm.contains("24bit") || term.contains("256color");
        log::debug!(
            "COLORTERM={:?} TERM={:?} -> truecolor: {}",
            colorterm,
            term,
            truecolor
        );
        Self { truecolor }
    }
}

static SUPPORT: OnceLock<TerminalSupport> = OnceLock::new();

/// Process-wide truecolor check, read from the environment on first call
pub fn is_supported() -> bool {
    SUPPORT.get_or_init(TerminalSupport::from_env).truecolor
}
