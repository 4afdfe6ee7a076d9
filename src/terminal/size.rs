use crate::render::Bounds;

/// Columns and rows of the terminal attached to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalSize {
    /// Fallback when stdout is not a terminal
    pub const DEFAULT: Self = Self { cols: 80, rows: 24 };

    pub fn bounds(self) -> Bounds {
        Bounds::new(u32::from(self.cols), u32::from(self.rows))
    }
}

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
pub fn get_size() -> Option<TerminalSize> {
    // SAFETY: winsize is plain old data and TIOCGWINSZ only writes into it
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(TerminalSize {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
pub fn get_size() -> Option<TerminalSize> {
    None
}

/// Terminal size, or 80x24 when it cannot be determined
pub fn size_or_default() -> TerminalSize {
    get_size().unwrap_or_else(|| {
        log::debug!("Terminal size unavailable, assuming {:?}", TerminalSize::DEFAULT);
        TerminalSize::DEFAULT
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds() {
        let bounds = TerminalSize::DEFAULT.bounds();
        assert_eq!(bounds, Bounds::new(80, 24));
        assert!(!bounds.ignore_vertical);
    }

    #[test]
    fn fallback_is_positive() {
        let size = size_or_default();
        assert!(size.cols > 0 && size.rows > 0);
    }
}
