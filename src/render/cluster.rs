//! Run-length state machine over the pixel pairs of one terminal line.
//!
//! A run is a horizontal stretch of cells that format identically. The
//! transition function is pure so the coalescing rules can be tested without
//! building any output.

use super::ansi::Rgb;

/// The two vertically stacked pixels covered by one terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPair {
    pub upper: Rgb,
    pub lower: Rgb,
    pub upper_alpha: u8,
    pub lower_alpha: u8,
}

impl PixelPair {
    pub const fn new(upper: Rgb, lower: Rgb, upper_alpha: u8, lower_alpha: u8) -> Self {
        Self {
            upper,
            lower,
            upper_alpha,
            lower_alpha,
        }
    }

    /// A pair with both pixels fully opaque
    pub const fn opaque(upper: Rgb, lower: Rgb) -> Self {
        Self::new(upper, lower, u8::MAX, u8::MAX)
    }

    pub fn is_blank(&self) -> bool {
        self.upper_alpha == 0 && self.lower_alpha == 0
    }
}

/// How a run is drawn once flushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Both halves transparent: plain spaces on the default background
    Blank,
    /// Only the lower half is visible
    LowerOnly,
    /// Only the upper half is visible
    UpperOnly,
    /// Both halves drawn with colors
    Opaque,
}

impl CellKind {
    pub fn of(pair: &PixelPair, alpha: bool) -> Self {
        if !alpha {
            return Self::Opaque;
        }
        match (pair.upper_alpha == 0, pair.lower_alpha == 0) {
            (true, true) => Self::Blank,
            (true, false) => Self::LowerOnly,
            (false, true) => Self::UpperOnly,
            (false, false) => Self::Opaque,
        }
    }
}

/// The cluster currently accumulating and its length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub cluster: PixelPair,
    pub len: usize,
}

impl Run {
    /// Begin a run at the first column of a line
    pub const fn start(cluster: PixelPair) -> Self {
        Self { cluster, len: 1 }
    }

    /// Feed the next column.
    ///
    /// Returns the finished run when `next` breaks the current one, along with
    /// the state to continue from.
    pub fn step(self, next: PixelPair, alpha: bool) -> (Option<Run>, Run) {
        if breaks_run(&self.cluster, &next, alpha) {
            (Some(self), Run::start(next))
        } else {
            (
                None,
                Run {
                    cluster: self.cluster,
                    len: self.len + 1,
                },
            )
        }
    }
}

/// Whether `next` cannot be drawn as part of the run over `current`.
pub fn breaks_run(current: &PixelPair, next: &PixelPair, alpha: bool) -> bool {
    // Transparent to transparent never breaks, whatever the hidden colors are
    if alpha && current.is_blank() && next.is_blank() {
        return false;
    }

    next.upper != current.upper
        || next.lower != current.lower
        || (alpha
            && (visibility_changed(current.upper_alpha, next.upper_alpha)
                || visibility_changed(current.lower_alpha, next.lower_alpha)))
}

fn visibility_changed(from: u8, to: u8) -> bool {
    (from == 0) != (to == 0)
}
