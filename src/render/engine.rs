//! Turns a sampled pixel buffer into a half-block escape-sequence stream.
//!
//! Each terminal line covers two pixel rows. Columns are scanned left to
//! right and coalesced into runs (see [`super::cluster`]); each run costs a
//! single set of color sequences followed by its repeated glyph.

use super::ansi::{self, Rgb, LOWER_HALF, UPPER_HALF};
use super::cluster::{CellKind, PixelPair, Run};

/// Render `cell_width` x `cell_height` cells from row-major pixel buffers.
///
/// `rgb` holds `cell_width * cell_height * 2` pixels. `alpha`, when given,
/// must have the same length and enables transparency handling; `None`
/// renders every pixel as opaque.
///
/// # Panics
///
/// Panics if the buffer lengths do not match the cell size.
pub fn render(rgb: &[Rgb], alpha: Option<&[u8]>, cell_width: usize, cell_height: usize) -> String {
    let pixel_count = cell_width * cell_height * 2;
    assert_eq!(
        rgb.len(),
        pixel_count,
        "rgb buffer does not match a {}x{} cell grid",
        cell_width,
        cell_height
    );
    if let Some(alpha) = alpha {
        assert_eq!(alpha.len(), pixel_count, "alpha buffer length differs from rgb buffer");
    }

    let mut out = String::with_capacity(cell_width * cell_height * 8);
    if pixel_count == 0 {
        ansi::push_reset(&mut out);
        return out;
    }

    let has_alpha = alpha.is_some();
    let pair_at = |line: usize, col: usize| -> PixelPair {
        let upper = line * 2 * cell_width + col;
        let lower = upper + cell_width;
        match alpha {
            Some(a) => PixelPair::new(rgb[upper], rgb[lower], a[upper], a[lower]),
            None => PixelPair::opaque(rgb[upper], rgb[lower]),
        }
    };

    let mut runs = 0usize;
    for line in 0..cell_height {
        let mut run = Run::start(pair_at(line, 0));
        for col in 1..cell_width {
            let (flushed, next) = run.step(pair_at(line, col), has_alpha);
            if let Some(done) = flushed {
                push_run(&mut out, &done, has_alpha);
                runs += 1;
            }
            run = next;
        }
        // Rest of the line
        push_run(&mut out, &run, has_alpha);
        runs += 1;

        if line + 1 < cell_height {
            ansi::push_reset(&mut out);
            out.push('\n');
        }
    }
    ansi::push_reset(&mut out);

    log::debug!(
        "Rendered {}x{} cells in {} runs ({} bytes, alpha: {})",
        cell_width,
        cell_height,
        runs,
        out.len(),
        has_alpha
    );
    out
}

/// Append the formatting for one flushed run
fn push_run(out: &mut String, run: &Run, alpha: bool) {
    let PixelPair { upper, lower, .. } = run.cluster;
    let n = run.len;

    match CellKind::of(&run.cluster, alpha) {
        CellKind::Blank => {
            ansi::push_reset(out);
            ansi::push_repeated(out, ' ', n);
        }
        CellKind::LowerOnly => {
            ansi::push_reset(out);
            ansi::push_fg(out, lower);
            ansi::push_repeated(out, LOWER_HALF, n);
        }
        CellKind::UpperOnly => {
            ansi::push_reset(out);
            ansi::push_fg(out, upper);
            ansi::push_repeated(out, UPPER_HALF, n);
        }
        CellKind::Opaque => {
            ansi::push_bg(out, lower);
            if upper == lower {
                ansi::push_repeated(out, ' ', n);
            } else {
                ansi::push_fg(out, upper);
                ansi::push_repeated(out, UPPER_HALF, n);
            }
        }
    }
}
