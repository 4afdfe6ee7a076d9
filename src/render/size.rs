//! Resolves a requested render size against the source's aspect ratio.
//!
//! A terminal cell is roughly twice as tall as it is wide and covers one
//! pixel column and two pixel rows, so deriving one dimension from the other
//! divides or multiplies by two.

use crate::utils::{BlockviewError, Result};

/// Size of a render in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
}

impl RenderSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions the sampler must produce for this size
    pub const fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height.saturating_mul(2))
    }
}

/// Independent width and height compression factors, each in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Result<Self> {
        for (axis, value) in [("x", x), ("y", y)] {
            // Written this way so NaN is rejected too
            if !(value > 0.0 && value <= 1.0) {
                return Err(BlockviewError::invalid_scale(format!(
                    "{} component must be in (0.0, 1.0], got {}",
                    axis, value
                )));
            }
        }
        Ok(Self { x, y })
    }

    pub fn uniform(value: f64) -> Result<Self> {
        Self::new(value, value)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ONE
    }
}

/// Area the render has to fit in, usually the terminal window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub columns: u32,
    pub rows: u32,
    /// Let the render grow past `rows`, for output that scrolls
    pub ignore_vertical: bool,
}

impl Bounds {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ignore_vertical: false,
        }
    }

    pub const fn scrolling(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ignore_vertical: true,
        }
    }

    /// Shrink by horizontal and vertical allowances, keeping at least one cell
    pub fn with_allowance(self, h_allow: u32, v_allow: u32) -> Self {
        Self {
            columns: self.columns.saturating_sub(h_allow).max(1),
            rows: self.rows.saturating_sub(v_allow).max(1),
            ..self
        }
    }
}

impl From<RenderSize> for Bounds {
    fn from(size: RenderSize) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Explicitly requested dimensions; at most one may be set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SizeRequest {
    pub const fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub const fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }
}

/// Resolve `request` for a source of `original` pixels into a cell size.
pub fn resolve(
    original: (u32, u32),
    request: SizeRequest,
    scale: Scale,
    bounds: Option<Bounds>,
) -> Result<RenderSize> {
    let (ori_width, ori_height) = original;
    if ori_width == 0 || ori_height == 0 {
        return Err(BlockviewError::unsupported_source(format!(
            "image has no pixels ({}x{})",
            ori_width, ori_height
        )));
    }

    let size = match (request.width, request.height) {
        (Some(_), Some(_)) => {
            return Err(BlockviewError::invalid_size(
                "cannot set both width and height",
            ));
        }
        (Some(0), None) | (None, Some(0)) => {
            return Err(BlockviewError::invalid_size("dimensions must be positive"));
        }
        (Some(width), None) => apply_scale(
            RenderSize::new(width, height_for_width(width, original)),
            scale,
        ),
        (None, Some(height)) => apply_scale(
            RenderSize::new(width_for_height(height, original), height),
            scale,
        ),
        (None, None) => natural_size(original, scale),
    };

    // Never sample more pixels than the scaled source has
    let size = fit(size, Bounds::from(natural_size(original, scale)));

    let resolved = match bounds {
        Some(bounds) => fit(size, bounds),
        None => size,
    };

    log::debug!(
        "Resolved {:?} for {}x{} source (scale {}x{}, bounds {:?}) to {}x{} cells",
        request,
        ori_width,
        ori_height,
        scale.x,
        scale.y,
        bounds,
        resolved.width,
        resolved.height
    );
    Ok(resolved)
}

/// Cell size that maps one source pixel to one half cell
pub fn natural_size(original: (u32, u32), scale: Scale) -> RenderSize {
    let (ori_width, ori_height) = original;
    RenderSize::new(
        to_cells((f64::from(ori_width) * scale.x).round()),
        to_cells((f64::from(ori_height) * scale.y / 2.0).ceil()),
    )
}

/// Lines needed to show `width` columns of the source without distortion
pub fn height_for_width(width: u32, original: (u32, u32)) -> u32 {
    let (ori_width, ori_height) = original;
    to_cells((f64::from(width) * f64::from(ori_height) / f64::from(ori_width) / 2.0).round())
}

/// Columns needed to show `height` lines of the source without distortion
pub fn width_for_height(height: u32, original: (u32, u32)) -> u32 {
    let (ori_width, ori_height) = original;
    to_cells((f64::from(height) * 2.0 * f64::from(ori_width) / f64::from(ori_height)).round())
}

fn apply_scale(size: RenderSize, scale: Scale) -> RenderSize {
    RenderSize::new(
        to_cells((f64::from(size.width) * scale.x).round()),
        to_cells((f64::from(size.height) * scale.y).round()),
    )
}

/// Proportionally shrink `size` until it fits in `bounds`
fn fit(size: RenderSize, bounds: Bounds) -> RenderSize {
    let too_wide = size.width > bounds.columns;
    let too_tall = !bounds.ignore_vertical && size.height > bounds.rows;
    if !too_wide && !too_tall {
        return size;
    }

    let mut factor = f64::from(bounds.columns) / f64::from(size.width);
    if !bounds.ignore_vertical {
        factor = factor.min(f64::from(bounds.rows) / f64::from(size.height));
    }

    let width = to_cells((f64::from(size.width) * factor).round()).min(bounds.columns.max(1));
    let mut height = to_cells((f64::from(size.height) * factor).round());
    if !bounds.ignore_vertical {
        height = height.min(bounds.rows.max(1));
    }
    RenderSize::new(width, height)
}

fn to_cells(value: f64) -> u32 {
    // Saturating float-to-int conversion; never below one cell
    (value as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: (u32, u32) = (256, 256);

    #[test]
    fn natural_size_halves_rows() {
        let size = resolve((10, 7), SizeRequest::default(), Scale::ONE, None).unwrap();
        assert_eq!(size, RenderSize::new(10, 4));
    }

    #[test]
    fn natural_size_applies_scale() {
        let scale = Scale::new(0.5, 0.25).unwrap();
        let size = resolve((100, 80), SizeRequest::default(), scale, None).unwrap();
        assert_eq!(size, RenderSize::new(50, 10));
    }

    #[test]
    fn width_derives_height() {
        let size = resolve(SQUARE, SizeRequest::width(20), Scale::ONE, None).unwrap();
        assert_eq!(size, RenderSize::new(20, 10));
    }

    #[test]
    fn height_derives_width() {
        let size = resolve(SQUARE, SizeRequest::height(20), Scale::ONE, None).unwrap();
        assert_eq!(size, RenderSize::new(40, 20));
    }

    #[test]
    fn scale_applies_to_requested_size() {
        let scale = Scale::new(0.5, 0.5).unwrap();
        let size = resolve(SQUARE, SizeRequest::width(40), scale, None).unwrap();
        assert_eq!(size, RenderSize::new(20, 10));
    }

    #[test]
    fn both_dimensions_rejected() {
        let request = SizeRequest {
            width: Some(10),
            height: Some(5),
        };
        let err = resolve(SQUARE, request, Scale::ONE, None).unwrap_err();
        assert!(matches!(err, BlockviewError::InvalidSize(_)));
    }

    #[test]
    fn zero_dimension_rejected() {
        let err = resolve(SQUARE, SizeRequest::width(0), Scale::ONE, None).unwrap_err();
        assert!(matches!(err, BlockviewError::InvalidSize(_)));
    }

    #[test]
    fn empty_source_rejected() {
        let err = resolve((0, 10), SizeRequest::default(), Scale::ONE, None).unwrap_err();
        assert!(matches!(err, BlockviewError::UnsupportedSource(_)));
    }

    #[test]
    fn scale_out_of_range() {
        for (x, y) in [(0.5, 2.0), (0.0, 0.0), (-0.4, -0.4), (1.0, f64::NAN)] {
            let err = Scale::new(x, y).unwrap_err();
            assert!(matches!(err, BlockviewError::InvalidScale(_)), "{} {}", x, y);
        }
        assert!(Scale::new(0.5, 0.4).is_ok());
        assert!(Scale::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn aspect_ratio_round_trip() {
        for original in [(300, 200), (256, 256), (200, 300), (640, 480)] {
            for width in [10, 33, 80, 121] {
                let first = resolve(original, SizeRequest::width(width), Scale::ONE, None).unwrap();
                let back =
                    resolve(original, SizeRequest::height(first.height), Scale::ONE, None).unwrap();
                assert!(
                    back.width.abs_diff(width) <= 1,
                    "{:?}: {} -> {} -> {}",
                    original,
                    width,
                    first.height,
                    back.width
                );
            }
        }
    }

    #[test]
    fn bounds_shrink_oversized() {
        let cases = [((100, 50), (100, 50)), ((100, 55), (100, 50)), ((110, 50), (100, 50))];
        for ((columns, rows), expected) in cases {
            let size = resolve(
                SQUARE,
                SizeRequest::default(),
                Scale::ONE,
                Some(Bounds::new(columns, rows)),
            )
            .unwrap();
            assert_eq!(size, RenderSize::new(expected.0, expected.1));
        }
    }

    #[test]
    fn bounds_leave_small_renders_alone() {
        let bounds = Some(Bounds::new(200, 100));
        let size = resolve(SQUARE, SizeRequest::width(100), Scale::ONE, bounds).unwrap();
        assert_eq!(size, RenderSize::new(100, 50));
        let size = resolve(SQUARE, SizeRequest::height(50), Scale::ONE, bounds).unwrap();
        assert_eq!(size, RenderSize::new(100, 50));
    }

    #[test]
    fn bounds_shrink_explicit_width() {
        let bounds = Some(Bounds::new(100, 100));
        let size = resolve(SQUARE, SizeRequest::width(200), Scale::ONE, bounds).unwrap();
        assert_eq!(size, RenderSize::new(100, 50));
        let size = resolve(SQUARE, SizeRequest::height(100), Scale::ONE, bounds).unwrap();
        assert_eq!(size, RenderSize::new(100, 50));
    }

    #[test]
    fn oversized_width_stays_within_source() {
        let size = resolve((2, 2), SizeRequest::width(100), Scale::ONE, None).unwrap();
        assert_eq!(size, RenderSize::new(2, 1));
        let (width, height) = size.pixel_size();
        assert!(width <= 2 && height <= 2);

        let size = resolve(SQUARE, SizeRequest::width(300), Scale::ONE, None).unwrap();
        assert_eq!(size, RenderSize::new(256, 128));
        let bounds = Some(Bounds::new(200, 100));
        let size = resolve(SQUARE, SizeRequest::width(300), Scale::ONE, bounds).unwrap();
        assert_eq!(size, RenderSize::new(200, 100));
    }

    #[test]
    fn oversized_height_stays_within_source() {
        let size = resolve((10, 40), SizeRequest::height(u32::MAX), Scale::ONE, None).unwrap();
        assert!(size.width <= 10, "{:?}", size);
        assert!(size.height <= 20, "{:?}", size);
        let (_, pixel_rows) = size.pixel_size();
        assert!(pixel_rows <= 40);
    }

    #[test]
    fn source_limit_follows_scale() {
        let scale = Scale::new(0.5, 0.5).unwrap();
        let size = resolve((40, 40), SizeRequest::width(1000), scale, None).unwrap();
        assert_eq!(size, RenderSize::new(20, 10));
    }

    #[test]
    fn pixel_size_saturates() {
        let size = RenderSize::new(1, u32::MAX);
        assert_eq!(size.pixel_size(), (1, u32::MAX));
    }

    #[test]
    fn scrolling_bounds_ignore_rows() {
        let size = resolve(
            (100, 400),
            SizeRequest::default(),
            Scale::ONE,
            Some(Bounds::scrolling(80, 24)),
        )
        .unwrap();
        assert_eq!(size.width, 80);
        assert_eq!(size.height, 160);
    }

    #[test]
    fn tall_source_fits_rows() {
        let size = resolve(
            (100, 400),
            SizeRequest::default(),
            Scale::ONE,
            Some(Bounds::new(80, 25)),
        )
        .unwrap();
        assert_eq!(size, RenderSize::new(13, 25));
    }

    #[test]
    fn allowance_keeps_one_cell() {
        let bounds = Bounds::new(80, 24).with_allowance(2, 30);
        assert_eq!(bounds.columns, 78);
        assert_eq!(bounds.rows, 1);
    }

    #[test]
    fn tiny_results_clamp_to_one() {
        let scale = Scale::new(0.01, 0.01).unwrap();
        let size = resolve((10, 10), SizeRequest::default(), scale, None).unwrap();
        assert_eq!(size, RenderSize::new(1, 1));
    }
}
