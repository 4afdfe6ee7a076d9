//! Pads a render with blank cells to place it inside a larger area.

use super::size::RenderSize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl FromStr for HAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "<" => Ok(Self::Left),
            "center" | "|" => Ok(Self::Center),
            "right" | ">" => Ok(Self::Right),
            other => Err(format!("unknown horizontal alignment '{}' (left, center, right)", other)),
        }
    }
}

impl FromStr for VAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" | "^" => Ok(Self::Top),
            "middle" | "-" => Ok(Self::Middle),
            "bottom" | "_" => Ok(Self::Bottom),
            other => Err(format!("unknown vertical alignment '{}' (top, middle, bottom)", other)),
        }
    }
}

/// Area a render is placed in. Dimensions smaller than the render leave
/// that axis unpadded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub width: u32,
    pub height: u32,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl Padding {
    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Surround `rendered`, a render of `size` cells, with spaces
    pub fn apply(&self, rendered: &str, size: RenderSize) -> String {
        let width = self.width.max(size.width);
        let height = self.height.max(size.height);
        if width == size.width && height == size.height {
            return rendered.to_string();
        }

        let (left, right) = match self.h_align {
            HAlign::Left => (0, width - size.width),
            HAlign::Center => split(width - size.width),
            HAlign::Right => (width - size.width, 0),
        };
        let (top, bottom) = match self.v_align {
            VAlign::Top => (0, height - size.height),
            VAlign::Middle => split(height - size.height),
            VAlign::Bottom => (height - size.height, 0),
        };

        let blank = " ".repeat(width as usize);
        let left = " ".repeat(left as usize);
        let right = " ".repeat(right as usize);

        let mut lines = Vec::with_capacity(height as usize);
        lines.extend((0..top).map(|_| blank.clone()));
        lines.extend(rendered.split('\n').map(|line| format!("{}{}{}", left, line, right)));
        lines.extend((0..bottom).map(|_| blank.clone()));
        lines.join("\n")
    }
}

/// Share `extra` cells between both sides; the odd one goes after
fn split(extra: u32) -> (u32, u32) {
    (extra / 2, extra - extra / 2)
}
