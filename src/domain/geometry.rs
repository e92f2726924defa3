//! Recording region geometry

use std::fmt;
use std::str::FromStr;

use crate::domain::error::GeometryParseError;

/// Bytes per ARGB8888 pixel
pub const BYTES_PER_PIXEL: i32 = 4;

/// Screen region to highlight.
/// Validated on creation: width and height are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    /// Grow the rectangle by `border` pixels on every side.
    ///
    /// Fails when the surface origin, size or row stride no longer fits the
    /// protocol's signed 32-bit integers. Nothing is clamped.
    pub fn bordered(&self, border: u32) -> Result<BorderedRect, GeometryParseError> {
        let fail = |reason: &'static str| GeometryParseError {
            input: self.to_string(),
            reason,
        };

        let inset = i32::try_from(border).map_err(|_| fail("border is too wide"))?;
        let grow = |len: i32| inset.checked_mul(2).and_then(|both| len.checked_add(both));

        let width = grow(self.width).ok_or_else(|| fail("width plus border overflows"))?;
        let height = grow(self.height).ok_or_else(|| fail("height plus border overflows"))?;
        let stride = width
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| fail("row stride overflows"))?;
        let byte_len = (stride as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| fail("buffer size overflows"))?;
        let margin_top = self
            .y
            .checked_sub(inset)
            .ok_or_else(|| fail("y minus border overflows"))?;
        let margin_left = self
            .x
            .checked_sub(inset)
            .ok_or_else(|| fail("x minus border overflows"))?;

        Ok(BorderedRect {
            region: *self,
            border,
            width,
            height,
            stride,
            byte_len,
            margin_top,
            margin_left,
        })
    }
}

impl FromStr for Rectangle {
    type Err = GeometryParseError;

    /// Parse `"<x>,<y> <width>x<height>"`, e.g. `"100,50 800x600"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &'static str| GeometryParseError {
            input: s.to_string(),
            reason,
        };

        let (origin, size) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| fail("missing space between origin and size"))?;
        let (x, y) = origin
            .split_once(',')
            .ok_or_else(|| fail("missing ',' in origin"))?;
        let (width, height) = size
            .split_once('x')
            .ok_or_else(|| fail("missing 'x' in size"))?;

        let field = |value: &str, reason: &'static str| -> Result<i32, GeometryParseError> {
            // i32::from_str accepts a leading '+'; the format does not
            if value.starts_with('+') {
                return Err(fail(reason));
            }
            value.parse::<i32>().map_err(|_| fail(reason))
        };

        let rect = Rectangle {
            x: field(x, "x is not an integer")?,
            y: field(y, "y is not an integer")?,
            width: field(width, "width is not an integer")?,
            height: field(height, "height is not an integer")?,
        };

        if rect.width <= 0 || rect.height <= 0 {
            return Err(fail("width and height must be positive"));
        }

        Ok(rect)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// A region plus its surrounding border: the extent of the overlay surface
/// and of its pixel buffer. Only built by [`Rectangle::bordered`], so every
/// derived value is known to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderedRect {
    region: Rectangle,
    border: u32,
    width: i32,
    height: i32,
    stride: i32,
    byte_len: usize,
    margin_top: i32,
    margin_left: i32,
}

impl BorderedRect {
    pub const fn region(&self) -> Rectangle {
        self.region
    }

    pub const fn border(&self) -> u32 {
        self.border
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Row length in bytes
    pub const fn stride(&self) -> i32 {
        self.stride
    }

    /// Total pixel buffer size in bytes
    pub const fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Top margin that places the surface's top-left at `y - border`
    pub const fn margin_top(&self) -> i32 {
        self.margin_top
    }

    /// Left margin that places the surface's top-left at `x - border`
    pub const fn margin_left(&self) -> i32 {
        self.margin_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fields_in_order() {
        let r: Rectangle = "100,50 800x600".parse().unwrap();
        assert_eq!(
            r,
            Rectangle {
                x: 100,
                y: 50,
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn parse_many_valid_strings() {
        for (x, y, w, h) in [(0, 0, 1, 1), (-20, 7, 1920, 1080), (3, -4, 5, 6), (2560, 0, 1, 1440)] {
            let input = format!("{},{} {}x{}", x, y, w, h);
            let r: Rectangle = input.parse().unwrap();
            assert_eq!((r.x, r.y, r.width, r.height), (x, y, w, h));
            assert_eq!(r.to_string(), input);
        }
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let r: Rectangle = "  1,2 3x4\n".parse().unwrap();
        assert_eq!(r.width, 3);
    }

    #[test]
    fn parse_rejects_malformed() {
        for input in [
            "",
            "100,50",
            "100 50 800x600",
            "100,50 800*600",
            "100,50,800x600",
            "a,50 800x600",
            "100,50 800xabc",
            "100,50 800x600x2",
            "100,50  800x600",
            "1.5,2 3x4",
            "+1,2 3x4",
        ] {
            assert!(input.parse::<Rectangle>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn parse_rejects_non_positive_size() {
        assert!("0,0 0x10".parse::<Rectangle>().is_err());
        assert!("0,0 10x0".parse::<Rectangle>().is_err());
        assert!("0,0 -5x10".parse::<Rectangle>().is_err());
    }

    #[test]
    fn bordered_scenario_100x100() {
        let r: Rectangle = "0,0 100x100".parse().unwrap();
        let b = r.bordered(3).unwrap();
        assert_eq!(b.width(), 106);
        assert_eq!(b.height(), 106);
        assert_eq!(b.stride(), 424);
        assert_eq!(b.byte_len(), 44_944);
    }

    #[test]
    fn buffer_size_invariant() {
        for (w, h, border) in [(1, 1, 0), (1, 1, 5), (7, 3, 2), (1920, 1080, 3), (33, 64, 10)] {
            let b = Rectangle { x: 0, y: 0, width: w, height: h }.bordered(border).unwrap();
            assert_eq!(b.stride(), 4 * b.width());
            assert_eq!(b.byte_len(), b.stride() as usize * b.height() as usize);
            assert_eq!(b.width(), w + 2 * border as i32);
            assert_eq!(b.height(), h + 2 * border as i32);
        }
    }

    #[test]
    fn margins_offset_by_border() {
        let b = Rectangle { x: 100, y: 50, width: 10, height: 10 }.bordered(3).unwrap();
        assert_eq!(b.margin_left(), 97);
        assert_eq!(b.margin_top(), 47);

        let at_origin = Rectangle { x: 0, y: 0, width: 10, height: 10 }.bordered(3).unwrap();
        assert_eq!(at_origin.margin_left(), -3);
        assert_eq!(at_origin.margin_top(), -3);
    }

    #[test]
    fn bordered_rejects_overflowing_extent() {
        for input in ["0,0 2147483647x1", "0,0 1x2147483646", "0,0 600000000x1"] {
            let region: Rectangle = input.parse().unwrap();
            let err = region.bordered(3).unwrap_err();
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn bordered_rejects_overflowing_margins() {
        let region: Rectangle = "-2147483648,0 10x10".parse().unwrap();
        assert_eq!(region.bordered(1).unwrap_err().reason, "x minus border overflows");
        assert_eq!(region.bordered(0).unwrap().margin_left(), i32::MIN);

        let region: Rectangle = "0,-2147483647 10x10".parse().unwrap();
        assert_eq!(region.bordered(2).unwrap_err().reason, "y minus border overflows");
    }

    #[test]
    fn bordered_rejects_border_beyond_i32() {
        let region: Rectangle = "0,0 1x1".parse().unwrap();
        let err = region.bordered(u32::MAX).unwrap_err();
        assert_eq!(err.reason, "border is too wide");
        assert!(region.bordered(1 << 31).is_err());
    }

    #[test]
    fn bordered_accepts_largest_stride() {
        // 4 * 536870911 is the widest row that still fits an i32
        let region: Rectangle = "0,0 536870905x1".parse().unwrap();
        let b = region.bordered(3).unwrap();
        assert_eq!(b.stride(), 2_147_483_644);
        assert!(region.bordered(4).is_err());
    }
}
