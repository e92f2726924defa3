//! Border rasterizer
//!
//! Writes the glowing border straight into 32-bit ARGB cells. No drawing
//! library is involved: the whole frame is cleared and every border pixel is
//! rewritten each time.

use crate::domain::pulse::BorderColor;

/// Minimum gradient factor, reached on the outermost pixel row
pub const GRADIENT_FLOOR: f64 = 0.8;

/// Mutable view of a pixel buffer as `width * height` little-endian u32 cells
pub struct PixelCanvas<'a> {
    bytes: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelCanvas<'a> {
    /// Wrap a byte slice. Returns `None` if it is too small for the extent.
    pub fn new(bytes: &'a mut [u8], width: usize, height: usize) -> Option<Self> {
        if bytes.len() < width * height * 4 {
            return None;
        }
        Some(Self {
            bytes,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Zero every cell
    pub fn clear(&mut self) {
        self.bytes[..self.width * self.height * 4].fill(0);
    }

    pub fn put(&mut self, x: usize, y: usize, pixel: u32) {
        let offset = (y * self.width + x) * 4;
        self.bytes[offset..offset + 4].copy_from_slice(&pixel.to_le_bytes());
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        let offset = (y * self.width + x) * 4;
        let mut cell = [0u8; 4];
        cell.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_le_bytes(cell)
    }
}

/// Distance from (x, y) to the nearest edge, if it lies within `border` of one
pub fn edge_distance(x: usize, y: usize, width: usize, height: usize, border: usize) -> Option<usize> {
    let d = x.min(y).min(width - 1 - x).min(height - 1 - y);
    (d < border).then_some(d)
}

/// Alpha attenuation for a border pixel `d` pixels in from the outer edge.
///
/// Outer pixels keep 80% of the base alpha and the factor grows linearly
/// towards the inner edge.
pub fn gradient_factor(d: usize, border: usize) -> f64 {
    if border == 0 {
        return 1.0;
    }
    GRADIENT_FLOOR + (1.0 - GRADIENT_FLOOR) * (d as f64 / border as f64)
}

/// Clear the canvas and draw a `border`-pixel frame around its edge
pub fn draw_border(canvas: &mut PixelCanvas<'_>, color: BorderColor, border: u32) {
    let (width, height) = (canvas.width(), canvas.height());
    let border = border as usize;

    canvas.clear();

    for y in 0..height {
        for x in 0..width {
            let Some(d) = edge_distance(x, y, width, height, border) else {
                continue;
            };
            let alpha = (color.alpha as f64 * gradient_factor(d, border)).round() as u8;
            canvas.put(x, y, color.with_alpha(alpha).pack());
        }
    }
}
