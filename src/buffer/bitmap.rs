//! Bitmap: a monochrome pixel grid, one frame of the display.
//!
//! Pixels are stored contiguously in row-major order.

use std::fmt;

/// A grid of on/off pixels.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<bool>,
    /// Width in pixels.
    width: usize,
    /// Height in pixels.
    height: usize,
}

impl Bitmap {
    /// Create a new bitmap with every pixel off.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "Bitmap dimensions must be non-zero");
        Self {
            pixels: vec![false; width * height],
            width,
            height,
        }
    }

    /// Get the bitmap width.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Get the bitmap height.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub const fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Whether the pixel at (x, y) is lit. Out of bounds reads as off.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.index_of(x, y).is_some_and(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.pixels[idx] = on;
            true
        } else {
            false
        }
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    /// Paint an 8-pixel column byte (bit 0 on top) at column `x`, starting
    /// at row `top`. Rows outside the bitmap are clipped.
    #[inline]
    pub fn put_column(&mut self, x: usize, top: usize, column: u8) {
        for bit in 0..8 {
            self.set(x, top + bit, column & (1 << bit) != 0);
        }
    }

    /// A copy rotated clockwise by `quarter_turns` * 90 degrees.
    #[must_use]
    pub fn rotated(&self, quarter_turns: u8) -> Self {
        match quarter_turns % 4 {
            0 => self.clone(),
            1 => {
                let mut out = Self::new(self.height, self.width);
                for y in 0..self.height {
                    for x in 0..self.width {
                        out.set(self.height - 1 - y, x, self.get(x, y));
                    }
                }
                out
            }
            2 => {
                let mut out = Self::new(self.width, self.height);
                for y in 0..self.height {
                    for x in 0..self.width {
                        out.set(self.width - 1 - x, self.height - 1 - y, self.get(x, y));
                    }
                }
                out
            }
            _ => {
                let mut out = Self::new(self.height, self.width);
                for y in 0..self.height {
                    for x in 0..self.width {
                        out.set(y, self.width - 1 - x, self.get(x, y));
                    }
                }
                out
            }
        }
    }

    /// Copy of the `w x h` region with top-left corner (x, y).
    #[must_use]
    pub fn crop(&self, x: usize, y: usize, w: usize, h: usize) -> Self {
        let mut out = Self::new(w, h);
        for dy in 0..h {
            for dx in 0..w {
                out.set(dx, dy, self.get(x + dx, y + dy));
            }
        }
        out
    }

    /// Iterate rows as slices of pixels.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks_exact(self.width)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitmap {}x{}", self.width, self.height)?;
        for row in self.rows() {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(bitmap: &Bitmap) -> usize {
        bitmap.rows().flatten().filter(|&&p| p).count()
    }

    #[test]
    fn test_bitmap_creation() {
        let bitmap = Bitmap::new(32, 8);
        assert_eq!(bitmap.width(), 32);
        assert_eq!(bitmap.height(), 8);
        assert_eq!(lit(&bitmap), 0);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_size_panics() {
        let _ = Bitmap::new(0, 8);
    }

    #[test]
    fn test_set_get_bounds() {
        let mut bitmap = Bitmap::new(4, 2);
        assert!(bitmap.set(3, 1, true));
        assert!(bitmap.get(3, 1));
        assert!(!bitmap.set(4, 0, true));
        assert!(!bitmap.get(10, 10));
        assert_eq!(lit(&bitmap), 1);

        bitmap.clear();
        assert_eq!(lit(&bitmap), 0);
    }

    #[test]
    fn test_put_column_clips() {
        let mut bitmap = Bitmap::new(1, 4);
        bitmap.put_column(0, 0, 0b1111_0101);
        assert!(bitmap.get(0, 0));
        assert!(!bitmap.get(0, 1));
        assert!(bitmap.get(0, 2));
        assert!(!bitmap.get(0, 3));
    }

    #[test]
    fn test_rotation() {
        // 3x2, one pixel at top-left.
        let mut bitmap = Bitmap::new(3, 2);
        bitmap.set(0, 0, true);

        let cw = bitmap.rotated(1);
        assert_eq!((cw.width(), cw.height()), (2, 3));
        assert!(cw.get(1, 0));

        let half = bitmap.rotated(2);
        assert!(half.get(2, 1));

        let ccw = bitmap.rotated(3);
        assert_eq!((ccw.width(), ccw.height()), (2, 3));
        assert!(ccw.get(0, 2));

        assert_eq!(bitmap.rotated(1).rotated(3), bitmap);
        assert_eq!(bitmap.rotated(4), bitmap);
    }

    #[test]
    fn test_crop() {
        let mut bitmap = Bitmap::new(16, 8);
        bitmap.set(9, 3, true);
        let block = bitmap.crop(8, 0, 8, 8);
        assert!(block.get(1, 3));
        assert_eq!(lit(&block), 1);
    }
}
