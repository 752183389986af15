//! ContentStrip: one full loop of scrolling content as pixel columns.
//!
//! The strip is the message followed by the inter-loop spacing. It is
//! logically circular: the column after the last one is column 0 again.

use super::bitmap::Bitmap;
use crate::font::{self, GLYPH_HEIGHT};

/// Rendered columns of message text plus spacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStrip {
    /// One byte per column, bit 0 at the top.
    columns: Vec<u8>,
    /// Pixel width of the message part alone.
    text_width: usize,
}

impl ContentStrip {
    /// Lay out `text` followed by `spacing`.
    pub fn new(text: &str, spacing: &str) -> Self {
        let mut columns = Vec::with_capacity(font::rendered_width(text) + font::rendered_width(spacing));
        font::layout(text, |c| columns.push(c));
        let text_width = columns.len();
        font::layout(spacing, |c| columns.push(c));

        // Keep the modulus non-zero even for degenerate input.
        if columns.is_empty() {
            columns.push(0);
        }

        Self { columns, text_width }
    }

    /// Total width of one loop (text plus spacing). Always at least 1.
    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Width of the text part alone.
    #[inline]
    pub const fn text_width(&self) -> usize {
        self.text_width
    }

    /// Column at `x`, wrapping around the end of the loop.
    #[inline]
    pub fn column(&self, x: usize) -> u8 {
        self.columns[x % self.columns.len()]
    }

    /// Paint the window starting at `offset` into `frame`.
    ///
    /// The 8-row glyph band is centred vertically; frames shorter than a
    /// glyph show its top rows.
    pub fn draw_window(&self, offset: usize, frame: &mut Bitmap) {
        frame.clear();
        let top = frame.height().saturating_sub(GLYPH_HEIGHT) / 2;
        for x in 0..frame.width() {
            frame.put_column(x, top, self.column(offset + x));
        }
    }
}
