//! `TerminalSink`: a virtual LED matrix drawn with terminal cells.
//!
//! Every frame is queued into a pre-allocated byte buffer as crossterm
//! commands, then written to the terminal in a single `write()` so a frame
//! never shows up half-drawn.

use super::{check_size, FrameSink};
use crate::buffer::Bitmap;
use crate::error::SinkError;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

/// Glyph for a lit LED.
pub const LIT_DOT: &str = "●";
/// Glyph for a dark LED.
pub const DARK_DOT: &str = "·";

/// Terminal columns per LED, so the matrix keeps a roughly square aspect.
const COLUMNS_PER_PIXEL: usize = 2;

/// Colour of dark LEDs.
const DARK_COLOR: Color = Color::Rgb { r: 48, g: 16, b: 16 };

/// Sink painting frames onto a terminal.
pub struct TerminalSink<W: Write> {
    /// Terminal (or any writer in tests).
    out: W,
    /// Pre-allocated output buffer, flushed once per frame.
    output: Vec<u8>,
    /// Frame width in pixels.
    width: usize,
    /// Frame height in pixels.
    height: usize,
    /// Colour of lit LEDs, derived from brightness.
    lit_color: Color,
    /// Whether we switched the terminal into the alternate screen.
    owns_terminal: bool,
}

impl TerminalSink<Stdout> {
    /// Take over stdout: alternate screen, hidden cursor.
    ///
    /// The terminal is restored when the sink is dropped. Raw mode stays
    /// off so Ctrl-C still reaches the process as a signal.
    pub fn stdout(width: usize, height: usize, brightness: u8) -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        let mut sink = Self::new(stdout, width, height, brightness);
        sink.owns_terminal = true;
        Ok(sink)
    }
}

impl<W: Write> TerminalSink<W> {
    /// Draw onto an arbitrary writer, leaving terminal modes alone.
    pub fn new(out: W, width: usize, height: usize, brightness: u8) -> Self {
        let cells_per_row = width * COLUMNS_PER_PIXEL;
        Self {
            out,
            // Worst case: a colour change per pixel.
            output: Vec::with_capacity(height * cells_per_row * 24 + 64),
            width,
            height,
            lit_color: lit_color(brightness),
            owns_terminal: false,
        }
    }

    /// Get a reference to the underlying writer.
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// Queue one frame into `self.output`.
    fn compose(&mut self, frame: &Bitmap) -> io::Result<()> {
        self.output.clear();
        for (y, row) in frame.rows().enumerate() {
            // Bounded by the frame height, which the sink was sized for.
            #[allow(clippy::cast_possible_truncation)]
            queue!(self.output, MoveTo(0, y as u16))?;

            let mut current: Option<bool> = None;
            for &on in row {
                if current != Some(on) {
                    let color = if on { self.lit_color } else { DARK_COLOR };
                    queue!(self.output, SetForegroundColor(color))?;
                    current = Some(on);
                }
                let dot = if on { LIT_DOT } else { DARK_DOT };
                queue!(self.output, Print(dot))?;
                for _ in dot.width()..COLUMNS_PER_PIXEL {
                    self.output.push(b' ');
                }
            }
        }
        queue!(self.output, ResetColor)
    }
}

impl<W: Write + Send> FrameSink for TerminalSink<W> {
    fn render_frame(&mut self, frame: &Bitmap) -> Result<(), SinkError> {
        check_size(frame, self.width, self.height)?;
        self.compose(frame)?;

        // Flush to terminal in a single write
        self.out.write_all(&self.output)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSink<W> {
    fn drop(&mut self) {
        if self.owns_terminal {
            let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        }
    }
}

/// Red that gets brighter with the configured intensity (0..=15).
fn lit_color(brightness: u8) -> Color {
    let level = brightness.min(15);
    Color::Rgb {
        r: 105 + level * 10,
        g: 24 + level * 2,
        b: 24 + level * 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_of(bytes: &[u8], rows: u16, cols: u16) -> vt100::Parser {
        let mut parser = vt100::Parser::new(rows, cols, 0);
        parser.process(bytes);
        parser
    }

    #[test]
    fn test_frame_drawn_as_dots() {
        let mut sink = TerminalSink::new(Vec::new(), 4, 2, 15);
        let mut frame = Bitmap::new(4, 2);
        frame.set(0, 0, true);
        frame.set(3, 1, true);
        sink.render_frame(&frame).unwrap();

        let parser = screen_of(sink.writer(), 4, 16);
        let screen = parser.screen();
        assert_eq!(screen.cell(0, 0).unwrap().contents(), LIT_DOT);
        assert_eq!(screen.cell(0, 2).unwrap().contents(), DARK_DOT);
        assert_eq!(screen.cell(1, 6).unwrap().contents(), LIT_DOT);
        assert_eq!(
            screen.cell(0, 0).unwrap().fgcolor(),
            vt100::Color::Rgb(255, 54, 54)
        );
    }

    #[test]
    fn test_each_frame_redraws_in_place() {
        let mut sink = TerminalSink::new(Vec::new(), 2, 1, 5);
        let mut frame = Bitmap::new(2, 1);
        frame.set(0, 0, true);
        sink.render_frame(&frame).unwrap();

        frame.clear();
        frame.set(1, 0, true);
        sink.render_frame(&frame).unwrap();

        let parser = screen_of(sink.writer(), 2, 8);
        let row: Vec<String> = (0..4)
            .map(|col| parser.screen().cell(0, col).unwrap().contents())
            .collect();
        assert_eq!(row[0], DARK_DOT);
        assert_eq!(row[2], LIT_DOT);
    }

    #[test]
    fn test_wrong_size_rejected() {
        let mut sink = TerminalSink::new(Vec::new(), 4, 2, 5);
        let err = sink.render_frame(&Bitmap::new(2, 4)).unwrap_err();
        assert!(matches!(err, SinkError::FrameSize { .. }));
        assert!(sink.writer().is_empty());
    }

    #[test]
    fn test_brightness_scales_colour() {
        assert_eq!(lit_color(0), Color::Rgb { r: 105, g: 24, b: 24 });
        assert_eq!(lit_color(99), lit_color(15));
    }
}
