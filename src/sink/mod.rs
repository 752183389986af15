//! Display sinks: where rendered frames end up.
//!
//! A sink is owned by the render thread and receives one [`Bitmap`] per
//! tick. Implementations:
//! - [`TerminalSink`]: virtual LED matrix drawn in a terminal
//! - [`Max7219Sink`]: cascaded MAX7219 8x8 modules over SPI
//! - [`NullSink`]: discards frames (headless runs)

mod max7219;
mod terminal;

pub use max7219::{Max7219Sink, Register};
pub use terminal::TerminalSink;

use crate::buffer::Bitmap;
use crate::error::SinkError;

/// Output device for rendered frames.
pub trait FrameSink: Send {
    /// Paint `frame` on the device.
    ///
    /// Transient failures are reported as errors for which
    /// [`SinkError::is_transient`] holds; the caller decides whether to
    /// skip the frame or give up.
    fn render_frame(&mut self, frame: &Bitmap) -> Result<(), SinkError>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn render_frame(&mut self, frame: &Bitmap) -> Result<(), SinkError> {
        (**self).render_frame(frame)
    }
}

/// Sink that accepts and drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn render_frame(&mut self, _frame: &Bitmap) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Reject frames whose size differs from what the sink was opened with.
pub(crate) fn check_size(frame: &Bitmap, width: usize, height: usize) -> Result<(), SinkError> {
    if frame.width() == width && frame.height() == height {
        Ok(())
    } else {
        Err(SinkError::FrameSize {
            expected_width: width,
            expected_height: height,
            actual_width: frame.width(),
            actual_height: frame.height(),
        })
    }
}
