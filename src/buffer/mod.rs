//! Buffer module: pixel data passed from the renderer to the sinks.
//!
//! This module contains:
//! - [`Bitmap`]: One frame of the display as a monochrome pixel grid
//! - [`ContentStrip`]: One loop of scrolling content as pixel columns

mod bitmap;
mod strip;

pub use bitmap::Bitmap;
pub use strip::ContentStrip;
