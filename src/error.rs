//! Error types for each concern of the marquee.
//!
//! Store errors are recovered locally and reported to the caller, sink
//! errors are classified as transient or not, and render errors are fatal.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a message update at the store boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// The text was empty or had no displayable character.
    #[error("no valid message provided")]
    Empty,
}

/// Failure of a display sink to paint a frame.
#[derive(Error, Debug)]
pub enum SinkError {
    /// An I/O error talking to the device. Usually worth retrying next tick.
    #[error("sink I/O error: {0}")]
    Io(#[from] io::Error),

    /// The device went away (closed pipe, unplugged bus).
    #[error("sink disconnected: {0}")]
    Disconnected(String),

    /// The frame does not match the geometry the sink was opened with.
    #[error("frame is {actual_width}x{actual_height}, sink expects {expected_width}x{expected_height}")]
    FrameSize {
        /// Width the sink was opened with.
        expected_width: usize,
        /// Height the sink was opened with.
        expected_height: usize,
        /// Width of the submitted frame.
        actual_width: usize,
        /// Height of the submitted frame.
        actual_height: usize,
    },
}

impl SinkError {
    /// Whether skipping this frame and trying again next tick makes sense.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io(e) => !matches!(
                e.kind(),
                io::ErrorKind::BrokenPipe | io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
            ),
            Self::Disconnected(_) | Self::FrameSize { .. } => false,
        }
    }
}

/// Fatal end of the render cycle.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The sink kept failing for too many consecutive ticks.
    #[error("display sink failed {failures} frames in a row, last error: {last}")]
    SinkFailed {
        /// Number of consecutive failed frames.
        failures: u32,
        /// The most recent error.
        last: SinkError,
    },

    /// The sink reported an unrecoverable error.
    #[error("display sink error: {0}")]
    Sink(SinkError),

    /// The render thread panicked.
    #[error("render thread panicked")]
    Panicked,
}

/// Problems loading or validating the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_mostly_transient() {
        let timeout = SinkError::Io(io::Error::new(io::ErrorKind::TimedOut, "spi"));
        assert!(timeout.is_transient());

        let gone = SinkError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "spi"));
        assert!(!gone.is_transient());
    }

    #[test]
    fn test_geometry_errors_are_fatal() {
        let err = SinkError::FrameSize {
            expected_width: 32,
            expected_height: 8,
            actual_width: 8,
            actual_height: 32,
        };
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "frame is 8x32, sink expects 32x8");
    }
}
