//! # DotNote
//!
//! A scrolling message marquee for dot-matrix LED displays.
//!
//! DotNote scrolls an operator-supplied message across a chain of 8x8 LED
//! modules, takes new messages over HTTP, and beeps when one is accepted.
//! A new message never interrupts the one on screen: it takes over when the
//! current scroll loop wraps around.
//!
//! ## Core Concepts
//!
//! - **Message store**: one lock-guarded `Arc<str>`, replaced whole
//! - **Scroll renderer**: dedicated thread, fixed cadence, re-reads the
//!   store only at the scroll-reset boundary
//! - **Sinks**: MAX7219 over SPI, a virtual matrix in the terminal, or nothing
//! - **Feedback**: buzzer pulses on a separate thread
//!
//! ## Example
//!
//! ```rust,ignore
//! use dotnote::{MessageStore, NullSink, ScrollConfig, ScrollRenderer};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MessageStore::new("Welcome")?);
//! let mut renderer = ScrollRenderer::new(store.clone(), NullSink, 32, 8, &ScrollConfig::default());
//!
//! store.replace("Bye")?;
//! renderer.tick()?; // still scrolling "Welcome" until the loop wraps
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod config;
pub mod error;
pub mod font;
pub mod server;
pub mod sink;
pub mod store;

// Re-exports for convenience
pub use actor::{FeedbackActor, MessageChanged, RendererActor, ScrollRenderer, TickReport};
pub use buffer::{Bitmap, ContentStrip};
pub use config::{DisplayConfig, DotNoteConfig, ScrollConfig};
pub use error::{ConfigError, MessageError, RenderError, SinkError};
pub use sink::{FrameSink, Max7219Sink, NullSink, TerminalSink};
pub use store::{Message, MessageStore};
