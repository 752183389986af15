//! Actor Model: the threads that keep the marquee moving.
//!
//! - **Render Actor**: owns the display sink, scrolls at a fixed cadence
//! - **Feedback Actor**: beeps when a new message is accepted
//! - **Request handlers** (on the HTTP runtime): replace the message
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  replace()   ┌──────────────┐  snapshot() at   ┌──────────────┐
//! │ HTTP handler │ ───────────▶ │ MessageStore │ ◀─────────────── │Render Thread │──▶ sink
//! └──────────────┘              └──────────────┘   each reset     └──────────────┘
//!                                      │
//!                                      │ MessageChanged
//!                                      ▼
//!                               ┌──────────────┐
//!                               │Feedback Thrd │──▶ buzzer
//!                               └──────────────┘
//! ```

mod feedback;
mod messages;
mod renderer;
mod ticker;

pub use feedback::{signal, FeedbackActor, GpioBuzzer, PulseOutput, TerminalBell};
pub use messages::{MessageChanged, RenderStats, TickReport};
pub use renderer::{RendererActor, ScrollRenderer};
pub use ticker::{Pacer, Tick};
