//! Renderer Actor: the scrolling render cycle on a dedicated thread.
//!
//! [`ScrollRenderer`] owns the sink and the scroll cursor. Each tick it
//! draws the window at the current offset, hands it to the sink and moves
//! one pixel on. The message is re-read from the store only when the offset
//! wraps, so a frame never mixes two messages.
//!
//! [`RendererActor`] runs a renderer at a fixed cadence until shutdown or a
//! fatal sink error.

use super::messages::{RenderStats, TickReport};
use super::ticker::Pacer;
use crate::buffer::{Bitmap, ContentStrip};
use crate::config::ScrollConfig;
use crate::error::RenderError;
use crate::sink::FrameSink;
use crate::store::{Message, MessageStore};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// The renderer's private scroll cursor.
#[derive(Debug)]
struct ScrollState {
    /// Message being scrolled, captured at the last reset.
    source: Message,
    /// Rendered columns of `source` plus spacing.
    strip: ContentStrip,
    /// Left edge of the visible window, `0 <= offset < strip.width()`.
    offset: usize,
}

/// Renders the current message as a horizontally scrolling marquee.
pub struct ScrollRenderer<S: FrameSink> {
    store: Arc<MessageStore>,
    sink: S,
    spacing: String,
    state: ScrollState,
    /// Reused frame buffer.
    frame: Bitmap,
    consecutive_failures: u32,
    max_sink_failures: u32,
    stats: RenderStats,
}

impl<S: FrameSink> ScrollRenderer<S> {
    /// Create a renderer drawing `width x height` frames into `sink`.
    pub fn new(
        store: Arc<MessageStore>,
        sink: S,
        width: usize,
        height: usize,
        scroll: &ScrollConfig,
    ) -> Self {
        let source = store.snapshot();
        let strip = ContentStrip::new(&source.text, &scroll.spacing);
        Self {
            store,
            sink,
            spacing: scroll.spacing.clone(),
            state: ScrollState {
                source,
                strip,
                offset: 0,
            },
            frame: Bitmap::new(width, height),
            consecutive_failures: 0,
            max_sink_failures: scroll.max_sink_failures.max(1),
            stats: RenderStats::default(),
        }
    }

    /// Current scroll offset.
    pub const fn offset(&self) -> usize {
        self.state.offset
    }

    /// Pixel width of one full loop of the current content.
    pub fn content_width(&self) -> usize {
        self.state.strip.width()
    }

    /// Message currently being scrolled.
    pub const fn source(&self) -> &Message {
        &self.state.source
    }

    /// Counters since the renderer was created.
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Get a reference to the sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Draw and submit one frame, then advance the offset.
    ///
    /// A transient sink error skips the frame; the offset advances anyway.
    /// Too many in a row, or any non-transient error, is fatal.
    pub fn tick(&mut self) -> Result<TickReport, RenderError> {
        let offset = self.state.offset;
        let revision = self.state.source.revision;
        self.state.strip.draw_window(offset, &mut self.frame);

        let rendered = match self.sink.render_frame(&self.frame) {
            Ok(()) => {
                self.consecutive_failures = 0;
                self.stats.frames += 1;
                true
            }
            Err(e) if e.is_transient() => {
                self.consecutive_failures += 1;
                self.stats.skipped += 1;
                if self.consecutive_failures >= self.max_sink_failures {
                    return Err(RenderError::SinkFailed {
                        failures: self.consecutive_failures,
                        last: e,
                    });
                }
                warn!(offset, failures = self.consecutive_failures, error = %e, "frame skipped");
                false
            }
            Err(e) => return Err(RenderError::Sink(e)),
        };

        let reset = self.advance();
        Ok(TickReport {
            offset,
            revision,
            rendered,
            reset,
        })
    }

    /// Move one pixel on. Returns `true` at the scroll-reset boundary.
    fn advance(&mut self) -> bool {
        self.state.offset += 1;
        if self.state.offset < self.state.strip.width() {
            return false;
        }

        self.state.offset = 0;
        self.stats.loops += 1;
        self.resync();
        true
    }

    /// Adopt the store's latest message if it changed since the last loop.
    fn resync(&mut self) {
        let latest = self.store.snapshot();
        if latest.revision == self.state.source.revision {
            return;
        }

        self.state.strip = ContentStrip::new(&latest.text, &self.spacing);
        debug!(
            revision = latest.revision,
            text_width = self.state.strip.text_width(),
            content_width = self.state.strip.width(),
            "switched to new message"
        );
        self.state.source = latest;
        self.stats.swaps += 1;
    }
}

/// Renderer actor that drives a [`ScrollRenderer`] at a fixed cadence.
pub struct RendererActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<Result<RenderStats, RenderError>>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Disconnects when the render thread exits, for any reason.
    exited: Receiver<()>,
}

impl RendererActor {
    /// Spawn the render thread.
    ///
    /// # Arguments
    ///
    /// * `renderer` - The renderer to drive; its sink moves to the thread.
    /// * `interval` - Time between scroll steps.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the render thread.
    pub fn spawn<S>(renderer: ScrollRenderer<S>, interval: Duration) -> Self
    where
        S: FrameSink + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let (exit_tx, exited) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("dotnote-render".to_string())
            .spawn(move || Self::run_loop(renderer, &shutdown_clone, interval, exit_tx))
            .expect("Failed to spawn render thread");

        Self {
            handle: Some(handle),
            shutdown,
            exited,
        }
    }

    /// A receiver whose `recv()` returns once the render thread has exited.
    pub fn exited(&self) -> Receiver<()> {
        self.exited.clone()
    }

    /// Signal the render thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the render thread and wait for it.
    pub fn join(mut self) -> Result<RenderStats, RenderError> {
        self.shutdown();
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(RenderError::Panicked),
            None => Ok(RenderStats::default()),
        }
    }

    /// Main render loop.
    fn run_loop<S: FrameSink>(
        mut renderer: ScrollRenderer<S>,
        shutdown: &AtomicBool,
        interval: Duration,
        // Dropped on return, which wakes anyone waiting on `exited`.
        _exit_tx: Sender<()>,
    ) -> Result<RenderStats, RenderError> {
        info!(
            width = renderer.frame.width(),
            height = renderer.frame.height(),
            interval = ?interval,
            "render loop started"
        );
        let mut pacer = Pacer::new(interval);

        while let Some(tick) = pacer.wait(shutdown) {
            if let Err(e) = renderer.tick() {
                error!(frame = tick.frame, uptime = ?tick.elapsed, error = %e, "render loop stopped");
                return Err(e);
            }
        }

        let stats = renderer.stats();
        info!(frames = stats.frames, loops = stats.loops, "render loop stopped");
        Ok(stats)
    }
}

impl Drop for RendererActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
