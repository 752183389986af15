//! Pacer: sleep-until-next-tick scheduling for the render thread.
//!
//! Ticks are spaced by a fixed interval measured from the start, not from
//! the end of the previous tick, so render time does not accumulate as
//! drift. A tick that falls behind is not queued up: the schedule restarts
//! from now.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Longest single sleep, so shutdown is noticed promptly.
const MAX_NAP: Duration = Duration::from_millis(10);

/// A tick event produced at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the pacer was started.
    pub elapsed: Duration,
}

/// Fixed-period tick scheduler.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    start: Instant,
    next_tick: Instant,
    frame: u64,
}

impl Pacer {
    /// Start a schedule whose first tick is due immediately.
    pub fn new(interval: Duration) -> Self {
        let start = Instant::now();
        Self {
            interval,
            start,
            next_tick: start,
            frame: 0,
        }
    }

    /// Sleep until the next tick is due.
    ///
    /// Returns `None` if `shutdown` was raised while waiting.
    pub fn wait(&mut self, shutdown: &AtomicBool) -> Option<Tick> {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return None;
            }

            let now = Instant::now();
            if now >= self.next_tick {
                let tick = Tick {
                    frame: self.frame,
                    elapsed: now - self.start,
                };

                self.frame += 1;
                self.next_tick += self.interval;

                // Handle case where we're behind (catch up without queuing)
                if self.next_tick < now {
                    self.next_tick = now + self.interval;
                }
                return Some(tick);
            }

            // Sleep until next tick
            thread::sleep((self.next_tick - now).min(MAX_NAP));
        }
    }
}
