//! Message types for actor communication.

/// Sent by the store to the feedback actor for every accepted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageChanged {
    /// Revision of the newly installed message.
    pub revision: u64,
    /// Length of the new message in characters.
    pub chars: usize,
}

/// What happened during one render tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Scroll offset the frame was drawn at.
    pub offset: usize,
    /// Revision of the message that was drawn.
    pub revision: u64,
    /// Whether the sink accepted the frame.
    pub rendered: bool,
    /// Whether the offset wrapped after this frame (scroll-reset boundary).
    pub reset: bool,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames the sink accepted.
    pub frames: u64,
    /// Frames skipped after a transient sink error.
    pub skipped: u64,
    /// Completed scroll loops.
    pub loops: u64,
    /// Message swaps taken at a reset boundary.
    pub swaps: u64,
}
