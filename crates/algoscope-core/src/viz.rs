#![forbid(unsafe_code)]

//! The per-frame visualization contract.
//!
//! A [`Visualization`] owns all of its mutable state and is driven
//! synchronously by the runtime's frame loop: an optional `resize` when the
//! observed surface size changed, then one `frame` call. Nothing runs in
//! parallel with it, and it observes time only through the context.

use crate::surface::Surface;

/// Read-only facts about the frame being rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Logical surface width at the start of this frame.
    pub width: f64,
    /// Logical surface height at the start of this frame.
    pub height: f64,
    /// Index of this frame within the session, starting at 0.
    pub frame_index: u64,
    /// Seconds elapsed on the session's monotonic clock.
    pub time_seconds: f64,
}

impl FrameContext {
    /// Width over height; 1.0 for a degenerate height.
    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// A continuously animated rendering driven one frame at a time.
pub trait Visualization {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Observe a change in logical surface dimensions.
    ///
    /// Called before `frame` on the first frame and whenever the size
    /// changed since the previous frame. Implementations decide whether
    /// live state survives (the default keeps everything).
    fn resize(&mut self, width: f64, height: f64) {
        let _ = (width, height);
    }

    /// Advance internal state and draw one complete frame.
    ///
    /// Must tolerate any surface size, including zero area, without
    /// panicking; skipping the draw entirely is the expected response to a
    /// degenerate size.
    fn frame(&mut self, ctx: &FrameContext, surface: &mut dyn Surface);
}
