#![forbid(unsafe_code)]

//! The per-visualization session object.
//!
//! A [`Session`] is the single owner of a visualization's frame loop. Its
//! scheduled callback holds only a weak reference back to the session
//! state, so a stopped or dropped session cannot be revived by a stale
//! callback, and the cancellation guarantee of the scheduler contract
//! means `stop()` leaves nothing running against a detached surface.
//!
//! Resize handling: the surface is polled at the start of every frame and
//! the visualization's `resize` hook runs before the frame body whenever
//! the observed size changed (including before the very first frame).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use algoscope_core::clock::Clock;
use algoscope_core::sched::{FrameRequest, FrameScheduler};
use algoscope_core::surface::Surface;
use algoscope_core::viz::{FrameContext, Visualization};

/// A shared handle to the host-owned drawing surface.
pub type SharedSurface = Rc<RefCell<dyn Surface>>;

struct SessionInner {
    viz: Box<dyn Visualization>,
    surface: SharedSurface,
    scheduler: Box<dyn FrameScheduler>,
    clock: Box<dyn Clock>,
    pending: Option<FrameRequest>,
    running: bool,
    frames_rendered: u64,
    observed_size: Option<(f64, f64)>,
}

/// A running visualization: one loop, one cancellation handle.
pub struct Session {
    inner: Rc<RefCell<SessionInner>>,
}

impl Session {
    /// Start a visualization against its host collaborators and schedule
    /// the first frame.
    pub fn start(
        viz: Box<dyn Visualization>,
        surface: SharedSurface,
        scheduler: Box<dyn FrameScheduler>,
        clock: Box<dyn Clock>,
    ) -> Self {
        info!(viz = viz.name(), "session starting");
        let inner = Rc::new(RefCell::new(SessionInner {
            viz,
            surface,
            scheduler,
            clock,
            pending: None,
            running: true,
            frames_rendered: 0,
            observed_size: None,
        }));
        Self::schedule(&inner);
        Self { inner }
    }

    /// Register the next frame callback. Exactly one request is pending at
    /// any time while the session runs.
    fn schedule(inner: &Rc<RefCell<SessionInner>>) {
        let weak: Weak<RefCell<SessionInner>> = Rc::downgrade(inner);
        let mut state = inner.borrow_mut();
        debug_assert!(state.pending.is_none(), "overlapping frame request");
        let request = state.scheduler.request(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::on_frame(&inner);
            }
        }));
        state.pending = Some(request);
    }

    /// One frame: observe size, run the visualization, re-request.
    fn on_frame(inner: &Rc<RefCell<SessionInner>>) {
        {
            let mut state = inner.borrow_mut();
            state.pending = None;
            if !state.running {
                return;
            }

            let (width, height) = {
                let surface = state.surface.borrow();
                (surface.width(), surface.height())
            };

            if width > 0.0 && height > 0.0 {
                if state.observed_size != Some((width, height)) {
                    if state.observed_size.is_some() {
                        debug!(viz = state.viz.name(), width, height, "surface resized");
                    }
                    state.observed_size = Some((width, height));
                    state.viz.resize(width, height);
                }

                let ctx = FrameContext {
                    width,
                    height,
                    frame_index: state.frames_rendered,
                    time_seconds: state.clock.now_millis() / 1000.0,
                };

                let state = &mut *state;
                let mut surface = state.surface.borrow_mut();
                state.viz.frame(&ctx, &mut *surface);
                drop(surface);
                state.frames_rendered += 1;
            }
            // Zero-area surfaces skip the frame body but keep the loop
            // alive; the next callback retries.
        }

        let running = inner.borrow().running;
        if running {
            Self::schedule(inner);
        }
    }

    /// Tear the session down.
    ///
    /// Cancels the pending frame request; the scheduler contract then
    /// guarantees the loop never runs again. Idempotent.
    pub fn stop(&self) {
        let mut state = self.inner.borrow_mut();
        if !state.running {
            return;
        }
        state.running = false;
        if let Some(request) = state.pending.take() {
            state.scheduler.cancel(request);
        }
        info!(
            viz = state.viz.name(),
            frames = state.frames_rendered,
            "session stopped"
        );
    }

    /// True until `stop()` is called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Number of frames whose body actually ran (zero-area skips and
    /// cancelled callbacks do not count).
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.inner.borrow().frames_rendered
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Session")
            .field("viz", &state.viz.name())
            .field("running", &state.running)
            .field("frames_rendered", &state.frames_rendered)
            .finish()
    }
}
