#![forbid(unsafe_code)]

//! Frame scheduling contract.
//!
//! A [`FrameScheduler`] runs a supplied callback once before the next
//! display refresh. Cancelling a pending request guarantees the callback
//! never runs. Continuous animation is built on top by re-requesting from
//! inside the callback after the frame's work is done, so frames can never
//! overlap.
//!
//! [`HeadlessScheduler`] queues callbacks and fires them only when a test
//! says so, which makes frame-by-frame assertions trivial.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A one-shot callback run at the next display refresh.
pub type FrameCallback = Box<dyn FnOnce() + 'static>;

/// Handle identifying one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

/// Host contract for display-refresh callbacks.
pub trait FrameScheduler {
    /// Request one invocation of `callback` before the next refresh.
    fn request(&mut self, callback: FrameCallback) -> FrameRequest;

    /// Cancel a pending request.
    ///
    /// After this returns, the cancelled callback is guaranteed not to be
    /// invoked. Cancelling an already-fired or unknown request is a no-op.
    fn cancel(&mut self, request: FrameRequest);
}

/// A manually-stepped scheduler for tests and CI.
///
/// Clones share the same queue, so a test can hold one handle while the
/// session under test owns another.
#[derive(Clone, Default)]
pub struct HeadlessScheduler {
    inner: Rc<RefCell<HeadlessInner>>,
}

#[derive(Default)]
struct HeadlessInner {
    queue: VecDeque<(FrameRequest, FrameCallback)>,
    next_id: u64,
}

impl HeadlessScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Fire the oldest pending callback, if any.
    ///
    /// The callback is removed from the queue before it runs, so it may
    /// freely request the next frame.
    pub fn fire_next(&self) -> bool {
        let entry = self.inner.borrow_mut().queue.pop_front();
        match entry {
            Some((_, callback)) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Fire up to `frames` callbacks, stopping early if the queue drains.
    /// Returns the number actually fired.
    pub fn fire(&self, frames: usize) -> usize {
        let mut fired = 0;
        while fired < frames && self.fire_next() {
            fired += 1;
        }
        fired
    }
}

impl FrameScheduler for HeadlessScheduler {
    fn request(&mut self, callback: FrameCallback) -> FrameRequest {
        let mut inner = self.inner.borrow_mut();
        let id = FrameRequest(inner.next_id);
        inner.next_id += 1;
        inner.queue.push_back((id, callback));
        id
    }

    fn cancel(&mut self, request: FrameRequest) {
        self.inner
            .borrow_mut()
            .queue
            .retain(|(id, _)| *id != request);
    }
}

impl std::fmt::Debug for HeadlessScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
