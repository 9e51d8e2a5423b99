#![forbid(unsafe_code)]

//! Runtime: one session object per live visualization.
//!
//! # Role in Algoscope
//! `algoscope-runtime` owns the cooperative frame loop. A [`Session`] wires
//! a `Visualization` to its host collaborators (surface, frame scheduler,
//! clock), requests exactly one frame callback at a time, and re-requests
//! only after the current frame's work is done — frames can never overlap
//! and no computation runs in parallel with another.
//!
//! # Lifecycle
//! [`Session::start`] schedules the first frame; [`Session::stop`] (or
//! dropping the session) cancels the single pending request, after which
//! the host is guaranteed to never invoke the loop again. All per-instance
//! mutable state lives inside the session — nothing is ambient or global.
//!
//! # Failure posture
//! The loop is fail-silent and self-healing: a zero-area surface skips the
//! frame body and retries on the next callback; there are no user-visible
//! error states.

pub mod entropy;
pub mod session;

pub use entropy::ThreadRandom;
pub use session::{Session, SharedSurface};
