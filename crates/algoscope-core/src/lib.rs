#![forbid(unsafe_code)]

//! Core: the contracts every Algoscope visualization is written against.
//!
//! # Role in Algoscope
//! `algoscope-core` is the vocabulary layer. It owns the host-facing
//! contracts (drawing surface, frame scheduling, monotonic clock, uniform
//! randomness) and the `Visualization` trait the runtime drives. It has no
//! opinion about what gets drawn.
//!
//! # Primary responsibilities
//! - **Surface**: logical-unit drawing primitives (fill, stroke, blit) plus
//!   a headless recording implementation for tests.
//! - **FrameScheduler**: request-one-callback-before-next-refresh with a
//!   cancellation guarantee, plus a headless single-stepping scheduler.
//! - **Clock / UniformSource**: the only two ambient effects a
//!   visualization may observe, both injected so tests stay deterministic.
//! - **Visualization**: the per-frame trait object consumed by
//!   `algoscope-runtime`.
//!
//! # How it fits in the system
//! The effects crate (`algoscope-fx`) implements `Visualization` against
//! these contracts; the runtime (`algoscope-runtime`) wires a visualization
//! to concrete host collaborators and drives the cooperative frame loop.
//! Hosts only ever implement `Surface` and `FrameScheduler`.

pub mod clock;
pub mod color;
pub mod geometry;
pub mod rng;
pub mod sched;
pub mod surface;
pub mod viz;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use color::Rgba;
pub use geometry::Rect;
pub use rng::{SplitMix64, UniformSource};
pub use sched::{FrameCallback, FrameRequest, FrameScheduler, HeadlessScheduler};
pub use surface::{DrawOp, HeadlessSurface, Raster, Surface};
pub use viz::{FrameContext, Visualization};
