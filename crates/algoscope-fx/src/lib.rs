#![forbid(unsafe_code)]

//! The three Algoscope visualizations.
//!
//! # Role in Algoscope
//! Everything here implements `algoscope_core::Visualization` and is driven
//! one frame at a time by the runtime. Each visualization owns its mutable
//! state exclusively; the only ambient inputs are the frame context (size,
//! frame index, elapsed seconds) and an injected randomness source.
//!
//! # The visualizations
//! - [`sort`]: records the complete shift trace of an insertion sort once,
//!   then replays it at a fixed stride per frame as colored bars.
//! - [`maze`]: grows a depth-first backtracking maze live, a bounded batch
//!   of operations per frame, reseeding itself forever.
//! - [`fractal`]: recomputes an escape-time raster every frame under a
//!   cyclically increasing zoom.
//!
//! # Determinism
//! Given the same dataset/seed and the same sequence of frame contexts,
//! every visualization produces identical draw calls. Tests rely on this;
//! so can hosts that record and replay sessions.

pub mod fractal;
pub mod maze;
pub mod sort;

pub use fractal::{FractalPalette, FractalZoom, ZoomCycle, escape_iterations};
pub use maze::{MazeCell, MazeGenerator, MazeGrid, MazePalette, MazeStep, Walls};
pub use sort::{BarClass, BarPalette, DataSet, Trace, TracePlayer, TraceStep};
