#![forbid(unsafe_code)]

//! Sorting replay: record once, play back at a fixed stride.
//!
//! An insertion sort runs to completion up front and every adjacent shift
//! it performs is recorded as a [`TraceStep`]. The [`TracePlayer`] then
//! replays the immutable [`Trace`] as a bar chart, advancing its cursor a
//! fixed number of steps per frame, decoupling replay speed from the
//! sort's actual cost.
//!
//! # Determinism
//!
//! Recording is a pure function of the dataset: the same values always
//! produce the same trace, and the trace length equals the dataset's
//! inversion count.

use algoscope_core::color::Rgba;
use algoscope_core::geometry::Rect;
use algoscope_core::rng::UniformSource;
use algoscope_core::surface::Surface;
use algoscope_core::viz::{FrameContext, Visualization};

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// An immutable ordered sequence of numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    values: Box<[f64]>,
    max: f64,
}

impl DataSet {
    /// Create a dataset from explicit values.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        let max = values.iter().copied().fold(0.0_f64, f64::max);
        Self {
            values: values.into_boxed_slice(),
            max,
        }
    }

    /// Create a dataset of `len` uniform draws from `(0, max_value]`.
    ///
    /// The lower bound is open so every bar has visible height.
    #[must_use]
    pub fn random(len: usize, max_value: f64, rng: &mut dyn UniformSource) -> Self {
        let values = (0..len)
            .map(|_| (1.0 - rng.next_f64()) * max_value)
            .collect();
        Self::from_values(values)
    }

    /// The values, in original order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the dataset holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The largest value (0.0 for an empty dataset).
    #[inline]
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max
    }
}

// ---------------------------------------------------------------------------
// Trace recording
// ---------------------------------------------------------------------------

/// One recorded intermediate state: the array just after a single adjacent
/// shift, plus the classification inputs for coloring.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    values: Box<[f64]>,
    active: usize,
    sorted_prefix: usize,
}

impl TraceStep {
    /// Array snapshot after the shift.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Index the shift just wrote from (the inner-loop index).
    #[inline]
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    /// Length of the already-ordered prefix (the outer-loop index).
    #[inline]
    #[must_use]
    pub const fn sorted_prefix(&self) -> usize {
        self.sorted_prefix
    }
}

/// The complete, immutable shift sequence of one insertion-sort run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    /// Record the full trace for a dataset.
    ///
    /// Only shifts are recorded; the final placement of each key into its
    /// resting slot emits no step, so an already-ordered outer iteration
    /// contributes nothing.
    #[must_use]
    pub fn record(dataset: &DataSet) -> Self {
        let mut values = dataset.values().to_vec();
        let mut steps = Vec::new();
        record_into(&mut values, &mut steps);
        Self { steps }
    }

    /// Steps in execution order.
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Number of recorded steps.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the run performed no shifts.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// In-place insertion sort over `values`, appending one step per shift.
///
/// The key rides along as its neighbors shift past it, so every snapshot
/// is a permutation of the input and consecutive snapshots differ by
/// exactly one adjacent transposition. On return `values` is fully sorted.
fn record_into(values: &mut [f64], steps: &mut Vec<TraceStep>) {
    for i in 1..values.len() {
        let mut j = i;
        while j > 0 && values[j - 1] > values[j] {
            values.swap(j - 1, j);
            steps.push(TraceStep {
                values: values.to_vec().into_boxed_slice(),
                active: j - 1,
                sorted_prefix: i,
            });
            j -= 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Bar classification
// ---------------------------------------------------------------------------

/// Classification of one bar in the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarClass {
    /// Inside the already-ordered prefix.
    Sorted,
    /// The index the current shift wrote from.
    Active,
    /// Not yet reached by the sort.
    Unsorted,
}

impl BarClass {
    /// Classify index `idx` for `step`.
    ///
    /// Precedence: sorted-prefix membership wins over the active index,
    /// which wins over the default.
    #[inline]
    #[must_use]
    pub fn of(idx: usize, step: &TraceStep) -> Self {
        if idx < step.sorted_prefix() {
            Self::Sorted
        } else if idx == step.active_index() {
            Self::Active
        } else {
            Self::Unsorted
        }
    }
}

/// Colors for the three bar classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarPalette {
    /// Bars inside the ordered prefix.
    pub sorted: Rgba,
    /// The bar being shifted.
    pub active: Rgba,
    /// Untouched bars.
    pub unsorted: Rgba,
}

impl BarPalette {
    /// Map a classification to its color.
    #[inline]
    #[must_use]
    pub const fn color_for(&self, class: BarClass) -> Rgba {
        match class {
            BarClass::Sorted => self.sorted,
            BarClass::Active => self.active,
            BarClass::Unsorted => self.unsorted,
        }
    }
}

impl Default for BarPalette {
    fn default() -> Self {
        Self {
            sorted: Rgba::rgb(80, 200, 120),
            active: Rgba::rgb(240, 90, 90),
            unsorted: Rgba::rgb(90, 140, 220),
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Default steps consumed per frame.
pub const DEFAULT_STRIDE: usize = 3;

/// Gap between adjacent bars in logical units.
const BAR_GAP: f64 = 2.0;

/// Replays a recorded trace as a bar chart.
///
/// The cursor advances `stride` steps per frame, clamps at the last step,
/// and holds there; it never moves backwards.
#[derive(Debug, Clone)]
pub struct TracePlayer {
    trace: Trace,
    max_value: f64,
    cursor: usize,
    stride: usize,
    palette: BarPalette,
}

impl TracePlayer {
    /// Record a dataset's trace and build a player over it.
    #[must_use]
    pub fn new(dataset: &DataSet) -> Self {
        Self {
            trace: Trace::record(dataset),
            max_value: dataset.max_value(),
            cursor: 0,
            stride: DEFAULT_STRIDE,
            palette: BarPalette::default(),
        }
    }

    /// Replay a pre-recorded trace. `max_value` scales bar heights.
    #[must_use]
    pub fn from_trace(trace: Trace, max_value: f64) -> Self {
        Self {
            trace,
            max_value,
            cursor: 0,
            stride: DEFAULT_STRIDE,
            palette: BarPalette::default(),
        }
    }

    /// Set the steps consumed per frame (minimum 1).
    #[must_use]
    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// Set the bar colors.
    #[must_use]
    pub fn palette(mut self, palette: BarPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Current cursor position.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// True once the cursor rests on the final step.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.trace.is_empty() && self.cursor == self.trace.len() - 1
    }

    /// Advance the cursor by the stride, clamped to the last step.
    fn advance(&mut self) {
        let last = self.trace.len().saturating_sub(1);
        self.cursor = (self.cursor + self.stride).min(last);
    }

    fn draw_step(&self, step: &TraceStep, ctx: &FrameContext, surface: &mut dyn Surface) {
        let count = step.values().len();
        if count == 0 || self.max_value <= 0.0 {
            return;
        }

        let slot = ctx.width / count as f64;
        let bar_width = (slot - BAR_GAP).max(1.0);

        for (idx, &value) in step.values().iter().enumerate() {
            let height = (value / self.max_value).clamp(0.0, 1.0) * ctx.height;
            let rect = Rect::new(
                idx as f64 * slot + (slot - bar_width) * 0.5,
                ctx.height - height,
                bar_width,
                height,
            );
            let color = self.palette.color_for(BarClass::of(idx, step));
            surface.fill_rect(rect, color);
        }
    }
}

impl Visualization for TracePlayer {
    fn name(&self) -> &'static str {
        "sort-replay"
    }

    fn frame(&mut self, ctx: &FrameContext, surface: &mut dyn Surface) {
        // An empty trace idles: nothing to draw, but the session keeps
        // scheduling frames.
        if self.trace.is_empty() {
            return;
        }
        self.advance();
        if ctx.width <= 0.0 || ctx.height <= 0.0 {
            return;
        }
        let step = &self.trace.steps[self.cursor];
        self.draw_step(step, ctx, surface);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
