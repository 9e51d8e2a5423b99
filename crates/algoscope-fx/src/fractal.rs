#![forbid(unsafe_code)]

//! Cycling fractal zoom.
//!
//! Every frame recomputes a full escape-time raster for a viewport centered
//! on a fixed complex-plane point, with the viewport extent shrinking
//! exponentially over a repeating cycle. Resetting the zoom epoch at the
//! end of each cycle keeps coordinates well inside f64 precision instead of
//! diving forever.
//!
//! # Determinism
//!
//! The raster is a pure function of (surface size, elapsed seconds within
//! the cycle, parameters). Nothing carries over between frames except the
//! cycle epoch; the pixel allocation is reused but every pixel is rewritten.

use algoscope_core::color::Rgba;
use algoscope_core::surface::{Raster, Surface};
use algoscope_core::viz::{FrameContext, Visualization};

// ---------------------------------------------------------------------------
// Escape-time iteration
// ---------------------------------------------------------------------------

/// Count iterations of z ← z² + c (starting from z = c) until |z|² exceeds
/// 4.0, capped at `max_iterations`. Reaching the cap classifies the point
/// as interior.
#[inline]
#[must_use]
pub fn escape_iterations(c_re: f64, c_im: f64, max_iterations: u32) -> u32 {
    let mut z_re = c_re;
    let mut z_im = c_im;
    for i in 0..max_iterations {
        let re_sq = z_re * z_re;
        let im_sq = z_im * z_im;
        if re_sq + im_sq > 4.0 {
            return i;
        }
        z_im = 2.0 * z_re * z_im + c_im;
        z_re = re_sq - im_sq + c_re;
    }
    max_iterations
}

// ---------------------------------------------------------------------------
// Zoom cycle
// ---------------------------------------------------------------------------

/// Default exponential growth base per second.
pub const DEFAULT_ZOOM_BASE: f64 = 1.5;

/// Default cycle length in seconds.
pub const DEFAULT_ZOOM_PERIOD: f64 = 20.0;

/// An epoch-resetting exponential zoom.
///
/// The factor is `base^(now − epoch)`; once a full period elapses the
/// epoch snaps to "now", so the factor is 1.0 at the start of every cycle
/// and strictly increases within it.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomCycle {
    base: f64,
    period_seconds: f64,
    epoch_seconds: f64,
}

impl ZoomCycle {
    /// Create a cycle with epoch at time zero.
    #[must_use]
    pub fn new(base: f64, period_seconds: f64) -> Self {
        debug_assert!(base > 1.0, "zoom base must grow");
        debug_assert!(period_seconds > 0.0, "period must be positive");
        Self {
            base,
            period_seconds,
            epoch_seconds: 0.0,
        }
    }

    /// The zoom factor at `now_seconds`, resetting the epoch when the
    /// period has elapsed.
    pub fn factor_at(&mut self, now_seconds: f64) -> f64 {
        let mut elapsed = now_seconds - self.epoch_seconds;
        if elapsed >= self.period_seconds || elapsed < 0.0 {
            self.epoch_seconds = now_seconds;
            elapsed = 0.0;
        }
        self.base.powf(elapsed)
    }
}

impl Default for ZoomCycle {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_BASE, DEFAULT_ZOOM_PERIOD)
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The complex-plane window covered by one frame's raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Real coordinate of the left edge.
    pub min_re: f64,
    /// Imaginary coordinate of the top edge.
    pub min_im: f64,
    /// Real extent.
    pub width: f64,
    /// Imaginary extent.
    pub height: f64,
}

impl Viewport {
    /// Derive the window for a zoom factor: the base extent divided by the
    /// factor, widened to the surface aspect ratio and centered on
    /// `center`.
    #[must_use]
    pub fn derive(center: (f64, f64), base_extent: f64, zoom_factor: f64, aspect: f64) -> Self {
        let height = base_extent / zoom_factor;
        let width = height * aspect;
        Self {
            min_re: center.0 - width * 0.5,
            min_im: center.1 - height * 0.5,
            width,
            height,
        }
    }

    /// Map pixel `(x, y)` of a `cols × rows` raster to a complex point at
    /// the pixel center.
    #[inline]
    #[must_use]
    pub fn point_at(&self, x: u32, y: u32, cols: u32, rows: u32) -> (f64, f64) {
        let re = self.min_re + (x as f64 + 0.5) / cols as f64 * self.width;
        let im = self.min_im + (y as f64 + 0.5) / rows as f64 * self.height;
        (re, im)
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Color presets for escaped points.
///
/// Every preset is a deterministic, continuous ramp over the normalized
/// escape count; interior points use the fixed [`FractalPalette::INTERIOR`]
/// color regardless of preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FractalPalette {
    /// Deep blue through violet to warm white.
    #[default]
    Twilight,
    /// Black through red and orange to pale yellow.
    Ember,
    /// Deep navy through cyan to seafoam.
    Ocean,
}

impl FractalPalette {
    /// Fill color for points that never escape.
    pub const INTERIOR: Rgba = Rgba::rgb(4, 6, 18);

    /// Map an escape count to a color.
    #[inline]
    #[must_use]
    pub fn color_at(self, iterations: u32, max_iterations: u32) -> Rgba {
        if iterations >= max_iterations {
            return Self::INTERIOR;
        }
        let t = f64::from(iterations) / f64::from(max_iterations.max(1));
        match self {
            Self::Twilight => ramp(
                t,
                Rgba::rgb(20, 24, 82),
                Rgba::rgb(120, 66, 164),
                Rgba::rgb(252, 238, 210),
            ),
            Self::Ember => ramp(
                t,
                Rgba::rgb(12, 4, 2),
                Rgba::rgb(214, 72, 20),
                Rgba::rgb(255, 230, 150),
            ),
            Self::Ocean => ramp(
                t,
                Rgba::rgb(8, 24, 88),
                Rgba::rgb(28, 160, 210),
                Rgba::rgb(170, 255, 214),
            ),
        }
    }
}

/// Three-stop linear ramp with the middle stop at t = 0.5.
#[inline]
fn ramp(t: f64, low: Rgba, mid: Rgba, high: Rgba) -> Rgba {
    if t < 0.5 {
        low.lerp(mid, t * 2.0)
    } else {
        mid.lerp(high, (t - 0.5) * 2.0)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Default complex-plane zoom center (a seahorse-valley point that stays
/// interesting for the whole cycle).
pub const DEFAULT_CENTER: (f64, f64) = (-0.7436, 0.1319);

/// Default viewport extent at zoom factor 1.
pub const DEFAULT_BASE_EXTENT: f64 = 3.0;

/// Default escape iteration cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 60;

/// The cycling fractal zoom visualization.
#[derive(Debug, Clone)]
pub struct FractalZoom {
    center: (f64, f64),
    base_extent: f64,
    max_iterations: u32,
    pixel_scale: f64,
    palette: FractalPalette,
    zoom: ZoomCycle,
    raster: Raster,
}

impl FractalZoom {
    /// Create a renderer with the reference parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            center: DEFAULT_CENTER,
            base_extent: DEFAULT_BASE_EXTENT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            pixel_scale: 1.0,
            palette: FractalPalette::default(),
            zoom: ZoomCycle::default(),
            raster: Raster::new(0, 0),
        }
    }

    /// Set the zoom center.
    #[must_use]
    pub fn center(mut self, center: (f64, f64)) -> Self {
        self.center = center;
        self
    }

    /// Set the escape iteration cap (minimum 1).
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Set the rendering density relative to logical resolution.
    ///
    /// Clamped to `(0, 1]`: density is capped at native so per-frame cost
    /// stays bounded by surface area.
    #[must_use]
    pub fn pixel_scale(mut self, scale: f64) -> Self {
        self.pixel_scale = if scale > 0.0 { scale.min(1.0) } else { 1.0 };
        self
    }

    /// Set the escape palette.
    #[must_use]
    pub fn palette(mut self, palette: FractalPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the zoom cycle parameters.
    #[must_use]
    pub fn zoom_cycle(mut self, zoom: ZoomCycle) -> Self {
        self.zoom = zoom;
        self
    }

    /// The viewport this renderer would cover at the given zoom factor and
    /// aspect ratio.
    #[must_use]
    pub fn viewport(&self, zoom_factor: f64, aspect: f64) -> Viewport {
        Viewport::derive(self.center, self.base_extent, zoom_factor, aspect)
    }
}

impl Default for FractalZoom {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualization for FractalZoom {
    fn name(&self) -> &'static str {
        "fractal-zoom"
    }

    fn frame(&mut self, ctx: &FrameContext, surface: &mut dyn Surface) {
        if ctx.width <= 0.0 || ctx.height <= 0.0 {
            return;
        }

        let cols = ((ctx.width * self.pixel_scale).floor() as u32).max(1);
        let rows = ((ctx.height * self.pixel_scale).floor() as u32).max(1);
        if self.raster.width() != cols || self.raster.height() != rows {
            self.raster.resize(cols, rows);
        }

        let factor = self.zoom.factor_at(ctx.time_seconds);
        let viewport = self.viewport(factor, ctx.aspect());
        let palette = self.palette;
        let max_iterations = self.max_iterations;

        for y in 0..rows {
            let row = self.raster.row_mut(y);
            for (x, pixel) in row.iter_mut().enumerate() {
                let (re, im) = viewport.point_at(x as u32, y, cols, rows);
                let iterations = escape_iterations(re, im, max_iterations);
                *pixel = palette.color_at(iterations, max_iterations);
            }
        }

        surface.blit(&self.raster);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
