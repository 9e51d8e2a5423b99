//! Benchmarks for the visualization inner loops.
//!
//! Performance budgets (indicative, not enforced in CI):
//! - escape_iterations interior point, cap 60: < 150ns
//! - FractalZoom frame 160x120: < 4ms
//! - MazeGenerator 20-op batch: < 2µs
//! - Trace recording, 256 reversed values: < 2ms
//!
//! Run with: cargo bench -p algoscope-fx --bench fx_bench

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use algoscope_core::rng::SplitMix64;
use algoscope_core::surface::HeadlessSurface;
use algoscope_core::viz::{FrameContext, Visualization};
use algoscope_fx::fractal::{FractalZoom, escape_iterations};
use algoscope_fx::maze::MazeGenerator;
use algoscope_fx::sort::{DataSet, Trace};

fn ctx(width: f64, height: f64, time_seconds: f64) -> FrameContext {
    FrameContext {
        width,
        height,
        frame_index: 0,
        time_seconds,
    }
}

fn bench_escape(c: &mut Criterion) {
    let mut group = c.benchmark_group("fractal/escape");

    group.bench_function("interior_cap_60", |b| {
        b.iter(|| black_box(escape_iterations(black_box(0.0), black_box(0.0), 60)))
    });

    group.bench_function("fast_escape", |b| {
        b.iter(|| black_box(escape_iterations(black_box(2.0), black_box(2.0), 60)))
    });

    group.finish();
}

fn bench_fractal_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("fractal/frame");
    group.sample_size(20);

    for (w, h) in [(80.0, 60.0), (160.0, 120.0)] {
        group.bench_function(format!("{w}x{h}"), |b| {
            let mut fractal = FractalZoom::new();
            let mut surface = HeadlessSurface::new(w, h);
            let mut t = 0.0;
            b.iter(|| {
                t += 1.0 / 60.0;
                fractal.frame(&ctx(w, h, t), &mut surface);
            })
        });
    }

    group.finish();
}

fn bench_maze_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("maze/frame");

    group.bench_function("20_ops_and_redraw", |b| {
        let mut maze = MazeGenerator::new(Box::new(SplitMix64::new(7)));
        let mut surface = HeadlessSurface::new(300.0, 300.0);
        let mut frame = 0u64;
        b.iter(|| {
            frame += 1;
            maze.frame(&ctx(300.0, 300.0, frame as f64 / 60.0), &mut surface);
            surface.take_ops();
        })
    });

    group.finish();
}

fn bench_trace_recording(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort/record");

    // Reversed input maximizes the shift count.
    let reversed: Vec<f64> = (0..256).rev().map(f64::from).collect();
    let dataset = DataSet::from_values(reversed);

    group.bench_function("reversed_256", |b| {
        b.iter(|| black_box(Trace::record(black_box(&dataset))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_escape,
    bench_fractal_frame,
    bench_maze_batch,
    bench_trace_recording
);
criterion_main!(benches);
