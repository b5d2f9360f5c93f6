//! Criterion benchmarks for the confinement clamp.
//!
//! [`PointerClamp::confine`] runs inside the event-interception callback for
//! every pointer-moved event while a grab is active, on the thread that drives
//! the native event loop.  These benchmarks keep an eye on its cost.
//!
//! Run with:
//! ```bash
//! cargo bench --package hostctl-core --bench clamp_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hostctl_core::domain::confinement::{PointerClamp, WindowBounds};

fn window() -> WindowBounds {
    WindowBounds::from_origin_size(200.0, 100.0, 1280.0, 720.0)
}

/// Pointer inside the window: the no-rewrite hot path.
fn bench_confine_inside(c: &mut Criterion) {
    let clamp = PointerClamp::new(|| Some(window()));
    let mut group = c.benchmark_group("confine");

    group.bench_function("inside_center", |b| {
        b.iter(|| clamp.confine(black_box(840.0), black_box(460.0)))
    });

    group.finish();
}

/// Pointer outside the window on one or both axes: the rewrite path.
fn bench_confine_outside(c: &mut Criterion) {
    let clamp = PointerClamp::new(|| Some(window()));
    let mut group = c.benchmark_group("confine");

    let points = [("left", -50.0, 460.0), ("corner", 5000.0, -5000.0)];
    for (name, x, y) in points {
        group.bench_with_input(BenchmarkId::new("outside", name), &(x, y), |b, &(x, y)| {
            b.iter(|| clamp.confine(black_box(x), black_box(y)))
        });
    }

    group.finish();
}

/// Bounds lookup unavailable (window gone): pass-through path.
fn bench_confine_no_bounds(c: &mut Criterion) {
    let clamp = PointerClamp::new(|| None);
    c.bench_function("confine/no_bounds", |b| {
        b.iter(|| clamp.confine(black_box(1.0), black_box(1.0)))
    });
}

criterion_group!(
    benches,
    bench_confine_inside,
    bench_confine_outside,
    bench_confine_no_bounds,
);
criterion_main!(benches);
