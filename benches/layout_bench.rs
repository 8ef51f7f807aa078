//! Benchmarks for the tiling engine
//!
//! `tile` runs on every map, unmap and layout command, so it bounds how
//! quickly the screen settles after a change.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use muon_core::geometry::Geometry;
use muon_core::monitor::{Layout, Monitor, MonitorId};
use muon_core::tiling;
use muon_core::WindowId;

fn monitor(layout: Layout, root_count: u32) -> Monitor {
    let mut monitor = Monitor::new(MonitorId(1), Geometry::new(0, 0, 2560, 1440));
    monitor.layout = layout;
    monitor.root_count = root_count;
    monitor
}

fn tile_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile");

    for num_windows in [1u32, 5, 10, 20, 50, 100] {
        let ids: Vec<WindowId> = (0..num_windows).map(WindowId).collect();

        for layout in [Layout::Vertical, Layout::Horizontal] {
            let monitor = monitor(layout, 1);
            group.bench_with_input(
                BenchmarkId::new(layout.name(), num_windows),
                &ids,
                |b, ids| b.iter(|| tiling::tile(black_box(&monitor), black_box(ids))),
            );
        }
    }

    group.finish();
}

fn root_count_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_root_count");
    let ids: Vec<WindowId> = (0..50).map(WindowId).collect();

    for root_count in [1u32, 5, 25, 50] {
        let mut monitor = monitor(Layout::Vertical, root_count);
        monitor.mirror = true;
        group.bench_with_input(
            BenchmarkId::from_parameter(root_count),
            &monitor,
            |b, monitor| b.iter(|| tiling::tile(black_box(monitor), black_box(&ids))),
        );
    }

    group.finish();
}

criterion_group!(benches, tile_benchmark, root_count_benchmark);
criterion_main!(benches);
