// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use easel_imaging_vello_cpu::VelloCpuSurface;
use easel_pick::Picker;
use easel_scene::{Scene, Shape};
use kurbo::Point;
use peniko::Color;

fn grid(count: u32) -> Scene {
    let mut scene = Scene::new();
    let side = (f64::from(count)).sqrt().ceil();
    let cell = 512.0 / side;
    for i in 0..count {
        let col = f64::from(i) % side;
        let row = (f64::from(i) / side).floor();
        scene
            .add(
                Shape::circle(cell * 0.4)
                    .at(col * cell + cell / 2.0, row * cell + cell / 2.0)
                    .filled(Color::BLACK),
            )
            .unwrap();
    }
    scene
}

fn bench_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("picking/pick");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));

    // A pick repaints every silhouette, so cost grows with shape count while
    // the read-back itself stays a single pixel.
    for count in [16_u32, 256, 4_096] {
        let scene = grid(count);
        let mut picker = Picker::new(VelloCpuSurface::new(512, 512));
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::new("redraw_and_sample", count), &scene, |b, scene| {
            b.iter(|| black_box(picker.pick(scene, black_box(Point::new(256.0, 256.0)))));
        });

        picker.redraw(&scene);
        group.bench_with_input(BenchmarkId::new("sample_only", count), &scene, |b, scene| {
            b.iter(|| black_box(picker.sample(scene, black_box(Point::new(256.0, 256.0)))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pick);
criterion_main!(benches);
