// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use easel_transform::{Matrix, TransformNode};
use kurbo::Point;

fn bench_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform/matrix");
    let mut view = Matrix::IDENTITY;
    view.scale_by(2.0, 2.0).rotate_by(15.0).translate_by(40.0, -12.0);
    let mut local = Matrix::IDENTITY;
    local.rotate_by(-30.0).scale_by(1.5, 0.75);

    group.bench_function("compose_onto", |b| {
        let mut out = Matrix::IDENTITY;
        b.iter(|| {
            Matrix::compose_onto(&mut out, black_box(&view), black_box(&local));
            black_box(out);
        });
    });
    group.bench_function("invert", |b| {
        b.iter(|| black_box(black_box(view).invert()));
    });
    group.bench_function("transform_point", |b| {
        b.iter(|| black_box(view.transform_point(black_box(Point::new(3.0, 4.0)))));
    });
    group.finish();
}

fn bench_scale_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform/scale");
    let mut node = TransformNode::new();
    node.scale(2.0, 3.0).rotate(20.0);

    // Translation keeps the memoized scale; rotation forces a recompute.
    group.bench_function("after_translate", |b| {
        b.iter(|| {
            node.translate(1.0, 1.0);
            black_box(node.scale_x())
        });
    });
    group.bench_function("after_rotate", |b| {
        b.iter(|| {
            node.rotate(0.0);
            black_box(node.scale_x())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_matrix, bench_scale_cache);
criterion_main!(benches);
