// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel read-back tests for the `vello_cpu` surface.
//!
//! These exercise the property color-key picking depends on: a solid color
//! painted over fully covered pixels reads back byte-exact.

use easel_imaging::{Affine, Color, DrawOp, Surface, SurfaceExt};
use easel_imaging_vello_cpu::VelloCpuSurface;
use kurbo::{Rect, Shape, Stroke};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat, ImageSampler};

fn square(x0: f64, y0: f64, size: f64) -> kurbo::BezPath {
    Rect::new(x0, y0, x0 + size, y0 + size).to_path(0.1)
}

#[test]
fn solid_fill_reads_back_exactly() {
    let mut surface = VelloCpuSurface::new(64, 64);
    surface.set_brush(Color::from_rgba8(0, 1, 2, 255));
    surface.fill_path(square(10.0, 10.0, 20.0));

    assert_eq!(surface.read_pixel(20, 20), [0, 1, 2, 255]);
    assert_eq!(surface.read_pixel(50, 50), [0, 0, 0, 0], "background stays clear");
}

#[test]
fn transform_applies_to_fills() {
    let mut surface = VelloCpuSurface::new(64, 64);
    surface.set_transform(Affine::translate((30.0, 30.0)) * Affine::scale(2.0));
    surface.set_brush(Color::from_rgba8(200, 10, 10, 255));
    surface.fill_path(square(0.0, 0.0, 10.0));

    assert_eq!(surface.read_pixel(45, 45), [200, 10, 10, 255]);
    assert_eq!(surface.read_pixel(5, 5), [0, 0, 0, 0]);
}

#[test]
fn clear_discards_previous_frame() {
    let mut surface = VelloCpuSurface::new(32, 32);
    surface.set_brush(Color::from_rgba8(9, 9, 9, 255));
    surface.fill_path(square(0.0, 0.0, 32.0));
    assert_eq!(surface.read_pixel(16, 16), [9, 9, 9, 255]);

    surface.clear();
    assert_eq!(surface.read_pixel(16, 16), [0, 0, 0, 0], "clear resets pixels");

    // State survives the clear.
    surface.fill_path(square(0.0, 0.0, 8.0));
    assert_eq!(surface.read_pixel(4, 4), [9, 9, 9, 255], "brush kept after clear");
}

#[test]
fn wide_stroke_covers_its_centerline() {
    let mut surface = VelloCpuSurface::new(64, 64);
    surface.set_brush(Color::from_rgba8(0, 0, 255, 255));
    surface.set_stroke(Stroke::new(8.0));
    surface.stroke_path(kurbo::Line::new((4.0, 32.0), (60.0, 32.0)).to_path(0.1));

    assert_eq!(surface.read_pixel(30, 32), [0, 0, 255, 255]);
    assert_eq!(surface.read_pixel(30, 10), [0, 0, 0, 0]);
}

#[test]
fn fill_rect_and_image_rect() {
    let mut surface = VelloCpuSurface::new(32, 32);
    surface.set_brush(Color::from_rgba8(1, 2, 3, 255));
    surface.draw(DrawOp::FillRect(Rect::new(0.0, 0.0, 8.0, 8.0)));

    let pixels: Vec<u8> = [10_u8, 20, 30, 255].repeat(4);
    let image = ImageData {
        data: Blob::from(pixels),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width: 2,
        height: 2,
    };
    surface.draw(DrawOp::DrawImageRect {
        image,
        src: None,
        dst: Rect::new(16.0, 16.0, 32.0, 32.0),
        sampler: ImageSampler::default(),
    });

    assert_eq!(surface.read_pixel(4, 4), [1, 2, 3, 255]);
    assert_eq!(surface.read_pixel(24, 24), [10, 20, 30, 255]);
    assert_eq!(surface.read_pixel(12, 12), [0, 0, 0, 0], "gap between draws");
}

#[test]
fn stretched_image_keeps_texel_colors() {
    let texels = [[200_u8, 0, 0, 255], [0, 200, 0, 255], [0, 0, 200, 255], [7, 8, 9, 255]];
    let image = ImageData {
        data: Blob::from(texels.concat()),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width: 2,
        height: 2,
    };
    let mut surface = VelloCpuSurface::new(32, 32);
    surface.set_transform(Affine::translate((8.0, 8.0)));
    surface.draw(DrawOp::DrawImageRect {
        image,
        src: None,
        dst: Rect::new(0.0, 0.0, 16.0, 16.0),
        sampler: ImageSampler::default(),
    });

    assert_eq!(surface.read_pixel(9, 9), texels[0], "top left texel");
    assert_eq!(surface.read_pixel(22, 9), texels[1], "top right texel");
    assert_eq!(surface.read_pixel(9, 22), texels[2], "bottom left texel");
    assert_eq!(surface.read_pixel(23, 23), texels[3], "bottom right texel");
    assert_eq!(surface.read_pixel(24, 24), [0, 0, 0, 0], "nothing past dst");
}

#[test]
fn read_pixels_pads_outside_bounds() {
    let mut surface = VelloCpuSurface::new(4, 4);
    surface.set_brush(Color::from_rgba8(7, 7, 7, 255));
    surface.fill_path(square(0.0, 0.0, 4.0));

    let block = surface.read_pixels(3, 3, 2, 1);
    assert_eq!(block, [7, 7, 7, 255, 0, 0, 0, 0]);
    assert_eq!(surface.to_rgba8().len(), 4 * 4 * 4);
}
