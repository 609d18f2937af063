// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless stage demo.
//!
//! Builds a small scene, then drives a tap, a shape drag, a view pan and a
//! pinch zoom through the stage with a manual frame scheduler, and writes the
//! final frame to `stage_headless.png`.
//!
//! Run with `RUST_LOG=debug` to see gesture transitions.

use easel_demos::{init_tracing, write_png};
use easel_gesture::ManualScheduler;
use easel_imaging_vello_cpu::VelloCpuSurface;
use easel_scene::{ImageShape, Shape};
use easel_stage::{Stage, StageConfig};
use kurbo::{Point, Rect};
use peniko::{Blob, Color, ImageAlphaType, ImageData, ImageFormat};

const CONFIG: &str = r##"
draggable = true
zoomable = true
device_pixel_ratio = 2.0
width = 320
height = 240

[style]
line_width = 2.0
stroke = "#202020"
"##;

fn checker(size: u32) -> ImageData {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let on = (x / 4 + y / 4) % 2 == 0;
            data.extend_from_slice(if on { &[240, 200, 40, 255] } else { &[40, 40, 40, 255] });
        }
    }
    ImageData {
        data: Blob::from(data),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width: size,
        height: size,
    }
}

fn run_frames(stage: &mut Stage<VelloCpuSurface, VelloCpuSurface, ManualScheduler, Rect>) {
    for frame in stage.scheduler_mut().take_due() {
        stage.on_frame(frame);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = StageConfig::from_toml_str(CONFIG)?;
    let (w, h) = config.device_size();
    let bounds = Rect::new(0.0, 0.0, f64::from(config.width), f64::from(config.height));
    let mut stage = Stage::new(
        config,
        VelloCpuSurface::new(w, h),
        VelloCpuSurface::new(w, h),
        ManualScheduler::new(),
        bounds,
    )?;

    let card = stage.add_shape(
        Shape::rounded_rect(80.0, 50.0, 8.0)
            .at(20.0, 20.0)
            .filled(Color::from_rgba8(60, 120, 220, 255))
            .stroked(Color::BLACK, 2.0)
            .draggable(true)
            .with_z_index(1)
            .on_tap(|key| tracing::info!(%key, "card tapped")),
    )?;
    stage.add_shape(
        Shape::circle(25.0)
            .at(200.0, 80.0)
            .filled(Color::from_rgba8(220, 80, 60, 255)),
    )?;
    stage.add_shape(
        Shape::arrow(&[40.0, 180.0, 120.0, 150.0, 260.0, 190.0])?
            .stroked(Color::from_rgba8(30, 140, 60, 255), 4.0),
    )?;
    stage.add_shape(Shape::svg_path("M240 20 L300 20 L270 60 Z")?.filled(Color::WHITE))?;
    stage.add_shape(
        Shape::image(ImageShape::pending("checker", async { Ok(checker(32)) }))
            .at(140.0, 140.0),
    )?;
    stage.add_shape(
        Shape::image(ImageShape::pending("missing.png", async {
            Err(easel_scene::ImageLoadError::Fetch("not found".into()))
        }))
        .at(0.0, 0.0),
    )?;
    stage.add_shape(
        Shape::ellipse(30.0, 12.0)
            .at(90.0, 110.0)
            .rotated(30.0)
            .stroked(Color::from_rgba8(120, 60, 160, 255), 3.0)
            .dashed(0.0, &[6.0, 4.0]),
    )?;

    pollster::block_on(stage.draw());

    let tapped = stage.tap(Point::new(40.0, 40.0));
    tracing::info!(?tapped, expected = %card, "tap");

    // Drag the card to the right.
    stage.touch_start(&[Point::new(40.0, 40.0)]);
    for step in 1..=10 {
        stage.touch_move(&[Point::new(40.0 + f64::from(step) * 4.0, 40.0)]);
    }
    stage.touch_end();
    run_frames(&mut stage);

    // Pan the view down a little from empty space.
    stage.touch_start(&[Point::new(300.0, 220.0)]);
    stage.touch_move(&[Point::new(300.0, 230.0)]);
    stage.touch_end();
    run_frames(&mut stage);

    // Pinch out about the middle of the surface.
    let down = [Point::new(140.0, 120.0), Point::new(180.0, 120.0)];
    stage.touch_start(&down);
    stage.touch_move(&down);
    stage.touch_move(&[Point::new(130.0, 120.0), Point::new(190.0, 120.0)]);
    stage.touch_end();
    run_frames(&mut stage);

    tracing::info!(
        zoom = stage.scene().view().scale_x() / stage.config().device_pixel_ratio,
        card = ?stage.scene().get(card).map(Shape::position),
        "final state"
    );

    write_png(stage.surface_mut(), "stage_headless.png")
}
