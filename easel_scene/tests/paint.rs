// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint and pick passes observed through a recording surface.

use core::cell::Cell;
use std::rc::Rc;

use easel_imaging::{DrawOp, FillRule};
use easel_imaging_ref::RecordingSurface;
use easel_scene::{
    Font, ImageLoadError, ImageShape, MIN_HIT_STROKE_WIDTH, Scene, Shape, ShapeKey, Style,
    TextBaseline, TextShape,
};
use kurbo::{Affine, Point, Size};
use peniko::{Blob, Brush, Color, ImageAlphaType, ImageData, ImageFormat};

fn pixels(width: u32, height: u32) -> ImageData {
    ImageData {
        data: Blob::from(vec![200_u8; (width * height * 4) as usize]),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    }
}

fn solid(brush: Option<&Brush>) -> Option<Color> {
    match brush? {
        Brush::Solid(color) => Some(*color),
        _ => None,
    }
}

#[test]
fn shapes_paint_under_view_then_position_then_local() {
    let mut scene = Scene::new();
    scene.reset_view(2.0);
    scene
        .add(Shape::rect(20.0, 20.0).at(10.0, 10.0).filled(Color::BLACK))
        .unwrap();

    let mut surface = RecordingSurface::new(100, 100);
    scene.paint(&mut surface);

    let draws: Vec<_> = surface.draws().collect();
    assert!(matches!(draws[0].0, DrawOp::Clear));
    assert_eq!(draws[0].1.transform, Affine::IDENTITY, "clear runs untransformed");
    let (op, state) = draws[1];
    assert!(matches!(op, DrawOp::FillPath(_)));
    assert_eq!(
        state.transform,
        Affine::scale(2.0) * Affine::translate((10.0, 10.0))
    );
}

#[test]
fn hit_pass_uses_key_colors_and_keeps_stroke_width() {
    let mut scene = Scene::new();
    let rect = scene
        .add(Shape::rect(5.0, 5.0).filled(Color::from_rgba8(255, 0, 0, 255)))
        .unwrap();
    let line = scene
        .add(
            Shape::polyline(&[0.0, 0.0, 50.0, 0.0])
                .unwrap()
                .stroked(Color::WHITE, 8.0),
        )
        .unwrap();

    let mut surface = RecordingSurface::new(64, 64);
    scene.paint_hit(&mut surface);

    let draws: Vec<_> = surface.draws().skip(1).collect();
    assert_eq!(draws.len(), 2);
    assert_eq!(solid(draws[0].1.brush.as_ref()), Some(rect.color()));
    assert!(matches!(draws[1].0, DrawOp::StrokePath(_)));
    assert_eq!(solid(draws[1].1.brush.as_ref()), Some(line.color()));
    assert_eq!(draws[1].1.stroke.as_ref().map(|s| s.width), Some(8.0));
}

#[test]
fn hairlines_are_widened_for_picking_only() {
    let mut scene = Scene::new();
    scene.reset_view(2.0);
    scene
        .add(Shape::polyline(&[0.0, 0.0, 50.0, 0.0]).unwrap())
        .unwrap();

    let mut surface = RecordingSurface::new(64, 64);
    scene.paint(&mut surface);
    let (_, state) = surface.draws().last().unwrap();
    assert_eq!(state.stroke.as_ref().map(|s| s.width), Some(1.0));

    surface.forget();
    scene.paint_hit(&mut surface);
    let (_, state) = surface.draws().last().unwrap();
    assert_eq!(
        state.stroke.as_ref().map(|s| s.width),
        Some(MIN_HIT_STROKE_WIDTH / 2.0),
        "three device pixels under a 2x view"
    );
}

#[test]
fn fill_rule_comes_from_the_style() {
    let mut scene = Scene::new();
    scene
        .add(
            Shape::svg_path("M0 0 H20 V20 H0 Z M5 5 H15 V15 H5 Z")
                .unwrap()
                .with_style(Style::default().with_fill_rule(FillRule::EvenOdd))
                .filled(Color::BLACK),
        )
        .unwrap();
    scene
        .add(Shape::rect(4.0, 4.0).filled(Color::BLACK))
        .unwrap();

    let mut surface = RecordingSurface::new(32, 32);
    scene.paint(&mut surface);
    let rules: Vec<_> = surface.draws().skip(1).map(|(_, s)| s.fill_rule).collect();
    assert_eq!(rules, [FillRule::EvenOdd, FillRule::NonZero]);

    surface.forget();
    scene.paint_hit(&mut surface);
    let (_, state) = surface.draws().nth(1).unwrap();
    assert_eq!(state.fill_rule, FillRule::EvenOdd, "holes stay unpickable");
}

#[test]
fn text_paints_glyph_outlines_and_picks_its_box() {
    let font = Font::new(
        include_bytes!("../../assets/fonts/dejavu/DejaVuSansMono.ttf").to_vec(),
        0,
        20.48,
    )
    .unwrap();
    let text = TextShape::new("Easel", font).with_baseline(TextBaseline::Top);
    let bounds = text.bounds();
    let mut shape = Shape::text(text)
        .at(10.0, 10.0)
        .stroked(Color::WHITE, 1.0);
    let easel_scene::Geometry::Text(text) = shape.geometry_mut() else {
        panic!("expected a text shape");
    };
    text.stroke_width = Some(0.5);
    text.color = Some(Color::from_rgba8(10, 20, 30, 255).into());

    let mut scene = Scene::new();
    let key = scene.add(shape).unwrap();
    let mut surface = RecordingSurface::new(128, 64);
    scene.paint(&mut surface);

    let draws: Vec<_> = surface.draws().skip(1).collect();
    assert_eq!(draws.len(), 2);
    let DrawOp::FillPath(outline) = draws[0].0 else {
        panic!("expected glyph fill, got {:?}", draws[0].0);
    };
    assert!(!outline.elements().is_empty());
    assert!(matches!(draws[1].0, DrawOp::StrokePath(_)));
    for (_, state) in &draws {
        assert_eq!(
            solid(state.brush.as_ref()),
            Some(Color::from_rgba8(10, 20, 30, 255)),
            "text color overrides both brushes"
        );
    }
    assert_eq!(draws[1].1.stroke.as_ref().map(|s| s.width), Some(0.5));

    surface.forget();
    scene.paint_hit(&mut surface);
    let (op, state) = surface.draws().last().unwrap();
    assert!(matches!(op, DrawOp::FillRect(rect) if *rect == bounds));
    assert_eq!(solid(state.brush.as_ref()), Some(key.color()));
}

#[test]
fn flags_select_fill_and_stroke() {
    let mut scene = Scene::new();
    scene
        .add(
            Shape::circle(10.0)
                .filled(Color::BLACK)
                .stroked(Color::WHITE, 2.0),
        )
        .unwrap();
    scene.add(Shape::circle(10.0)).unwrap();

    let mut surface = RecordingSurface::new(64, 64);
    scene.paint(&mut surface);
    let ops: Vec<_> = surface.draws().skip(1).map(|(op, _)| op).collect();
    assert_eq!(ops.len(), 2, "an unflagged shape paints nothing");
    assert!(matches!(ops[0], DrawOp::FillPath(_)));
    assert!(matches!(ops[1], DrawOp::StrokePath(_)));
}

#[test]
fn dashes_are_applied_before_the_surface_strokes() {
    let mut scene = Scene::new();
    scene
        .add(
            Shape::polyline(&[0.0, 0.0, 100.0, 0.0])
                .unwrap()
                .stroked(Color::BLACK, 1.0)
                .dashed(0.0, &[10.0, 10.0]),
        )
        .unwrap();

    let mut surface = RecordingSurface::new(128, 16);
    scene.paint(&mut surface);
    let (op, state) = surface.draws().last().unwrap();
    let DrawOp::StrokePath(path) = op else {
        panic!("expected a stroke, got {op:?}");
    };
    let segments = path
        .elements()
        .iter()
        .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_)))
        .count();
    assert_eq!(segments, 5, "100 units of 10-on 10-off dashes");
    assert!(state.stroke.as_ref().unwrap().dash_pattern.is_empty());
}

#[test]
fn draw_awaits_images_and_skips_failures() {
    let mut scene = Scene::new();
    scene
        .add(
            Shape::image(ImageShape::pending("ok.png", async { Ok(pixels(4, 2)) }))
                .at(5.0, 5.0),
        )
        .unwrap();
    let broken = scene
        .add(Shape::image(
            ImageShape::pending("missing.png", async {
                Err(ImageLoadError::Fetch("404".into()))
            })
            .with_size(Size::new(10.0, 10.0)),
        ))
        .unwrap();

    let mut surface = RecordingSurface::new(32, 32);
    pollster::block_on(scene.draw(&mut surface));

    let images: Vec<_> = surface
        .draws()
        .filter_map(|(op, _)| match op {
            DrawOp::DrawImageRect { dst, .. } => Some(*dst),
            _ => None,
        })
        .collect();
    assert_eq!(images, [kurbo::Rect::new(0.0, 0.0, 4.0, 2.0)]);

    surface.forget();
    scene.paint_hit(&mut surface);
    assert_eq!(surface.draws().count(), 2, "failed image has no silhouette");
    let easel_scene::Geometry::Image(image) = scene.get(broken).unwrap().geometry() else {
        panic!("expected an image shape");
    };
    assert!(image.is_failed());
}

#[test]
fn paint_keeps_order_until_the_next_full_draw() {
    let mut scene = Scene::new();
    let a = scene.add(Shape::rect(1.0, 1.0).at(1.0, 0.0)).unwrap();
    let b = scene.add(Shape::rect(1.0, 1.0).at(2.0, 0.0)).unwrap();
    scene.get_mut(b).unwrap().set_z_index(10);

    let mut surface = RecordingSurface::new(8, 8);
    scene.paint(&mut surface);
    let order: Vec<ShapeKey> = scene.iter().filter_map(Shape::key).collect();
    assert_eq!(order, [a, b]);

    pollster::block_on(scene.draw(&mut surface));
    let order: Vec<ShapeKey> = scene.iter().filter_map(Shape::key).collect();
    assert_eq!(order, [b, a]);
}

#[test]
fn tap_reaches_the_shape_handler() {
    let tapped = Rc::new(Cell::new(None));
    let sink = tapped.clone();
    let mut scene = Scene::new();
    let key = scene
        .add(Shape::circle(3.0).on_tap(move |key| sink.set(Some(key))))
        .unwrap();

    assert!(scene.tap(key));
    assert_eq!(tapped.get(), Some(key));
    let other = scene.add(Shape::circle(3.0)).unwrap();
    assert!(!scene.tap(other));
    assert_eq!(Point::ORIGIN, scene.get(other).unwrap().position());
}
