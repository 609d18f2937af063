// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vello CPU backed implementation of the Easel drawing surface.
//!
//! [`VelloCpuSurface`] owns a sparse-strips [`vello_cpu::RenderContext`] and
//! the [`Pixmap`] it resolves into. Draw ops are accumulated in the context;
//! the first read-back after a batch of draws flushes and renders the whole
//! frame once, later read-backs reuse the pixmap until something is drawn
//! again.
//!
//! Rendering uses the u8 pipeline in [`RenderMode::OptimizeSpeed`]. Solid
//! colors therefore round-trip exactly on fully covered pixels, which is what
//! color-key picking relies on. Anti-aliased edge pixels carry partial
//! coverage and blend with whatever is beneath them.

#![deny(unsafe_code)]
#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use easel_imaging::{DrawOp, FillRule, StateOp, StrokeStyle, Surface};
use kurbo::{Affine, Cap, Join, PathEl};
use peniko::{Brush, Fill, ImageQuality};
use vello_cpu::kurbo::{
    Affine as CpuAffine, BezPath as CpuBezPath, Cap as CpuCap, Join as CpuJoin, Point as CpuPoint,
    Rect as CpuRect, Stroke as CpuStroke,
};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

/// CPU raster surface using `vello_cpu`.
pub struct VelloCpuSurface {
    ctx: RenderContext,
    pixmap: Pixmap,
    width: u16,
    height: u16,
    current_transform: Affine,
    current_brush: Option<Brush>,
    current_stroke: Option<StrokeStyle>,
    current_fill_rule: FillRule,
    /// Set when ops were issued since the pixmap was last resolved.
    dirty: bool,
}

impl fmt::Debug for VelloCpuSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VelloCpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("current_transform", &self.current_transform)
            .field("current_fill_rule", &self.current_fill_rule)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl VelloCpuSurface {
    /// Creates a transparent surface of `width` × `height` device pixels.
    pub fn new(width: u16, height: u16) -> Self {
        let settings = RenderSettings {
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        Self {
            ctx: RenderContext::new_with(width, height, settings),
            pixmap: Pixmap::new(width, height),
            width,
            height,
            current_transform: Affine::IDENTITY,
            current_brush: None,
            current_stroke: None,
            current_fill_rule: FillRule::NonZero,
            dirty: false,
        }
    }

    /// Returns the resolved pixmap, rendering pending ops first.
    ///
    /// Pixel data is premultiplied RGBA8.
    pub fn pixmap(&mut self) -> &Pixmap {
        self.resolve();
        &self.pixmap
    }

    /// Returns the whole frame as straight-alpha RGBA8 bytes.
    pub fn to_rgba8(&mut self) -> Vec<u8> {
        self.read_pixels(0, 0, u32::from(self.width), u32::from(self.height))
    }

    fn resolve(&mut self) {
        if !self.dirty {
            return;
        }
        // Start from a transparent target so the pixmap only reflects the
        // ops accumulated since the last clear.
        self.pixmap = Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.dirty = false;
    }

    fn affine_to_cpu(xf: Affine) -> CpuAffine {
        CpuAffine::new(xf.as_coeffs())
    }

    fn path_to_cpu(path: &kurbo::BezPath) -> CpuBezPath {
        let pt = |p: kurbo::Point| CpuPoint::new(p.x, p.y);
        let mut out = CpuBezPath::new();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => out.move_to(pt(p)),
                PathEl::LineTo(p) => out.line_to(pt(p)),
                PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
                PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
                PathEl::ClosePath => out.close_path(),
            }
        }
        out
    }

    fn rect_to_cpu(rect: kurbo::Rect) -> CpuRect {
        CpuRect::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    fn stroke_to_cpu(style: &StrokeStyle) -> CpuStroke {
        let mut stroke = CpuStroke::new(style.width);
        stroke.miter_limit = style.miter_limit;
        stroke.join = match style.join {
            Join::Bevel => CpuJoin::Bevel,
            Join::Miter => CpuJoin::Miter,
            Join::Round => CpuJoin::Round,
        };
        stroke.start_cap = match style.start_cap {
            Cap::Butt => CpuCap::Butt,
            Cap::Round => CpuCap::Round,
            Cap::Square => CpuCap::Square,
        };
        stroke.end_cap = match style.end_cap {
            Cap::Butt => CpuCap::Butt,
            Cap::Round => CpuCap::Round,
            Cap::Square => CpuCap::Square,
        };
        stroke
    }

    fn apply_brush(&mut self, brush: Brush) {
        match brush {
            Brush::Solid(color) => {
                self.ctx.set_paint(color);
            }
            Brush::Gradient(gradient) => {
                self.ctx.set_paint(gradient);
            }
            Brush::Image(image_brush) => {
                let source = ImageSource::from_peniko_image_data(&image_brush.image);
                let image = CpuImage {
                    image: source,
                    sampler: image_brush.sampler,
                };
                self.ctx.set_paint(image);
            }
        }
    }

    fn apply_fill_rule(&mut self, rule: FillRule) {
        let fill = match rule {
            FillRule::NonZero => Fill::NonZero,
            FillRule::EvenOdd => Fill::EvenOdd,
        };
        self.ctx.set_fill_rule(fill);
    }

    /// Re-applies the tracked state after the context was reset.
    fn reapply_state(&mut self) {
        self.ctx.set_transform(Self::affine_to_cpu(self.current_transform));
        if let Some(brush) = self.current_brush.clone() {
            self.apply_brush(brush);
        }
        if let Some(stroke) = &self.current_stroke {
            self.ctx.set_stroke(Self::stroke_to_cpu(stroke));
        }
        self.apply_fill_rule(self.current_fill_rule);
    }

    /// Paints `src` of `image` (the whole image when `None`) stretched over `dst`.
    ///
    /// The image is a paint positioned by a paint transform and `dst` is
    /// filled with it, so interior pixels are exact image texels.
    fn draw_image_rect(
        &mut self,
        image: &peniko::ImageData,
        src: Option<kurbo::Rect>,
        dst: kurbo::Rect,
        sampler: peniko::ImageSampler,
    ) {
        let full = kurbo::Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
        let src = src.unwrap_or(full);
        if [src.width(), src.height(), dst.width(), dst.height()]
            .iter()
            .any(|side| side.abs() < f64::EPSILON)
        {
            return;
        }
        let image_to_dst = Affine::translate(dst.origin().to_vec2())
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate(-src.origin().to_vec2());

        let outer = *self.ctx.transform();
        let sampler = if magnifies_axis_aligned(outer * Self::affine_to_cpu(image_to_dst)) {
            sampler.with_quality(ImageQuality::Low)
        } else {
            sampler
        };
        let paint = self.ctx.paint().clone();
        let paint_transform = *self.ctx.paint_transform();
        self.ctx.set_paint(CpuImage {
            image: ImageSource::from_peniko_image_data(image),
            sampler,
        });
        self.ctx
            .set_paint_transform(Self::affine_to_cpu(image_to_dst));
        self.ctx.fill_rect(&Self::rect_to_cpu(dst));
        self.ctx.set_paint_transform(paint_transform);
        self.ctx.set_paint(paint);
    }
}

/// Whether `xf` only scales up along the axes, where nearest sampling shows
/// each texel as a solid block instead of a blend of its neighbors.
fn magnifies_axis_aligned(xf: CpuAffine) -> bool {
    let [a, b, c, d, _, _] = xf.as_coeffs();
    b.abs() < 1e-9 && c.abs() < 1e-9 && a.abs() >= 1.0 && d.abs() >= 1.0
}

impl Surface for VelloCpuSurface {
    fn state(&mut self, op: StateOp) {
        match op {
            StateOp::SetTransform(xf) => {
                self.current_transform = xf;
                self.ctx.set_transform(Self::affine_to_cpu(xf));
            }
            StateOp::SetBrush(brush) => {
                self.current_brush = Some(brush.clone());
                self.apply_brush(brush);
            }
            StateOp::SetStroke(style) => {
                self.ctx.set_stroke(Self::stroke_to_cpu(&style));
                self.current_stroke = Some(style);
            }
            StateOp::SetFillRule(rule) => {
                self.current_fill_rule = rule;
                self.apply_fill_rule(rule);
            }
        }
    }

    fn draw(&mut self, op: DrawOp) {
        self.dirty = true;
        match op {
            DrawOp::Clear => {
                self.ctx.reset();
                self.reapply_state();
            }
            DrawOp::FillPath(path) => {
                self.ctx.fill_path(&Self::path_to_cpu(&path));
            }
            DrawOp::StrokePath(path) => {
                self.ctx.stroke_path(&Self::path_to_cpu(&path));
            }
            DrawOp::FillRect(rect) => {
                self.ctx.fill_rect(&Self::rect_to_cpu(rect));
            }
            DrawOp::DrawImageRect {
                image,
                src,
                dst,
                sampler,
            } => {
                self.draw_image_rect(&image, src, dst, sampler);
            }
        }
    }

    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn read_pixels(&mut self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
        self.resolve();
        let stride = usize::from(self.width);
        let data = self.pixmap.data_as_u8_slice();
        let mut out = vec![0_u8; width as usize * height as usize * 4];
        for row in 0..height {
            let sy = y.saturating_add(row);
            if sy >= u32::from(self.height) {
                break;
            }
            for col in 0..width {
                let sx = x.saturating_add(col);
                if sx >= u32::from(self.width) {
                    break;
                }
                let src = (sy as usize * stride + sx as usize) * 4;
                let dst = (row as usize * width as usize + col as usize) * 4;
                if let Some(px) = data.get(src..src + 4) {
                    out[dst..dst + 4].copy_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
                }
            }
        }
        out
    }
}

/// Converts a premultiplied RGBA8 pixel to straight alpha.
fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    match a {
        0 => [0; 4],
        255 => [r, g, b, a],
        _ => {
            let un = |c: u8| {
                let v = (u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a);
                u8::try_from(v).unwrap_or(u8::MAX)
            };
            [un(r), un(g), un(b), a]
        }
    }
}
