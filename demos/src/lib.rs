// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Easel demos.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use easel_imaging_vello_cpu::VelloCpuSurface;
use png::{BitDepth, ColorType, Encoder};
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Writes the surface's current frame as an RGBA PNG.
pub fn write_png(
    surface: &mut VelloCpuSurface,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let width = surface.pixmap().width();
    let height = surface.pixmap().height();
    let data = surface.to_rgba8();

    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = Encoder::new(file, u32::from(width), u32::from(height));
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    tracing::info!(path = %path.as_ref().display(), width, height, "wrote png");
    Ok(())
}
