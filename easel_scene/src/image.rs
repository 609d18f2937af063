// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image shapes and their asynchronous load state.

use core::fmt;
use core::future::Future;
use core::mem;

use easel_imaging::DrawOp;
use futures::FutureExt as _;
use futures::future::LocalBoxFuture;
use kurbo::{Rect, Size};
use peniko::{ImageData, ImageSampler};

use crate::geometry::origin_rect;

/// Failure to produce image pixels.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImageLoadError {
    /// The source could not be fetched.
    #[error("image source `{0}` could not be fetched")]
    Fetch(String),
    /// The fetched bytes could not be decoded.
    #[error("image data could not be decoded: {0}")]
    Decode(String),
}

/// Future resolving to decoded image pixels.
///
/// Loads run on the UI thread, so the future does not need to be `Send`.
pub type ImageFuture = LocalBoxFuture<'static, Result<ImageData, ImageLoadError>>;

/// Load state of an [`ImageShape`].
pub enum ImageState {
    /// Waiting for the next full scene draw to await it.
    Pending(ImageFuture),
    /// Being awaited by a scene draw.
    Loading,
    /// Pixels are available.
    Loaded(ImageData),
    /// Loading failed; the shape is skipped when drawing.
    Failed(ImageLoadError),
}

impl fmt::Debug for ImageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(_) => f.write_str("Pending"),
            Self::Loading => f.write_str("Loading"),
            Self::Loaded(data) => f
                .debug_struct("Loaded")
                .field("width", &data.width)
                .field("height", &data.height)
                .finish(),
            Self::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// Bitmap drawn into a rectangle at the shape's origin.
#[derive(Debug)]
pub struct ImageShape {
    source: String,
    state: ImageState,
    size: Option<Size>,
    source_rect: Option<Rect>,
    sampler: ImageSampler,
}

impl ImageShape {
    /// Image whose pixels arrive later from `load`.
    ///
    /// `source` names the image (a path or URL) for diagnostics.
    pub fn pending(
        source: impl Into<String>,
        load: impl Future<Output = Result<ImageData, ImageLoadError>> + 'static,
    ) -> Self {
        Self::with_state(source.into(), ImageState::Pending(load.boxed_local()))
    }

    /// Image whose pixels are already decoded.
    pub fn loaded(source: impl Into<String>, data: ImageData) -> Self {
        Self::with_state(source.into(), ImageState::Loaded(data))
    }

    fn with_state(source: String, state: ImageState) -> Self {
        Self {
            source,
            state,
            size: None,
            source_rect: None,
            sampler: ImageSampler::default(),
        }
    }

    /// Draws the image at `size` instead of its natural size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Draws only the `rect` part of the image, in image pixels.
    #[must_use]
    pub fn with_source_rect(mut self, rect: Rect) -> Self {
        self.source_rect = Some(rect);
        self
    }

    /// Name of the image source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> &ImageState {
        &self.state
    }

    /// `true` once loading failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, ImageState::Failed(_))
    }

    /// Size the image is drawn at: the explicit size, else the natural size
    /// once loaded.
    #[must_use]
    pub fn display_size(&self) -> Option<Size> {
        match (&self.size, &self.state) {
            (Some(size), _) => Some(*size),
            (None, ImageState::Loaded(data)) => {
                Some(Size::new(f64::from(data.width), f64::from(data.height)))
            }
            (None, _) => None,
        }
    }

    pub(crate) fn take_pending(&mut self) -> Option<ImageFuture> {
        if !matches!(self.state, ImageState::Pending(_)) {
            return None;
        }
        match mem::replace(&mut self.state, ImageState::Loading) {
            ImageState::Pending(load) => Some(load),
            _ => None,
        }
    }

    pub(crate) fn finish_load(&mut self, result: Result<ImageData, ImageLoadError>) {
        self.state = match result {
            Ok(data) => ImageState::Loaded(data),
            Err(err) => {
                tracing::warn!(source = %self.source, error = %err, "failed to load image");
                ImageState::Failed(err)
            }
        };
    }

    /// Draw op for the visible image, or `None` while not loaded.
    pub(crate) fn draw_op(&self) -> Option<DrawOp> {
        let ImageState::Loaded(data) = &self.state else {
            return None;
        };
        let size = self.display_size()?;
        Some(DrawOp::DrawImageRect {
            image: data.clone(),
            src: self.source_rect,
            dst: origin_rect(size),
            sampler: self.sampler,
        })
    }

    /// Rectangle covered by the pick silhouette, or `None` while not loaded.
    pub(crate) fn hit_rect(&self) -> Option<Rect> {
        match self.state {
            ImageState::Loaded(_) => self.display_size().map(origin_rect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::{Blob, ImageAlphaType, ImageFormat};

    pub(crate) fn pixels(width: u32, height: u32) -> ImageData {
        ImageData {
            data: Blob::from(vec![255_u8; (width * height * 4) as usize]),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            width,
            height,
        }
    }

    #[test]
    fn display_size_prefers_explicit_size() {
        let natural = ImageShape::loaded("a.png", pixels(4, 2));
        assert_eq!(natural.display_size(), Some(Size::new(4.0, 2.0)));

        let sized = ImageShape::loaded("a.png", pixels(4, 2)).with_size(Size::new(8.0, 8.0));
        assert_eq!(sized.display_size(), Some(Size::new(8.0, 8.0)));
        assert_eq!(sized.hit_rect(), Some(Rect::new(0.0, 0.0, 8.0, 8.0)));
    }

    #[test]
    fn pending_images_draw_nothing_until_loaded() {
        let mut image = ImageShape::pending("b.png", async { Ok(pixels(1, 1)) });
        assert!(image.draw_op().is_none());
        assert!(image.hit_rect().is_none());

        let load = image.take_pending().expect("pending load");
        assert!(matches!(image.state(), ImageState::Loading));
        assert!(image.take_pending().is_none(), "load is taken once");

        image.finish_load(pollster::block_on(load));
        assert!(image.draw_op().is_some());
    }

    #[test]
    fn failed_images_stay_failed_and_silent() {
        let mut image = ImageShape::pending("c.png", async {
            Err(ImageLoadError::Fetch("c.png".into()))
        })
        .with_size(Size::new(10.0, 10.0));
        let load = image.take_pending().expect("pending load");
        image.finish_load(pollster::block_on(load));

        assert!(image.is_failed());
        assert!(image.draw_op().is_none(), "failed image is skipped");
        assert!(image.hit_rect().is_none(), "failed image is not pickable");
    }
}
