// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: shapes in paint order under a global view transform.

use easel_imaging::{Surface, SurfaceExt};
use easel_transform::TransformNode;
use hashbrown::HashMap;

use crate::key::KeyGenerator;
use crate::{SceneError, Shape, ShapeKey, Style};

/// An ordered collection of shapes under a global view transform.
///
/// Paint order is the stored order. [`Scene::draw`] re-sorts by descending
/// z-index (stable, so equal ranks keep insertion order); [`Scene::paint`]
/// does not.
#[derive(Debug)]
pub struct Scene {
    shapes: Vec<Shape>,
    index: HashMap<ShapeKey, usize>,
    keys: KeyGenerator,
    view: TransformNode,
    default_style: Style,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene with an identity view and canvas default style.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            index: HashMap::new(),
            keys: KeyGenerator::default(),
            view: TransformNode::new(),
            default_style: Style::canvas_defaults(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_keys(keys: KeyGenerator) -> Self {
        Self {
            keys,
            ..Self::new()
        }
    }

    /// Adds `shape` at the end of the paint order and returns its key.
    ///
    /// Keys are never reused, including after [`Scene::clear`].
    pub fn add(&mut self, mut shape: Shape) -> Result<ShapeKey, SceneError> {
        let key = self.keys.next_key().ok_or(SceneError::KeySpaceExhausted)?;
        shape.key = Some(key);
        self.shapes.push(shape);
        self.reindex();
        tracing::trace!(%key, "added shape");
        Ok(key)
    }

    /// Removes and returns the shape with `key`.
    pub fn remove(&mut self, key: ShapeKey) -> Option<Shape> {
        let at = self.index.remove(&key)?;
        let mut shape = self.shapes.remove(at);
        shape.key = None;
        self.reindex();
        Some(shape)
    }

    /// Removes every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.reindex();
    }

    /// Shape with `key`.
    #[must_use]
    pub fn get(&self, key: ShapeKey) -> Option<&Shape> {
        self.index.get(&key).map(|&at| &self.shapes[at])
    }

    /// Mutable shape with `key`.
    pub fn get_mut(&mut self, key: ShapeKey) -> Option<&mut Shape> {
        let at = *self.index.get(&key)?;
        self.shapes.get_mut(at)
    }

    /// `true` if a shape with `key` is in the scene.
    #[must_use]
    pub fn contains(&self, key: ShapeKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Shapes in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes.iter()
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// `true` if the scene has no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Keys issued over the scene's lifetime, including removed shapes'.
    #[must_use]
    pub fn keys_issued(&self) -> u32 {
        self.keys.issued()
    }

    /// Global view transform applied before every shape's own.
    #[must_use]
    pub fn view(&self) -> &TransformNode {
        &self.view
    }

    /// Mutable view transform.
    pub fn view_mut(&mut self) -> &mut TransformNode {
        &mut self.view
    }

    /// Resets the view to a pure device-pixel-ratio scale.
    pub fn reset_view(&mut self, device_pixel_ratio: f64) {
        self.view.reset();
        self.view.scale(device_pixel_ratio, device_pixel_ratio);
    }

    /// Style used for fields a shape leaves unset.
    #[must_use]
    pub fn default_style(&self) -> &Style {
        &self.default_style
    }

    /// Replaces the default style.
    pub fn set_default_style(&mut self, style: Style) {
        self.default_style = style;
    }

    /// Clears `surface` and paints every shape in the current order.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.reset_transform();
        surface.clear();
        let view = self.view.matrix();
        for shape in &self.shapes {
            shape.paint(surface, view, &self.default_style);
        }
    }

    /// Clears `surface` and paints every shape's silhouette in its key color.
    pub fn paint_hit<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.reset_transform();
        surface.clear();
        let view = self.view.matrix();
        for shape in &self.shapes {
            shape.paint_hit(surface, view, &self.default_style);
        }
    }

    /// Full draw: awaits pending images, sorts by descending z-index, paints.
    ///
    /// Images that fail to load are logged and skipped.
    pub async fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.load_images().await;
        self.shapes.sort_by(|a, b| b.z_index().cmp(&a.z_index()));
        self.reindex();
        tracing::debug!(shapes = self.shapes.len(), "drawing scene");
        self.paint(surface);
    }

    /// Awaits every pending image load.
    pub async fn load_images(&mut self) {
        let (slots, loads): (Vec<usize>, Vec<_>) = self
            .shapes
            .iter_mut()
            .enumerate()
            .filter_map(|(at, shape)| Some((at, shape.image_mut()?.take_pending()?)))
            .unzip();
        if loads.is_empty() {
            return;
        }
        tracing::debug!(count = loads.len(), "awaiting image loads");
        let results = futures::future::join_all(loads).await;
        for (at, result) in slots.into_iter().zip(results) {
            if let Some(image) = self.shapes[at].image_mut() {
                image.finish_load(result);
            }
        }
    }

    /// Runs the tap handler of the shape with `key`. Returns `true` if one ran.
    pub fn tap(&mut self, key: ShapeKey) -> bool {
        self.get_mut(key).is_some_and(Shape::tap)
    }

    /// Shape whose key color is `pixel`, if any.
    #[must_use]
    pub fn resolve(&self, pixel: [u8; 4]) -> Option<ShapeKey> {
        ShapeKey::from_pixel(pixel).filter(|key| self.contains(*key))
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (at, shape) in self.shapes.iter().enumerate() {
            if let Some(key) = shape.key {
                self.index.insert(key, at);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KEY_CAPACITY;
    use kurbo::Point;

    #[test]
    fn keys_are_unique_and_survive_clear() {
        let mut scene = Scene::new();
        let a = scene.add(Shape::rect(1.0, 1.0)).unwrap();
        let b = scene.add(Shape::rect(1.0, 1.0)).unwrap();
        assert_ne!(a, b);
        scene.clear();
        assert!(scene.is_empty());
        let c = scene.add(Shape::rect(1.0, 1.0)).unwrap();
        assert_ne!(c, a, "keys are not reused after clear");
        assert_ne!(c, b);
        assert_eq!(scene.keys_issued(), 3);
    }

    #[test]
    fn exhausted_key_space_rejects_new_shapes() {
        let mut scene = Scene::with_keys(KeyGenerator::starting_at(KEY_CAPACITY - 1));
        let last = scene.add(Shape::circle(1.0)).unwrap();
        assert_eq!(last.rgb(), [255, 255, 255]);
        assert_eq!(
            scene.add(Shape::circle(1.0)).unwrap_err(),
            SceneError::KeySpaceExhausted
        );
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut scene = Scene::new();
        let keys: Vec<_> = (0..4)
            .map(|i| scene.add(Shape::rect(1.0, 1.0).at(f64::from(i), 0.0)).unwrap())
            .collect();
        let removed = scene.remove(keys[1]).unwrap();
        assert_eq!(removed.key(), None);
        assert!(!scene.contains(keys[1]));
        assert_eq!(scene.get(keys[3]).unwrap().position(), Point::new(3.0, 0.0));
        assert!(scene.remove(keys[1]).is_none());
    }

    #[test]
    fn index_matches_order_after_every_membership_change() {
        fn assert_indexed(scene: &Scene) {
            assert_eq!(scene.index.len(), scene.len(), "one entry per shape");
            for (at, shape) in scene.iter().enumerate() {
                let key = shape.key().unwrap();
                assert_eq!(scene.index.get(&key), Some(&at), "{key} indexed at {at}");
            }
        }

        let mut scene = Scene::new();
        let a = scene.add(Shape::rect(1.0, 1.0)).unwrap();
        let b = scene.add(Shape::rect(1.0, 1.0)).unwrap();
        assert_indexed(&scene);
        scene.remove(a);
        assert_indexed(&scene);
        scene.add(Shape::circle(1.0)).unwrap();
        assert_indexed(&scene);
        assert_eq!(scene.iter().next().and_then(Shape::key), Some(b));
        scene.clear();
        assert_indexed(&scene);
        scene.add(Shape::circle(1.0)).unwrap();
        assert_indexed(&scene);
    }

    #[test]
    fn resolve_ignores_unknown_and_translucent_pixels() {
        let mut scene = Scene::new();
        let key = scene.add(Shape::rect(1.0, 1.0)).unwrap();
        let [r, g, b] = key.rgb();
        assert_eq!(scene.resolve([r, g, b, 255]), Some(key));
        assert_eq!(scene.resolve([r, g, b, 128]), None);
        assert_eq!(scene.resolve([0, 0, 0, 0]), None);
        assert_eq!(scene.resolve([9, 9, 9, 255]), None);
    }

    #[test]
    fn draw_sorts_by_descending_z_index() {
        let mut scene = Scene::new();
        let low = scene.add(Shape::rect(1.0, 1.0).with_z_index(-1)).unwrap();
        let first = scene.add(Shape::rect(1.0, 1.0).with_z_index(5)).unwrap();
        let second = scene.add(Shape::rect(1.0, 1.0).with_z_index(5)).unwrap();
        let mid = scene.add(Shape::rect(1.0, 1.0)).unwrap();

        let mut surface = easel_imaging_ref::RecordingSurface::new(4, 4);
        pollster::block_on(scene.draw(&mut surface));

        let order: Vec<_> = scene.iter().filter_map(Shape::key).collect();
        assert_eq!(order, [first, second, mid, low]);
        assert!(scene.get(low).is_some(), "index follows the sort");
    }

    #[test]
    fn reset_view_applies_device_pixel_ratio() {
        let mut scene = Scene::new();
        scene.view_mut().translate(40.0, 0.0);
        scene.reset_view(2.0);
        assert_eq!(scene.view().scale_x(), 2.0);
        assert_eq!(scene.view().translation(), kurbo::Vec2::ZERO);
    }
}
