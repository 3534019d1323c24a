#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::geometry;
use crate::scene::{Scene, Shape};

/// Axis-aligned rectangle in screen pixels.
///
/// Built from two drag corners, so `width` / `height` may be negative until
/// [`ScreenRect::normalized`] is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    /// Rectangle spanning from `start` to `end`, in drag order.
    #[must_use]
    pub fn from_corners(start: Point, end: Point) -> Self {
        Self { x: start.x, y: start.y, width: end.x - start.x, height: end.y - start.y }
    }

    /// Same rectangle with a top-left origin and non-negative extent.
    #[must_use]
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 { (self.x + self.width, -self.width) } else { (self.x, self.width) };
        let (y, height) = if self.height < 0.0 { (self.y + self.height, -self.height) } else { (self.y, self.height) };
        Self { x, y, width, height }
    }

    /// A rectangle with no area selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width.abs() < f64::EPSILON || self.height.abs() < f64::EPSILON
    }

    /// Open-interval overlap test: rectangles that only share an edge do
    /// not intersect. Both rectangles are normalized first.
    #[must_use]
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }
}

/// A shape's vertices in screen pixels.
#[must_use]
pub fn project(shape: &Shape, camera: &Camera) -> Vec<Point> {
    shape
        .points
        .iter()
        .map(|p| camera.local_to_screen(*p, shape.position.point()))
        .collect()
}

/// Screen-space bounding box of a shape's projected points.
#[must_use]
pub fn shape_hitbox(shape: &Shape, camera: &Camera) -> Option<ScreenRect> {
    let (min, max) = geometry::bounding_box(&project(shape, camera))?;
    Some(ScreenRect { x: min.x, y: min.y, width: max.x - min.x, height: max.y - min.y })
}

/// Highlight exactly the shapes whose hitbox touches `rect`; everything else
/// is unhighlighted. Returns how many shapes ended up highlighted.
pub fn select_in_rect(scene: &mut Scene, camera: &Camera, rect: ScreenRect) -> usize {
    let rect = rect.normalized();
    let hits: Vec<bool> = scene
        .shapes()
        .iter()
        .map(|shape| !rect.is_empty() && shape_hitbox(shape, camera).is_some_and(|hb| hb.intersects(&rect)))
        .collect();
    for (index, hit) in hits.iter().enumerate() {
        scene.set_highlight(index, *hit);
    }
    hits.iter().filter(|h| **h).count()
}
