//! Scene model: shapes, anchors, and the store that owns them.
//!
//! A [`Scene`] holds an ordered list of [`Shape`]s and an arena of
//! [`Anchor`]s keyed by guid. Shapes refer to anchors only by id, so an
//! anchor may be shared by several shapes or by none at all; lookups of a
//! missing id simply find nothing.
//!
//! Shape points are stored already scaled and rotated about their centroid
//! (see [`Shape::bake_points`]). The original scale and Euler rotation are
//! kept alongside for re-serialization and are never reapplied.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::camera::Point;
use crate::geometry::{self, GeometryError};

/// Unique identifier for an anchor.
pub type AnchorId = String;

/// A persisted world position.
///
/// The editor works in the plane; any other members of the stored object
/// (usually `z`) are kept in `rest` and written back as loaded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl Position {
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Shift in the plane. `rest` is left alone.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y, rest: serde_json::Map::new() }
    }
}

impl PartialEq<Point> for Position {
    fn eq(&self, other: &Point) -> bool {
        self.point() == *other
    }
}

/// A shared attachment point that shapes may be tethered to.
///
/// Fields other than the guid and position are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(rename = "m_Guid")]
    pub guid: AnchorId,
    #[serde(rename = "m_Pos")]
    pub position: Position,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Anchor {
    #[must_use]
    pub fn new(guid: impl Into<AnchorId>, position: impl Into<Position>) -> Self {
        Self { guid: guid.into(), position: position.into(), extra: serde_json::Map::new() }
    }
}

/// Per-axis scale as persisted. Retained for round-trip only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0, z: 1.0 }
    }
}

/// An editable polygon with pose, physical properties, and tethers.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// World-space translation.
    pub position: Position,
    /// Local-space vertices, scaled and rotated at load time.
    pub points: Vec<Point>,
    /// Scale the points were baked with.
    pub scale: Scale,
    /// Euler angles in degrees `(x, y, z)`, derived once from the persisted quaternion.
    pub rotation: [f64; 3],
    /// Persisted `m_RotationDegrees`, carried through unchanged.
    pub rotation_degrees: f64,
    /// RGB, 0–255 per channel.
    pub color: [f64; 3],
    /// RGBA, 0–255 per channel, as loaded. The polygon fill uses the RGB channels only.
    pub fill_color: [f64; 4],
    /// World-space fixed attachment points.
    pub static_pins: Vec<Position>,
    /// Ids of the anchors this shape is tethered to.
    pub dynamic_anchors: Vec<AnchorId>,
    pub dynamic: bool,
    pub collides_with_road: bool,
    pub collides_with_nodes: bool,
    pub flipped: bool,
    pub mass: f64,
    pub bounciness: f64,
    pub pin_motor_strength: f64,
    pub pin_target_velocity: f64,
    /// Editor-only selection flag. Never persisted.
    pub highlighted: bool,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            position: Position::default(),
            points: Vec::new(),
            scale: Scale::default(),
            rotation: [0.0; 3],
            rotation_degrees: 0.0,
            color: [255.0; 3],
            fill_color: [255.0; 4],
            static_pins: Vec::new(),
            dynamic_anchors: Vec::new(),
            dynamic: false,
            collides_with_road: false,
            collides_with_nodes: false,
            flipped: false,
            mass: 1.0,
            bounciness: 0.5,
            pin_motor_strength: 0.0,
            pin_target_velocity: 0.0,
            highlighted: false,
        }
    }
}

impl Shape {
    /// Scale raw local points per axis, then rotate them counter-clockwise
    /// about their centroid by `rotation_z` degrees.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyPolygon`] when `local` is empty.
    pub fn bake_points(local: &[Point], scale: Scale, rotation_z: f64) -> Result<Vec<Point>, GeometryError> {
        let scaled: Vec<Point> = local
            .iter()
            .map(|p| Point::new(p.x * scale.x, p.y * scale.y))
            .collect();
        geometry::rotate_about_centroid(&scaled, rotation_z)
    }

    /// Shift the shape's position and static pins. Anchors are moved by the scene.
    fn translate(&mut self, dx: f64, dy: f64) {
        self.position.translate(dx, dy);
        for pin in &mut self.static_pins {
            pin.translate(dx, dy);
        }
    }
}

/// Owning store for shapes and anchors.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    anchors: HashMap<AnchorId, Anchor>,
    /// Insertion order of anchor ids, for stable serialization.
    anchor_order: Vec<AnchorId>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from loaded shapes and anchors. A repeated anchor guid
    /// replaces the earlier record but keeps its original slot.
    #[must_use]
    pub fn from_parts(shapes: Vec<Shape>, anchors: Vec<Anchor>) -> Self {
        let mut scene = Self { shapes, ..Self::default() };
        for anchor in anchors {
            scene.insert_anchor(anchor);
        }
        scene
    }

    // --- Shapes ---

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    // --- Anchors ---

    /// Insert or replace an anchor by guid.
    pub fn insert_anchor(&mut self, anchor: Anchor) {
        if !self.anchors.contains_key(&anchor.guid) {
            self.anchor_order.push(anchor.guid.clone());
        }
        self.anchors.insert(anchor.guid.clone(), anchor);
    }

    #[must_use]
    pub fn anchor(&self, id: &str) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    /// Anchors in insertion order.
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> + '_ {
        self.anchor_order.iter().filter_map(|id| self.anchors.get(id))
    }

    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    // --- Highlight ---

    /// Indices of highlighted shapes, in scene order.
    #[must_use]
    pub fn highlighted_indices(&self) -> Vec<usize> {
        self.shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.highlighted.then_some(i))
            .collect()
    }

    #[must_use]
    pub fn highlighted_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.highlighted).count()
    }

    /// Set one shape's highlight flag. Returns false if the index is out of range.
    pub fn set_highlight(&mut self, index: usize, highlighted: bool) -> bool {
        let Some(shape) = self.shapes.get_mut(index) else {
            return false;
        };
        shape.highlighted = highlighted;
        true
    }

    /// Flip one shape's highlight flag. Returns false if the index is out of range.
    pub fn toggle_highlight(&mut self, index: usize) -> bool {
        let Some(shape) = self.shapes.get_mut(index) else {
            return false;
        };
        shape.highlighted = !shape.highlighted;
        true
    }

    pub fn clear_highlights(&mut self) {
        for shape in &mut self.shapes {
            shape.highlighted = false;
        }
    }

    // --- Edits ---

    /// Move every highlighted shape by `(dx, dy)` world units, along with its
    /// static pins and every anchor it references. A shared anchor moves for
    /// each highlighted shape that references it. Returns the number of shapes moved.
    pub fn move_highlighted(&mut self, dx: i32, dy: i32) -> usize {
        let (dx, dy) = (f64::from(dx), f64::from(dy));
        let mut moved = 0;
        for shape in self.shapes.iter_mut().filter(|s| s.highlighted) {
            shape.translate(dx, dy);
            for id in &shape.dynamic_anchors {
                match self.anchors.get_mut(id) {
                    Some(anchor) => anchor.position.translate(dx, dy),
                    None => debug!(anchor = %id, "move skipped dangling anchor"),
                }
            }
            moved += 1;
        }
        moved
    }

    /// Duplicate every highlighted shape.
    ///
    /// Each copy is appended unhighlighted and keeps the original anchor ids.
    /// The original shape instead receives freshly minted copies of its
    /// anchors, so the copy and the original end up on separate anchors with
    /// the old ids staying on the copy. Ids with no matching anchor are
    /// dropped from the original. Returns the number of shapes duplicated.
    pub fn duplicate_highlighted(&mut self) -> usize {
        let indices = self.highlighted_indices();
        for &index in &indices {
            let mut copy = self.shapes[index].clone();
            copy.highlighted = false;
            self.shapes.push(copy);

            let old_ids = std::mem::take(&mut self.shapes[index].dynamic_anchors);
            let mut new_ids = Vec::with_capacity(old_ids.len());
            for id in old_ids {
                let Some(source) = self.anchors.get(&id) else {
                    debug!(anchor = %id, "duplicate dropped dangling anchor");
                    continue;
                };
                let mut fresh = source.clone();
                fresh.guid = Uuid::new_v4().to_string();
                new_ids.push(fresh.guid.clone());
                self.insert_anchor(fresh);
            }
            self.shapes[index].dynamic_anchors = new_ids;
        }
        indices.len()
    }

    /// Remove every highlighted shape. Anchors are left in place even if
    /// nothing references them anymore. Returns the number removed.
    pub fn delete_highlighted(&mut self) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| !s.highlighted);
        before - self.shapes.len()
    }
}
