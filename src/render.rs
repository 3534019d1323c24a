//! Rendering: draws the full scene onto a [`Surface`].
//!
//! This module receives read-only views of the scene, camera, and editor
//! flags and produces draw calls. It never mutates application state. The
//! only output besides pixels is a [`Frame`] recording the screen-space
//! hitbox computed for each shape this pass.
//!
//! All fallible surface calls propagate the backend's error type.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Camera, Point};
use crate::consts::{ANCHOR_COLOR, BACKGROUND_COLOR, HIGHLIGHT_COLOR, HITBOX_COLOR, PIN_COLOR, SELECTION_COLOR};
use crate::hit::{self, ScreenRect};
use crate::input::{InputState, UiState};
use crate::scene::{Scene, Shape};

/// Outline width in pixels for hitboxes, highlights, and the selection rectangle.
const OUTLINE_PX: f64 = 1.0;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn opaque([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Round and clamp 0–255 float channels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_channels([r, g, b, a]: [f64; 4]) -> Self {
        let c = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Self { r: c(r), g: c(g), b: c(b), a: c(a) }
    }
}

/// A 2D drawing target in screen pixels (origin top-left, Y down).
pub trait Surface {
    type Error;

    fn clear(&mut self, color: Rgba) -> Result<(), Self::Error>;
    fn fill_polygon(&mut self, points: &[Point], color: Rgba) -> Result<(), Self::Error>;
    fn stroke_polygon(&mut self, points: &[Point], color: Rgba, width: f64) -> Result<(), Self::Error>;
    /// Fill the ellipse inscribed in `bounds`.
    fn fill_ellipse(&mut self, bounds: ScreenRect, color: Rgba) -> Result<(), Self::Error>;
    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) -> Result<(), Self::Error>;
    fn stroke_rect(&mut self, rect: ScreenRect, color: Rgba, width: f64) -> Result<(), Self::Error>;
}

/// What a draw pass learned about the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Screen-space bounding box per shape, in scene order. `None` for a shape with no points.
    pub hitboxes: Vec<Option<ScreenRect>>,
}

/// Draw the full scene: shapes with their pins and anchors, overlays, and
/// the selection rectangle.
///
/// # Errors
///
/// Returns the surface's error if any draw call fails.
pub fn draw<S: Surface>(
    surface: &mut S,
    scene: &Scene,
    camera: &Camera,
    ui: &UiState,
    input: &InputState,
) -> Result<Frame, S::Error> {
    surface.clear(Rgba::opaque(BACKGROUND_COLOR))?;

    let mut frame = Frame { hitboxes: Vec::with_capacity(scene.shape_count()) };
    for shape in scene.shapes() {
        let hitbox = draw_shape(surface, shape, scene, camera, ui)?;
        frame.hitboxes.push(hitbox);
    }

    if let Some(rect) = input.selection_rect() {
        surface.stroke_rect(rect.normalized(), Rgba::opaque(SELECTION_COLOR), OUTLINE_PX)?;
    }

    Ok(frame)
}

fn draw_shape<S: Surface>(
    surface: &mut S,
    shape: &Shape,
    scene: &Scene,
    camera: &Camera,
    ui: &UiState,
) -> Result<Option<ScreenRect>, S::Error> {
    let projected = hit::project(shape, camera);
    if projected.len() >= 3 {
        let fill = Rgba { a: 255, ..Rgba::from_channels(shape.fill_color) };
        surface.fill_polygon(&projected, fill)?;
    }
    let hitbox = hit::shape_hitbox(shape, camera);

    // Static pins: circles one world unit across.
    let pin_color = Rgba::opaque(PIN_COLOR);
    for pin in &shape.static_pins {
        let c = camera.world_to_screen(pin.point());
        surface.fill_ellipse(centered_rect(c, camera.zoom), pin_color)?;
    }

    // Dynamic anchors: half-unit squares. Dangling ids draw nothing.
    let anchor_color = Rgba::opaque(ANCHOR_COLOR);
    for id in &shape.dynamic_anchors {
        if let Some(anchor) = scene.anchor(id) {
            let c = camera.world_to_screen(anchor.position.point());
            surface.fill_rect(centered_rect(c, camera.zoom / 2.0), anchor_color)?;
        }
    }

    if ui.show_hitboxes {
        if let Some(hb) = hitbox {
            surface.stroke_rect(hb, Rgba::opaque(HITBOX_COLOR), OUTLINE_PX)?;
        }
    }
    if shape.highlighted && projected.len() >= 2 {
        surface.stroke_polygon(&projected, Rgba::opaque(HIGHLIGHT_COLOR), OUTLINE_PX)?;
    }

    Ok(hitbox)
}

/// Square of side `size` centered on `center`.
fn centered_rect(center: Point, size: f64) -> ScreenRect {
    ScreenRect { x: center.x - size / 2.0, y: center.y - size / 2.0, width: size, height: size }
}
