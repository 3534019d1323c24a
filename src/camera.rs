#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

/// A point in either screen or world space.
///
/// World space is Y-up; screen space is Y-down with the origin at the
/// top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera state for pan/zoom over the scene.
///
/// `pan_x` / `pan_y` are in world units and are added to a world point
/// before scaling. `zoom` is a multiplicative scale factor (1.0 = one world
/// unit per pixel) and is always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::centered(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl Camera {
    /// A camera that puts the world origin at the center of a viewport of
    /// the given pixel size, at zoom 1.
    #[must_use]
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            pan_x: f64::from(width) / 2.0,
            pan_y: -(f64::from(height) / 2.0),
            zoom: 1.0,
        }
    }

    /// Convert a world-space point to screen pixels.
    ///
    /// `screen.x = (world.x + pan_x) * zoom`, `screen.y = -(world.y + pan_y) * zoom`.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: (world.x + self.pan_x) * self.zoom,
            y: -(world.y + self.pan_y) * self.zoom,
        }
    }

    /// Project a shape-local point, offset by the shape's world position.
    #[must_use]
    pub fn local_to_screen(&self, local: Point, position: Point) -> Point {
        self.world_to_screen(Point::new(local.x + position.x, local.y + position.y))
    }

    /// Convert a screen pixel back to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: screen.x / self.zoom - self.pan_x,
            y: -screen.y / self.zoom - self.pan_y,
        }
    }

    /// Pan by a pointer drag of `(dx, dy)` screen pixels. The world follows
    /// the pointer, so a downward drag moves the camera toward world +Y.
    pub fn pan_by_screen_delta(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx / self.zoom;
        self.pan_y -= dy / self.zoom;
    }

    /// Zoom in by one scroll notch. Returns `false` if the ceiling was hit.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + self.zoom * ZOOM_STEP)
    }

    /// Zoom out by one scroll notch. Returns `false` if the floor was hit.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - self.zoom * ZOOM_STEP)
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        let clamped = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = clamped;
        (clamped - zoom).abs() < f64::EPSILON
    }
}
