//! Pure polygon math: centroid, rotation about an origin, and bounding boxes.
//!
//! Everything here is stateless. Angles are in degrees, counter-clockwise in
//! a Y-up frame.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("polygon has no points")]
    EmptyPolygon,
}

/// Arithmetic mean of the points.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyPolygon`] for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn centroid(points: &[Point]) -> Result<Point, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::EmptyPolygon);
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Ok(Point::new(sx / n, sy / n))
}

/// Rotate `point` counter-clockwise about `origin` by `angle_deg` degrees.
#[must_use]
pub fn rotate(origin: Point, point: Point, angle_deg: f64) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    Point {
        x: origin.x + cos * dx - sin * dy,
        y: origin.y + sin * dx + cos * dy,
    }
}

/// Rotate every point about the polygon's own centroid.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyPolygon`] for an empty slice.
pub fn rotate_about_centroid(points: &[Point], angle_deg: f64) -> Result<Vec<Point>, GeometryError> {
    let center = centroid(points)?;
    Ok(points.iter().map(|p| rotate(center, *p, angle_deg)).collect())
}

/// Axis-aligned bounds as `(min, max)` corners, or `None` when empty.
#[must_use]
pub fn bounding_box(points: &[Point]) -> Option<(Point, Point)> {
    let first = points.first()?;
    let init = (*first, *first);
    Some(points.iter().skip(1).fold(init, |(min, max), p| {
        (
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}
