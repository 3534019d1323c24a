//! Software [`Surface`] backed by a tiny-skia pixmap.
//!
//! Degenerate geometry (fewer than two distinct points, zero-area rects)
//! draws nothing instead of failing, so drawing itself cannot error. Only
//! allocation and PNG encoding can.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::convert::Infallible;
use std::path::Path;

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::camera::Point;
use crate::hit::ScreenRect;
use crate::render::{Rgba, Surface};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("failed to write PNG: {0}")]
    Png(String),
}

pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    /// Allocate a transparent surface.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidSize`] when either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// Demultiplied color at a pixel, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba { r: c.red(), g: c.green(), b: c.blue(), a: c.alpha() })
    }

    /// Encode the surface as PNG at `path`.
    ///
    /// # Errors
    ///
    /// [`RasterError::Png`] if encoding or writing fails.
    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        self.pixmap.save_png(path).map_err(|e| RasterError::Png(e.to_string()))
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn polygon_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

#[allow(clippy::cast_possible_truncation)]
fn skia_rect(rect: ScreenRect) -> Option<tiny_skia::Rect> {
    let r = rect.normalized();
    tiny_skia::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
}

#[allow(clippy::cast_possible_truncation)]
fn stroke(width: f64) -> Stroke {
    Stroke { width: width as f32, ..Stroke::default() }
}

impl Surface for PixmapSurface {
    type Error = Infallible;

    fn clear(&mut self, color: Rgba) -> Result<(), Infallible> {
        self.pixmap.fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) -> Result<(), Infallible> {
        if let Some(path) = polygon_path(points) {
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
        }
        Ok(())
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Rgba, width: f64) -> Result<(), Infallible> {
        if let Some(path) = polygon_path(points) {
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke(width), Transform::identity(), None);
        }
        Ok(())
    }

    fn fill_ellipse(&mut self, bounds: ScreenRect, color: Rgba) -> Result<(), Infallible> {
        if let Some(path) = skia_rect(bounds).and_then(PathBuilder::from_oval) {
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) -> Result<(), Infallible> {
        if let Some(r) = skia_rect(rect) {
            self.pixmap.fill_rect(r, &paint(color), Transform::identity(), None);
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: ScreenRect, color: Rgba, width: f64) -> Result<(), Infallible> {
        if let Some(r) = skia_rect(rect) {
            let path = PathBuilder::from_rect(r);
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke(width), Transform::identity(), None);
        }
        Ok(())
    }
}
