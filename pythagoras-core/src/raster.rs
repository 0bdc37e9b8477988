//! Raster backend on top of tiny-skia.
//!
//! Shapes are filled first and outlined second with a one-pixel stroke.
//! Anti-aliasing is off by default so edges stay crisp, matching a plain
//! polygon rasterizer; turn it on with [`RasterCanvas::with_anti_alias`].

use tiny_skia::{BlendMode, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::trace;

use crate::geometry::Point;
use crate::render::{RenderError, Renderer};
use crate::style::Color;

const OUTLINE_WIDTH: f32 = 1.0;

/// An RGBA pixel canvas.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixmap: Pixmap,
    anti_alias: bool,
}

impl RasterCanvas {
    /// A transparent canvas. Fails on zero or oversized dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        Ok(Self { pixmap, anti_alias: false })
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The color at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Row-major RGBA bytes with straight (non-premultiplied) alpha, the
    /// layout image encoders expect.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = self.anti_alias;
        paint
    }
}

/// Build a closed (or open, for lines) path; `None` when there is nothing
/// to draw, e.g. all points coincide.
fn build_path(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

impl Renderer for RasterCanvas {
    fn draw_polygon(
        &mut self,
        vertices: &[Point],
        fill: Option<Color>,
        outline: Option<Color>,
    ) -> Result<(), RenderError> {
        if let Some(p) = vertices.iter().find(|p| !p.is_finite()) {
            return Err(RenderError::InvalidShape { what: "polygon", detail: format!("vertex {:?}", p) });
        }
        let Some(path) = build_path(vertices, true) else {
            trace!(vertices = vertices.len(), "empty polygon skipped");
            return Ok(());
        };

        if let Some(color) = fill {
            let paint = self.paint(color);
            self.pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
        if let Some(color) = outline {
            let paint = self.paint(color);
            let stroke = Stroke { width: OUTLINE_WIDTH, ..Stroke::default() };
            self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) -> Result<(), RenderError> {
        if !(from.is_finite() && to.is_finite() && width.is_finite() && width > 0.0) {
            return Err(RenderError::InvalidShape {
                what: "line",
                detail: format!("{:?} -> {:?} width {}", from, to, width),
            });
        }
        let Some(path) = build_path(&[from, to], false) else {
            return Ok(());
        };

        let paint = self.paint(color);
        let stroke = Stroke { width: width as f32, ..Stroke::default() };
        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        Ok(())
    }

    fn fill_rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color) -> Result<(), RenderError> {
        let rect = Rect::from_ltrb(
            top_left.x as f32,
            top_left.y as f32,
            bottom_right.x as f32,
            bottom_right.y as f32,
        )
        .ok_or_else(|| RenderError::InvalidShape {
            what: "rectangle",
            detail: format!("{:?} -> {:?}", top_left, bottom_right),
        })?;

        // Replace, don't blend: a transparent background must clear the canvas.
        let mut paint = self.paint(color);
        paint.blend_mode = BlendMode::Source;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_canvas() {
        assert!(matches!(RasterCanvas::new(0, 10), Err(RenderError::Canvas { width: 0, height: 10 })));
    }

    #[test]
    fn fills_and_outlines_square() {
        let mut canvas = RasterCanvas::new(40, 40).unwrap();
        canvas.fill_rectangle(Point::new(0.0, 0.0), Point::new(40.0, 40.0), Color::WHITE).unwrap();

        let square = [
            Point::new(10.0, 30.0),
            Point::new(30.0, 30.0),
            Point::new(30.0, 10.0),
            Point::new(10.0, 10.0),
        ];
        let red = Color::rgb(255, 0, 0);
        canvas.draw_polygon(&square, Some(red), Some(Color::BLACK)).unwrap();

        assert_eq!(canvas.pixel(20, 20), Some(red));
        assert_eq!(canvas.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixel(38, 38), Some(Color::WHITE));
        assert_eq!(canvas.pixel(40, 0), None);
    }

    #[test]
    fn transparent_background_replaces_pixels() {
        let mut canvas = RasterCanvas::new(8, 8).unwrap();
        canvas.fill_rectangle(Point::new(0.0, 0.0), Point::new(8.0, 8.0), Color::BLACK).unwrap();
        canvas
            .fill_rectangle(Point::new(0.0, 0.0), Point::new(8.0, 8.0), Color::rgba(255, 255, 255, 0))
            .unwrap();
        assert_eq!(canvas.pixel(4, 4).map(|c| c.a), Some(0));
    }

    #[test]
    fn rgba_bytes_are_straight_alpha() {
        let mut canvas = RasterCanvas::new(2, 1).unwrap();
        canvas
            .fill_rectangle(Point::new(0.0, 0.0), Point::new(2.0, 1.0), Color::rgba(200, 100, 50, 255))
            .unwrap();
        assert_eq!(canvas.to_rgba8(), vec![200, 100, 50, 255, 200, 100, 50, 255]);
    }

    #[test]
    fn non_finite_vertices_are_errors() {
        let mut canvas = RasterCanvas::new(8, 8).unwrap();
        let bad = [Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0), Point::new(1.0, 1.0)];
        assert!(canvas.draw_polygon(&bad, Some(Color::BLACK), None).is_err());
        assert!(canvas.draw_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Color::BLACK, 0.0).is_err());
    }

    #[test]
    fn collapsed_polygon_is_a_no_op() {
        let mut canvas = RasterCanvas::new(8, 8).unwrap();
        assert!(canvas.draw_polygon(&[], Some(Color::BLACK), None).is_ok());
    }
}
