//! SVG backend - writes the draw calls as a standalone SVG document.
//!
//! Coordinates are canvas pixels, so the viewBox is simply
//! `0 0 width height`.

use std::fmt::Write as _;

use crate::geometry::Point;
use crate::render::{RenderError, Renderer};
use crate::style::Color;

/// Collects shapes and renders them into SVG markup on [`SvgCanvas::finish`].
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: u32,
    height: u32,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, body: String::new() }
    }

    /// The complete document.
    pub fn finish(&self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        let _ = write!(
            svg,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
"#,
            w = self.width,
            h = self.height,
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

/// `fill="..."`-style attribute, with a separate opacity when not opaque.
fn paint_attr(name: &str, color: Option<Color>) -> String {
    match color {
        None => format!(r#" {}="none""#, name),
        Some(c) if c.a == 255 => format!(r#" {}="{}""#, name, Color { a: 255, ..c }.to_hex()),
        Some(c) => format!(
            r#" {name}="{}" {name}-opacity="{:.3}""#,
            Color { a: 255, ..c }.to_hex(),
            c.a as f64 / 255.0,
        ),
    }
}

fn check_finite(what: &'static str, points: &[Point]) -> Result<(), RenderError> {
    match points.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(RenderError::InvalidShape { what, detail: format!("vertex {:?}", p) }),
        None => Ok(()),
    }
}

impl Renderer for SvgCanvas {
    fn draw_polygon(
        &mut self,
        vertices: &[Point],
        fill: Option<Color>,
        outline: Option<Color>,
    ) -> Result<(), RenderError> {
        check_finite("polygon", vertices)?;
        if vertices.is_empty() {
            return Ok(());
        }

        let points: String = vertices
            .iter()
            .map(|p| format!("{:.3},{:.3}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");

        let _ = writeln!(
            self.body,
            r#"  <polygon points="{}"{}{}/>"#,
            points,
            paint_attr("fill", fill),
            paint_attr("stroke", outline),
        );
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) -> Result<(), RenderError> {
        check_finite("line", &[from, to])?;
        let _ = writeln!(
            self.body,
            r#"  <line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}"{} stroke-width="{}"/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            paint_attr("stroke", Some(color)),
            width,
        );
        Ok(())
    }

    fn fill_rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color) -> Result<(), RenderError> {
        check_finite("rectangle", &[top_left, bottom_right])?;
        let _ = writeln!(
            self.body,
            r#"  <rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}"{}/>"#,
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
            paint_attr("fill", Some(color)),
        );
        Ok(())
    }
}
