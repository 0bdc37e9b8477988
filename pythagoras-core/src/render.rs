//! The drawing capability the generator talks to.
//!
//! The generator only ever issues the three calls of [`Renderer`]; it never
//! reads pixels back. Backends live in [`crate::raster`] and [`crate::svg`];
//! [`CommandRecorder`] keeps the calls as values.

use serde::Serialize;
use thiserror::Error;

use crate::geometry::Point;
use crate::style::Color;

/// Failure surfaced by a drawing backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("invalid {what}: {detail}")]
    InvalidShape { what: &'static str, detail: String },

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Polygon, line and rectangle drawing against a fixed-size canvas.
pub trait Renderer {
    /// Fill and/or outline a closed polygon. Both colors may be absent.
    fn draw_polygon(
        &mut self,
        vertices: &[Point],
        fill: Option<Color>,
        outline: Option<Color>,
    ) -> Result<(), RenderError>;

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) -> Result<(), RenderError>;

    /// Replace every pixel in the axis-aligned rectangle with `color`.
    fn fill_rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color) -> Result<(), RenderError>;
}

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Polygon {
        vertices: Vec<Point>,
        fill: Option<Color>,
        outline: Option<Color>,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    Rectangle {
        top_left: Point,
        bottom_right: Point,
        color: Color,
    },
}

impl DrawCommand {
    /// Send this command to another renderer.
    pub fn apply<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), RenderError> {
        match self {
            DrawCommand::Polygon { vertices, fill, outline } => renderer.draw_polygon(vertices, *fill, *outline),
            DrawCommand::Line { from, to, color, width } => renderer.draw_line(*from, *to, *color, *width),
            DrawCommand::Rectangle { top_left, bottom_right, color } => {
                renderer.fill_rectangle(*top_left, *bottom_right, *color)
            }
        }
    }
}

/// A renderer that stores every call in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the polygon commands, as `(vertices, fill, outline)`.
    pub fn polygons(&self) -> impl Iterator<Item = (&[Point], Option<Color>, Option<Color>)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Polygon { vertices, fill, outline } => Some((vertices.as_slice(), *fill, *outline)),
            _ => None,
        })
    }

    /// Replay the recording onto another renderer, stopping at the first error.
    pub fn replay<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), RenderError> {
        self.commands.iter().try_for_each(|cmd| cmd.apply(renderer))
    }
}

impl Renderer for CommandRecorder {
    fn draw_polygon(
        &mut self,
        vertices: &[Point],
        fill: Option<Color>,
        outline: Option<Color>,
    ) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Polygon { vertices: vertices.to_vec(), fill, outline });
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Line { from, to, color, width });
        Ok(())
    }

    fn fill_rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Rectangle { top_left, bottom_right, color });
        Ok(())
    }
}
