//! Generation parameters and their validation.
//!
//! A [`TreeConfig`] can be built in code or deserialized from YAML/JSON; every
//! field has a default, so a file only needs the fields it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Edge, Point};
use crate::style::{Color, TieredStyle};

/// Default ceiling on the recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Default ceiling on squares plus triangles in one generation.
pub const DEFAULT_MAX_SHAPES: u64 = 1 << 22;

/// A configuration that cannot be generated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("angle must lie strictly between 0 and 90 degrees, got {0}")]
    AngleOutOfRange(f64),

    #[error("base length must be a positive number of pixels, got {0}")]
    BaseLength(f64),

    #[error("canvas must not be empty, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("initial edge is degenerate ({length} px long)")]
    DegenerateStartEdge { length: f64 },

    #[error("initial points {left:?} and {right:?} are not a horizontal unit edge")]
    NotUnitEdge { left: [f64; 2], right: [f64; 2] },

    #[error("depth {depth} exceeds the ceiling of {max}")]
    DepthAboveCeiling { depth: usize, max: usize },

    #[error("depth {depth} would draw {shapes} shapes, more than the ceiling of {max}")]
    TooManyShapes { depth: usize, shapes: u64, max: u64 },
}

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Side length of the initial square in pixels
    pub base_length: f64,
    /// Fills the whole canvas before drawing
    pub background: Color,
    /// Shift of the tree from the canvas center in pixels, Y up
    pub offset: [f64; 2],
    /// Left end of the initial edge in base-length units, Y up
    pub left_bottom: [f64; 2],
    /// Right end of the initial edge in base-length units, Y up
    pub right_bottom: [f64; 2],
    /// Number of square/triangle levels, 0 draws only the initial square
    pub depth: usize,
    /// Triangle angle in degrees, strictly inside (0, 90)
    pub angle: f64,
    /// Swap the two base angles of every triangle
    pub mirror: bool,
    /// Draw a grid of base-length cells with axes through the center
    pub show_grid: bool,
    /// Close the last level with its child squares
    pub leaf_squares: bool,
    /// Require the initial edge to be a horizontal unit segment
    pub strict_unit_edge: bool,
    /// Deepest level `validate` accepts
    pub max_depth: usize,
    /// Most polygons one run may draw, leaf squares included
    pub max_shapes: u64,
    /// Colors for the default tiered resolver
    pub palette: TieredStyle,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            base_length: 100.0,
            background: Color::rgba(255, 255, 255, 0),
            offset: [0.0, 0.0],
            left_bottom: [-0.5, 0.0],
            right_bottom: [0.5, 0.0],
            depth: 12,
            angle: 45.0,
            mirror: false,
            show_grid: false,
            leaf_squares: true,
            strict_unit_edge: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_shapes: DEFAULT_MAX_SHAPES,
            palette: TieredStyle::default(),
        }
    }
}

impl TreeConfig {
    /// Canvas center in pixels.
    pub fn center(&self) -> Point {
        Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Map a unit-square coordinate (Y up, relative to the center) to canvas
    /// pixels (Y down).
    pub fn to_canvas(&self, unit: [f64; 2]) -> Point {
        let center = self.center();
        Point::new(
            center.x + unit[0] * self.base_length + self.offset[0],
            center.y - unit[1] * self.base_length - self.offset[1],
        )
    }

    /// The edge the first square is built on.
    pub fn start_edge(&self) -> Edge {
        Edge::new(self.to_canvas(self.left_bottom), self.to_canvas(self.right_bottom))
    }

    /// Squares and triangles one run will draw, `None` on overflow.
    pub fn shape_count(&self) -> Option<u64> {
        let levels = u32::try_from(self.depth).ok()?;
        // Levels 0..depth each draw 2^level squares and as many triangles.
        let per_kind = 1u64.checked_shl(levels)?.checked_sub(1)?;
        let leaves = if self.leaf_squares || self.depth == 0 { 1u64 << levels } else { 0 };
        per_kind.checked_mul(2)?.checked_add(leaves)
    }

    /// Check everything that could put NaN or infinity into coordinates, or
    /// blow past the capacity ceilings, before anything is drawn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.angle > 0.0 && self.angle < 90.0) {
            return Err(ConfigError::AngleOutOfRange(self.angle));
        }
        if !(self.base_length.is_finite() && self.base_length > 0.0) {
            return Err(ConfigError::BaseLength(self.base_length));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyCanvas { width: self.width, height: self.height });
        }

        if self.strict_unit_edge {
            let dx = (self.right_bottom[0] - self.left_bottom[0]).abs();
            if (dx - 1.0).abs() > 1e-9 || self.left_bottom[1] != self.right_bottom[1] {
                return Err(ConfigError::NotUnitEdge { left: self.left_bottom, right: self.right_bottom });
            }
        }

        let start = self.start_edge();
        if start.is_degenerate() {
            return Err(ConfigError::DegenerateStartEdge { length: start.length() });
        }

        if self.depth > self.max_depth {
            return Err(ConfigError::DepthAboveCeiling { depth: self.depth, max: self.max_depth });
        }
        match self.shape_count() {
            Some(shapes) if shapes <= self.max_shapes => Ok(()),
            shapes => Err(ConfigError::TooManyShapes {
                depth: self.depth,
                shapes: shapes.unwrap_or(u64::MAX),
                max: self.max_shapes,
            }),
        }
    }
}
