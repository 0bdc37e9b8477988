//! # pythagoras-core
//!
//! Geometry and recursive expansion for Pythagoras tree fractals.
//!
//! ```
//! use pythagoras_core::{CommandRecorder, TreeConfig, TreeGenerator};
//!
//! let config = TreeConfig { depth: 3, ..TreeConfig::default() };
//! let mut recorder = CommandRecorder::new();
//! let summary = TreeGenerator::new(config)?.generate(&mut recorder)?;
//!
//! assert_eq!(summary.triangles, 7);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! `mod foo;` loads `foo.rs`, `pub mod foo;` also exports it, and
//! `pub use foo::Bar;` re-exports `Bar` at the crate root so callers can
//! write `pythagoras_core::Bar`.

pub mod config;
pub mod depth;
pub mod generator;
pub mod geometry;
pub mod raster;
pub mod render;
pub mod style;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use config::{ConfigError, TreeConfig};
pub use depth::estimate_depth;
pub use generator::{CancelToken, GenerateError, GenerationSummary, GeneratorState, LevelProgress, TreeGenerator};
pub use geometry::{Edge, Point, TriangleApex, compute_square, compute_triangle_apex};
pub use raster::RasterCanvas;
pub use render::{CommandRecorder, DrawCommand, RenderError, Renderer};
pub use style::{Color, GradientStyle, ShapeKind, Style, StyleResolver, TieredStyle};
pub use svg::SvgCanvas;
