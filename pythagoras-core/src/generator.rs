//! Breadth-first expansion of the tree.
//!
//! Each level takes every edge of the frontier, builds a square on it, puts a
//! triangle on the square's far side, and collects the triangle's two legs as
//! the next frontier. The frontier doubles every level, so the two buffers are
//! sized once up front and swapped instead of reallocated.
//!
//! ## Rust Lesson #26: Double Buffering with `mem::swap`
//!
//! `std::mem::swap(&mut a, &mut b)` exchanges two `Vec`s by swapping their
//! (pointer, length, capacity) triples. No element is copied and neither
//! allocation is freed, so clearing the old buffer keeps its capacity for the
//! next level.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, TreeConfig};
use crate::geometry::{Edge, Point, compute_triangle_apex};
use crate::render::{RenderError, Renderer};
use crate::style::{Color, ShapeKind, Style, StyleResolver, TieredStyle};

const GRID_COLOR: Color = Color::rgb(200, 200, 200);
const AXIS_COLOR: Color = Color::rgb(150, 150, 150);

/// Why a generation run stopped early.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("renderer failed: {0}")]
    Render(#[from] RenderError),

    #[error("cancelled after {levels_completed} levels")]
    Cancelled { levels_completed: usize },

    #[error("cannot reserve room for {edges} frontier edges")]
    Capacity { edges: usize },
}

/// Where a generator is in its run.
///
/// The generator is borrowed mutably while it runs, so `Expanding` is seen
/// through [`LevelProgress::state`]; [`TreeGenerator::state`] reports `Idle`
/// before the first run and `Done` after each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GeneratorState {
    Idle,
    Expanding { level: usize },
    Done,
}

/// Shared flag a caller flips to stop a run between levels.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Reported after every finished level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    /// `Expanding { level }` for the level just finished
    pub state: GeneratorState,
    pub level: usize,
    pub depth: usize,
    /// Square/triangle pairs drawn on this level
    pub drawn: usize,
    /// Degenerate edges dropped on this level
    pub skipped: usize,
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub depth: usize,
    pub levels_completed: usize,
    pub squares: u64,
    pub triangles: u64,
    pub skipped_edges: u64,
}

/// Draws a tree described by a [`TreeConfig`] onto any [`Renderer`].
///
/// The style resolver is fixed at construction; [`TreeGenerator::new`] uses the
/// config's palette, [`TreeGenerator::with_style`] takes any resolver.
///
/// Degenerate edges (see [`Edge::is_degenerate`]) are dropped together with
/// their whole subtree; the rest of the tree is still drawn.
#[derive(Debug)]
pub struct TreeGenerator<S = TieredStyle> {
    config: TreeConfig,
    style: S,
    start: Edge,
    frontier: Vec<Edge>,
    next: Vec<Edge>,
    state: GeneratorState,
}

impl TreeGenerator<TieredStyle> {
    pub fn new(config: TreeConfig) -> Result<Self, ConfigError> {
        let style = config.palette.clone();
        Self::with_style(config, style)
    }
}

impl<S: StyleResolver> TreeGenerator<S> {
    /// Validate `config` and set up a generator. Nothing is drawn yet.
    pub fn with_style(config: TreeConfig, style: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = config.start_edge();
        Ok(Self {
            config,
            style,
            start,
            frontier: Vec::new(),
            next: Vec::new(),
            state: GeneratorState::Idle,
        })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Run to completion.
    pub fn generate<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<GenerationSummary, GenerateError> {
        self.generate_with(renderer, &CancelToken::new(), |_| {})
    }

    /// Run, checking `cancel` before every level and calling `on_level`
    /// after each one.
    ///
    /// Whatever was drawn before an error or cancellation stays on the
    /// renderer.
    pub fn generate_with<R, F>(
        &mut self,
        renderer: &mut R,
        cancel: &CancelToken,
        mut on_level: F,
    ) -> Result<GenerationSummary, GenerateError>
    where
        R: Renderer + ?Sized,
        F: FnMut(&LevelProgress),
    {
        let _span = tracing::debug_span!("generate", depth = self.config.depth, angle = self.config.angle).entered();

        self.state = GeneratorState::Idle;
        let result = self.run(renderer, cancel, &mut on_level);
        self.state = GeneratorState::Done;

        if let Ok(summary) = &result {
            info!(
                squares = summary.squares,
                triangles = summary.triangles,
                skipped = summary.skipped_edges,
                "tree generated"
            );
        }
        result
    }

    fn run<R, F>(
        &mut self,
        renderer: &mut R,
        cancel: &CancelToken,
        on_level: &mut F,
    ) -> Result<GenerationSummary, GenerateError>
    where
        R: Renderer + ?Sized,
        F: FnMut(&LevelProgress),
    {
        let depth = self.config.depth;
        let angle = self.config.angle;
        let mirror = self.config.mirror;

        self.reset_frontier()?;
        draw_backdrop(renderer, &self.config)?;

        let mut summary = GenerationSummary { depth, ..GenerationSummary::default() };

        for level in 0..depth {
            if cancel.is_cancelled() {
                return Err(GenerateError::Cancelled { levels_completed: level });
            }
            self.state = GeneratorState::Expanding { level };

            let mut progress = LevelProgress { state: self.state, level, depth, drawn: 0, skipped: 0 };
            for edge in &self.frontier {
                if edge.is_degenerate() {
                    progress.skipped += 1;
                    continue;
                }

                let square = edge.square();
                draw_shape(renderer, &square, self.style.resolve(level, ShapeKind::Square))?;

                // The far side of the square, p3 -> p4, is the triangle's base.
                let tri = compute_triangle_apex(square[2], square[3], angle, mirror);
                draw_shape(
                    renderer,
                    &[square[2], square[3], tri.apex],
                    self.style.resolve(level, ShapeKind::Triangle),
                )?;

                self.next.extend(tri.children);
                progress.drawn += 1;
            }

            std::mem::swap(&mut self.frontier, &mut self.next);
            self.next.clear();

            if progress.skipped > 0 {
                warn!(level, skipped = progress.skipped, "dropped degenerate edges and their subtrees");
            }
            debug!(level, drawn = progress.drawn, frontier = self.frontier.len(), "level done");

            summary.squares += progress.drawn as u64;
            summary.triangles += progress.drawn as u64;
            summary.skipped_edges += progress.skipped as u64;
            summary.levels_completed = level + 1;
            on_level(&progress);
        }

        // Depth 0 is just the initial square; otherwise close the tree with
        // the squares the last triangles carry.
        if depth == 0 || self.config.leaf_squares {
            if cancel.is_cancelled() {
                return Err(GenerateError::Cancelled { levels_completed: depth });
            }
            let style = self.style.resolve(depth, ShapeKind::Square);
            for edge in &self.frontier {
                if edge.is_degenerate() {
                    summary.skipped_edges += 1;
                    continue;
                }
                draw_shape(renderer, &edge.square(), style)?;
                summary.squares += 1;
            }
        }

        Ok(summary)
    }

    /// Put the start edge back as the only frontier entry and make sure both
    /// buffers can hold the widest level without growing.
    fn reset_frontier(&mut self) -> Result<(), GenerateError> {
        let widest = u32::try_from(self.config.depth)
            .ok()
            .and_then(|d| 1usize.checked_shl(d))
            .ok_or(GenerateError::Capacity { edges: usize::MAX })?;

        self.frontier.clear();
        self.next.clear();
        for buffer in [&mut self.frontier, &mut self.next] {
            buffer
                .try_reserve_exact(widest)
                .map_err(|_| GenerateError::Capacity { edges: widest })?;
        }

        self.frontier.push(self.start);
        Ok(())
    }
}

fn draw_shape<R: Renderer + ?Sized>(renderer: &mut R, vertices: &[Point], style: Style) -> Result<(), RenderError> {
    renderer.draw_polygon(vertices, style.fill, style.outline)
}

/// Background fill, then the optional grid.
fn draw_backdrop<R: Renderer + ?Sized>(renderer: &mut R, config: &TreeConfig) -> Result<(), RenderError> {
    let width = config.width as f64;
    let height = config.height as f64;
    renderer.fill_rectangle(Point::new(0.0, 0.0), Point::new(width, height), config.background)?;

    if config.show_grid {
        draw_grid(renderer, config)?;
    }
    Ok(())
}

/// Lines every `base_length` pixels outward from the center, then two heavier
/// axes through it.
fn draw_grid<R: Renderer + ?Sized>(renderer: &mut R, config: &TreeConfig) -> Result<(), RenderError> {
    let width = config.width as f64;
    let height = config.height as f64;
    let cx = (config.width / 2) as f64;
    let cy = (config.height / 2) as f64;
    let step = config.base_length.max(1.0);

    let mut x = cx;
    while x < width {
        renderer.draw_line(Point::new(x, 0.0), Point::new(x, height), GRID_COLOR, 1.0)?;
        x += step;
    }
    let mut x = cx - step;
    while x > 0.0 {
        renderer.draw_line(Point::new(x, 0.0), Point::new(x, height), GRID_COLOR, 1.0)?;
        x -= step;
    }

    let mut y = cy;
    while y < height {
        renderer.draw_line(Point::new(0.0, y), Point::new(width, y), GRID_COLOR, 1.0)?;
        y += step;
    }
    let mut y = cy - step;
    while y > 0.0 {
        renderer.draw_line(Point::new(0.0, y), Point::new(width, y), GRID_COLOR, 1.0)?;
        y -= step;
    }

    renderer.draw_line(Point::new(cx, 0.0), Point::new(cx, height), AXIS_COLOR, 2.0)?;
    renderer.draw_line(Point::new(0.0, cy), Point::new(width, cy), AXIS_COLOR, 2.0)?;
    Ok(())
}
