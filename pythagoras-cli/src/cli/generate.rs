//! Generate command implementation.
//!
//! The tree is drawn on a worker thread while the main thread logs per-level
//! progress and, with `--time-limit`, cancels the run between levels. A
//! cancelled run still writes whatever was drawn.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::Serialize;
use tracing::{info, warn};

use pythagoras_core::{
    CancelToken, Color, GenerateError, GenerationSummary, GradientStyle, LevelProgress, RasterCanvas, Renderer,
    StyleResolver, SvgCanvas, TreeConfig, TreeGenerator, estimate_depth,
};

use super::common::TreeArgs;

/// Shapes smaller than this are not worth drawing.
const MIN_VISIBLE_PIXELS: f64 = 1.0;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Output file; .svg writes an SVG document, other extensions pick the
    /// raster format (png, bmp, tiff, jpg, ...)
    #[arg(short, long, default_value = "tree.png")]
    pub output: PathBuf,

    /// Blend fills from this color at the root...
    #[arg(long, requires = "gradient_to")]
    pub gradient_from: Option<Color>,

    /// ...to this color at the tips
    #[arg(long, requires = "gradient_from")]
    pub gradient_to: Option<Color>,

    /// Smooth polygon edges in raster output
    #[arg(long)]
    pub anti_alias: bool,

    /// Stop after the level running when this many seconds have passed
    #[arg(long, value_parser = parse_time_limit)]
    pub time_limit: Option<Duration>,

    /// Print a JSON summary to stdout
    #[arg(long)]
    pub json: bool,
}

/// JSON summary of one run.
#[derive(Serialize)]
struct JsonReport<'a> {
    output: &'a Path,
    width: u32,
    height: u32,
    estimated_depth: usize,
    cancelled: bool,
    elapsed_ms: f64,
    #[serde(flatten)]
    summary: GenerationSummary,
}

/// How a worker run ended.
enum Outcome {
    Finished(GenerationSummary),
    /// Stopped by the time limit; totals cover the finished levels only.
    Cancelled(GenerationSummary),
}

/// Output kind, decided by the file extension.
enum Target {
    Svg,
    Raster(ImageFormat),
}

impl Target {
    fn for_path(path: &Path) -> Result<Self> {
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            return Ok(Target::Svg);
        }
        ImageFormat::from_path(path)
            .map(Target::Raster)
            .with_context(|| format!("cannot tell the image format of {}", path.display()))
    }
}

pub fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    let config = args.tree.load()?;
    config.validate()?;
    let target = Target::for_path(&args.output)?;

    let estimated_depth = estimate_depth(config.base_length, config.angle, MIN_VISIBLE_PIXELS);
    if config.depth > estimated_depth {
        warn!(
            depth = config.depth,
            estimated_depth, "levels past the estimate will be smaller than a pixel"
        );
    }
    info!(
        depth = config.depth,
        angle = config.angle,
        output = %args.output.display(),
        "generating tree"
    );

    let start = Instant::now();
    let outcome = match (args.gradient_from, args.gradient_to) {
        (Some(root), Some(tip)) => {
            let style = GradientStyle { root, tip, outline: Some(config.palette.outline), depth: config.depth };
            draw_to(&config, style, &target, args)?
        }
        _ => draw_to(&config, config.palette.clone(), &target, args)?,
    };
    let elapsed = start.elapsed();

    let (summary, cancelled) = match outcome {
        Outcome::Finished(summary) => (summary, false),
        Outcome::Cancelled(summary) => {
            warn!(levels_completed = summary.levels_completed, "time limit reached, wrote a partial tree");
            (summary, true)
        }
    };

    info!(path = %args.output.display(), elapsed_ms = elapsed.as_secs_f64() * 1000.0, "wrote");

    if args.json {
        let report = JsonReport {
            output: &args.output,
            width: config.width,
            height: config.height,
            estimated_depth,
            cancelled,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Draw onto the canvas `target` asks for and write it out, partial or not.
fn draw_to<S>(config: &TreeConfig, style: S, target: &Target, args: &GenerateArgs) -> Result<Outcome>
where
    S: StyleResolver + Send,
{
    match target {
        Target::Svg => {
            let mut canvas = SvgCanvas::new(config.width, config.height);
            let outcome = run_worker(config, style, &mut canvas, args.time_limit)?;
            fs::write(&args.output, canvas.finish())
                .with_context(|| format!("writing {}", args.output.display()))?;
            Ok(outcome)
        }
        Target::Raster(format) => {
            let mut canvas = RasterCanvas::new(config.width, config.height)?.with_anti_alias(args.anti_alias);
            let outcome = run_worker(config, style, &mut canvas, args.time_limit)?;
            save_raster(&canvas, *format, &args.output)?;
            Ok(outcome)
        }
    }
}

/// Run the generator on a scoped worker thread, logging progress as levels
/// finish.
fn run_worker<S, R>(config: &TreeConfig, style: S, canvas: &mut R, time_limit: Option<Duration>) -> Result<Outcome>
where
    S: StyleResolver + Send,
    R: Renderer + Send,
{
    let mut generator = TreeGenerator::with_style(config.clone(), style)?;
    let cancel = CancelToken::new();
    let (tx, rx) = mpsc::channel::<LevelProgress>();
    // A limit too far out to represent as an Instant never fires.
    let mut deadline = time_limit.and_then(|limit| Instant::now().checked_add(limit));
    let mut finished = GenerationSummary { depth: config.depth, ..GenerationSummary::default() };

    let result = thread::scope(|scope| {
        let cancel = &cancel;
        let worker = scope.spawn(move || {
            generator.generate_with(canvas, cancel, |progress| {
                let _ = tx.send(*progress);
            })
        });

        loop {
            let next = match deadline {
                Some(at) => rx.recv_timeout(at.saturating_duration_since(Instant::now())),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match next {
                Ok(progress) => {
                    finished.levels_completed = progress.level + 1;
                    finished.squares += progress.drawn as u64;
                    finished.triangles += progress.drawn as u64;
                    finished.skipped_edges += progress.skipped as u64;
                    info!(
                        level = progress.level + 1,
                        depth = progress.depth,
                        drawn = progress.drawn,
                        skipped = progress.skipped,
                        "level done"
                    );
                }
                Err(RecvTimeoutError::Timeout) => {
                    cancel.cancel();
                    deadline = None;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        worker.join().map_err(|_| anyhow!("generator thread panicked"))
    })?;

    match result {
        Ok(summary) => Ok(Outcome::Finished(summary)),
        Err(GenerateError::Cancelled { .. }) => Ok(Outcome::Cancelled(finished)),
        Err(e) => Err(e.into()),
    }
}

/// Seconds as a non-negative, finite float that fits in a [`Duration`].
fn parse_time_limit(s: &str) -> Result<Duration> {
    let secs: f64 = s.trim().parse().with_context(|| format!("\"{}\" is not a number of seconds", s))?;
    if !secs.is_finite() || secs < 0.0 {
        bail!("time limit must be a finite, non-negative number of seconds, got {}", s);
    }
    Duration::try_from_secs_f64(secs).with_context(|| format!("time limit {} is too large", s))
}

fn save_raster(canvas: &RasterCanvas, format: ImageFormat, path: &Path) -> Result<()> {
    let rgba = RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.to_rgba8())
        .ok_or_else(|| anyhow!("pixel buffer does not match {}x{}", canvas.width(), canvas.height()))?;

    // JPEG has no alpha channel.
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    };
    image
        .save_with_format(path, format)
        .with_context(|| format!("writing {}", path.display()))
}
