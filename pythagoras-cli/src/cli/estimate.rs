//! Estimate command implementation.

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use pythagoras_core::estimate_depth;

#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Side of the initial square in pixels
    #[arg(short, long, default_value_t = 100.0)]
    pub base_length: f64,

    /// Triangle angle in degrees, strictly between 0 and 90
    #[arg(short, long, default_value_t = 45.0)]
    pub angle: f64,

    /// Smallest shape size still worth drawing, in pixels
    #[arg(short, long, default_value_t = 1.0)]
    pub min_pixels: f64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct JsonEstimate {
    base_length: f64,
    angle: f64,
    min_pixels: f64,
    depth: usize,
}

pub fn cmd_estimate(args: &EstimateArgs) -> Result<()> {
    if !(args.angle > 0.0 && args.angle < 90.0) {
        bail!("angle must lie strictly between 0 and 90 degrees, got {}", args.angle);
    }
    if !(args.min_pixels > 0.0) {
        bail!("minimum size must be positive, got {}", args.min_pixels);
    }

    let depth = estimate_depth(args.base_length, args.angle, args.min_pixels);

    if args.json {
        let out = JsonEstimate {
            base_length: args.base_length,
            angle: args.angle,
            min_pixels: args.min_pixels,
            depth,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("optimal depth: {}", depth);
    }
    Ok(())
}
