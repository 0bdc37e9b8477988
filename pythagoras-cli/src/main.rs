//! pythagoras - CLI for Pythagoras tree generation
//!
//! Usage:
//!   pythagoras generate -d 10 -a 40 -o tree.png   Render a tree
//!   pythagoras generate -c tree.yaml -o tree.svg  Render from a config file
//!   pythagoras estimate -a 40                     Advise a visible depth
//!   pythagoras config -d 10 > tree.yaml           Dump the effective config
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for per-level detail.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{ConfigArgs, EstimateArgs, GenerateArgs, cmd_config, cmd_estimate, cmd_generate};

#[derive(Parser)]
#[command(name = "pythagoras", version, about = "Pythagoras tree fractal generator")]
struct Cli {
    /// Log every level and skipped subtree
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a tree to an image or SVG file
    Generate(GenerateArgs),
    /// Estimate how many levels stay larger than a pixel
    Estimate(EstimateArgs),
    /// Print the effective configuration as YAML
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "pythagoras=debug,pythagoras_core=debug"
    } else {
        "pythagoras=info,pythagoras_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Generate(args) => cmd_generate(args),
        Command::Estimate(args) => cmd_estimate(args),
        Command::Config(args) => cmd_config(args),
    }
}
