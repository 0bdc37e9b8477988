//! CLI command implementations.
//!
//! - `generate` - Render a tree to an image or SVG file
//! - `estimate` - Advise how deep a tree stays visible
//! - `config` - Print the effective configuration

pub mod common;
pub mod config;
pub mod estimate;
pub mod generate;

pub use config::{ConfigArgs, cmd_config};
pub use estimate::{EstimateArgs, cmd_estimate};
pub use generate::{GenerateArgs, cmd_generate};
