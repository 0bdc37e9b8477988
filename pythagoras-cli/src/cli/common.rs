//! Tree parameters shared by every subcommand that builds a config.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use pythagoras_core::{Color, TreeConfig};

/// Flags that override the configuration file (or the defaults).
#[derive(Debug, Default, Args)]
pub struct TreeArgs {
    /// YAML file with tree parameters; the flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Recursion depth (0 draws only the initial square)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Triangle angle in degrees, strictly between 0 and 90
    #[arg(short, long)]
    pub angle: Option<f64>,

    /// Swap the triangle's base angles
    #[arg(long)]
    pub mirror: bool,

    /// Draw a coordinate grid under the tree
    #[arg(long)]
    pub grid: bool,

    /// Left end of the initial edge in unit coordinates, "x;y"
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub left: Option<[f64; 2]>,

    /// Right end of the initial edge in unit coordinates, "x;y"
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub right: Option<[f64; 2]>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Side of the initial square in pixels
    #[arg(short, long)]
    pub base_length: Option<f64>,

    /// Shift of the tree from the canvas center in pixels, "x;y" (Y up)
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub offset: Option<[f64; 2]>,

    /// Background color: #rrggbb, #rrggbbaa or r,g,b[,a]
    #[arg(long)]
    pub background: Option<Color>,

    /// Leave the last level's triangles without child squares
    #[arg(long)]
    pub no_leaves: bool,

    /// Require the initial edge to be a horizontal unit segment
    #[arg(long)]
    pub strict: bool,

    /// Refuse depths above this ceiling
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Refuse runs that would draw more polygons than this
    #[arg(long)]
    pub max_shapes: Option<u64>,
}

impl TreeArgs {
    /// Defaults, then the config file, then the flags.
    pub fn load(&self) -> Result<TreeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => TreeConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut TreeConfig) {
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(angle) = self.angle {
            config.angle = angle;
        }
        if let Some(left) = self.left {
            config.left_bottom = left;
        }
        if let Some(right) = self.right {
            config.right_bottom = right;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(base_length) = self.base_length {
            config.base_length = base_length;
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(max_shapes) = self.max_shapes {
            config.max_shapes = max_shapes;
        }
        config.mirror |= self.mirror;
        config.show_grid |= self.grid;
        config.strict_unit_edge |= self.strict;
        if self.no_leaves {
            config.leaf_squares = false;
        }
    }
}

/// Parse "x;y" (decimal commas allowed) or "x,y".
pub fn parse_pair(s: &str) -> Result<[f64; 2]> {
    let normalized;
    let (x, y) = if s.contains(';') {
        normalized = s.replace(',', ".");
        normalized.split_once(';')
    } else {
        s.split_once(',')
    }
    .with_context(|| format!("expected \"x;y\", got \"{}\"", s))?;

    let parse = |v: &str| v.trim().parse::<f64>().with_context(|| format!("\"{}\" is not a number", v.trim()));
    let pair = [parse(x)?, parse(y)?];
    if !pair.iter().all(|v| v.is_finite()) {
        bail!("coordinates must be finite, got \"{}\"", s);
    }
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs() {
        assert_eq!(parse_pair("-0.5;0").unwrap(), [-0.5, 0.0]);
        assert_eq!(parse_pair("0,5;1,25").unwrap(), [0.5, 1.25]);
        assert_eq!(parse_pair("2, 3").unwrap(), [2.0, 3.0]);
        assert!(parse_pair("1").is_err());
        assert!(parse_pair("a;b").is_err());
        assert!(parse_pair("inf;0").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = TreeArgs {
            depth: Some(3),
            angle: Some(30.0),
            mirror: true,
            no_leaves: true,
            left: Some([0.0, 0.0]),
            right: Some([1.0, 0.0]),
            ..TreeArgs::default()
        };
        let config = args.load().unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.angle, 30.0);
        assert!(config.mirror);
        assert!(!config.leaf_squares);
        assert_eq!(config.right_bottom, [1.0, 0.0]);
        assert_eq!(config.width, TreeConfig::default().width);
    }

    #[test]
    fn ceilings_can_be_raised_or_lowered() {
        let args = TreeArgs { depth: Some(10), max_shapes: Some(100), ..TreeArgs::default() };
        let config = args.load().unwrap();
        assert_eq!(config.max_shapes, 100);
        assert!(config.validate().is_err(), "depth 10 draws 3070 shapes");

        let args = TreeArgs { depth: Some(22), max_depth: Some(22), max_shapes: Some(1 << 24), ..TreeArgs::default() };
        let config = args.load().unwrap();
        assert!(config.validate().is_ok());
    }
}
