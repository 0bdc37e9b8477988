//! Per-depth styling of squares and triangles.
//!
//! The generator never picks colors itself; it asks a [`StyleResolver`] for
//! every shape. [`TieredStyle`] is the default (brown trunk, lighter branches,
//! green leaves), [`GradientStyle`] blends between two colors, and any closure
//! `Fn(usize, ShapeKind) -> Style` works as well.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Which shape the generator is about to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Square,
    Triangle,
}

/// Fill and outline for one shape. `None` means "don't paint that part".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}': expected #rrggbb, #rrggbbaa or r,g,b[,a]")]
pub struct ParseColorError(String);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Linear blend, `t = 0` gives `self` and `t = 1` gives `other`.
    pub fn lerp(&self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            let channel = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|c| u8::from_str_radix(c, 16).ok())
                    .ok_or_else(err)
            };
            return match hex.len() {
                6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
                8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
                _ => Err(err()),
            };
        }

        let parts = trimmed
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err())?;
        match parts[..] {
            [r, g, b] => Ok(Color::rgb(r, g, b)),
            [r, g, b, a] => Ok(Color::rgba(r, g, b, a)),
            _ => Err(err()),
        }
    }
}

/// What a color may look like in a config file.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ParseColorError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Text(s) => s.parse(),
            ColorRepr::Rgb([r, g, b]) => Ok(Color::rgb(r, g, b)),
            ColorRepr::Rgba([r, g, b, a]) => Ok(Color::rgba(r, g, b, a)),
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_hex()
    }
}

impl Style {
    pub const fn new(fill: Option<Color>, outline: Option<Color>) -> Self {
        Self { fill, outline }
    }
}

// ============================================================================
// RESOLVERS
// ============================================================================
//
// ## Rust Lesson #25: Traits as Strategies
//
// A trait is an interface. The generator is generic over `S: StyleResolver`,
// so the compiler emits a specialized copy for each resolver - no virtual
// call and no boxing. The blanket impl below makes every matching closure
// a resolver too, so callers can pass `|depth, kind| ...` directly.

/// Maps `(depth, shape kind)` to the style of the shape being drawn.
pub trait StyleResolver {
    fn resolve(&self, depth: usize, kind: ShapeKind) -> Style;
}

impl<F> StyleResolver for F
where
    F: Fn(usize, ShapeKind) -> Style,
{
    #[inline]
    fn resolve(&self, depth: usize, kind: ShapeKind) -> Style {
        self(depth, kind)
    }
}

/// Three color tiers by depth: trunk, branch, leaf. Same for both shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TieredStyle {
    pub trunk: Color,
    pub branch: Color,
    pub leaf: Color,
    pub outline: Color,
    /// Deepest level still painted as trunk.
    pub trunk_until: usize,
    /// Deepest level still painted as branch.
    pub branch_until: usize,
}

impl Default for TieredStyle {
    fn default() -> Self {
        Self {
            trunk: Color::rgb(100, 54, 15),
            branch: Color::rgb(162, 96, 41),
            leaf: Color::rgb(38, 196, 64),
            outline: Color::BLACK,
            trunk_until: 2,
            branch_until: 5,
        }
    }
}

impl StyleResolver for TieredStyle {
    fn resolve(&self, depth: usize, _kind: ShapeKind) -> Style {
        let fill = if depth <= self.trunk_until {
            self.trunk
        } else if depth <= self.branch_until {
            self.branch
        } else {
            self.leaf
        };
        Style::new(Some(fill), Some(self.outline))
    }
}

/// Blends from `root` at depth 0 to `tip` at `depth`, outline fixed.
///
/// Triangles are drawn half a step further along the blend than the square
/// below them.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStyle {
    pub root: Color,
    pub tip: Color,
    pub outline: Option<Color>,
    pub depth: usize,
}

impl StyleResolver for GradientStyle {
    fn resolve(&self, depth: usize, kind: ShapeKind) -> Style {
        let step = match kind {
            ShapeKind::Square => depth as f64,
            ShapeKind::Triangle => depth as f64 + 0.5,
        };
        let t = if self.depth == 0 { 0.0 } else { step / self.depth as f64 };
        Style::new(Some(self.root.lerp(self.tip, t)), self.outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tiers() {
        let style = TieredStyle::default();
        let trunk = Some(Color::rgb(100, 54, 15));
        let branch = Some(Color::rgb(162, 96, 41));
        let leaf = Some(Color::rgb(38, 196, 64));

        for depth in 0..=2 {
            assert_eq!(style.resolve(depth, ShapeKind::Square).fill, trunk);
        }
        for depth in 3..=5 {
            assert_eq!(style.resolve(depth, ShapeKind::Square).fill, branch);
        }
        for depth in [6, 7, 12, 100] {
            assert_eq!(style.resolve(depth, ShapeKind::Square).fill, leaf);
        }
        for depth in 0..20 {
            for kind in [ShapeKind::Square, ShapeKind::Triangle] {
                assert_eq!(style.resolve(depth, kind).outline, Some(Color::BLACK));
            }
        }
    }

    #[test]
    fn closures_are_resolvers() {
        let custom = |depth: usize, kind: ShapeKind| match kind {
            ShapeKind::Square => Style::new(None, Some(Color::rgb(depth as u8, 0, 0))),
            ShapeKind::Triangle => Style::new(Some(Color::WHITE), None),
        };
        assert_eq!(custom.resolve(7, ShapeKind::Square).outline, Some(Color::rgb(7, 0, 0)));
        assert_eq!(custom.resolve(7, ShapeKind::Triangle).outline, None);
    }

    #[test]
    fn gradient_endpoints() {
        let style = GradientStyle {
            root: Color::rgb(0, 0, 0),
            tip: Color::rgb(200, 100, 50),
            outline: None,
            depth: 4,
        };
        assert_eq!(style.resolve(0, ShapeKind::Square).fill, Some(Color::rgb(0, 0, 0)));
        assert_eq!(style.resolve(2, ShapeKind::Square).fill, Some(Color::rgb(100, 50, 25)));
        assert_eq!(style.resolve(4, ShapeKind::Square).fill, Some(Color::rgb(200, 100, 50)));
        // Past the end the blend stays on the tip color.
        assert_eq!(style.resolve(9, ShapeKind::Triangle).fill, Some(Color::rgb(200, 100, 50)));
    }

    #[test]
    fn parse_colors() {
        assert_eq!("#ff8000".parse(), Ok(Color::rgb(255, 128, 0)));
        assert_eq!("#ff800080".parse(), Ok(Color::rgba(255, 128, 0, 128)));
        assert_eq!("10, 20, 30".parse(), Ok(Color::rgb(10, 20, 30)));
        assert_eq!("10,20,30,0".parse(), Ok(Color::rgba(10, 20, 30, 0)));
        assert!("#ff80".parse::<Color>().is_err());
        assert!("red".parse::<Color>().is_err());
        assert!("1,2".parse::<Color>().is_err());
        assert!("300,0,0".parse::<Color>().is_err());
    }

    #[test]
    fn hex_output() {
        assert_eq!(Color::rgb(100, 54, 15).to_hex(), "#64360f");
        assert_eq!(Color::rgba(255, 255, 255, 0).to_hex(), "#ffffff00");
    }

    #[test]
    fn colors_from_yaml() {
        let colors: Vec<Color> = serde_yaml::from_str("- '#000000'\n- [1, 2, 3]\n- [1, 2, 3, 4]\n").unwrap();
        assert_eq!(colors, vec![Color::BLACK, Color::rgb(1, 2, 3), Color::rgba(1, 2, 3, 4)]);
    }
}
