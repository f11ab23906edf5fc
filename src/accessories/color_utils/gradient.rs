use std::fmt;
use std::str::FromStr;

use super::color::Color;
use super::palette::{colorize, ColorSpec, Palette, PaletteType};
use crate::error::{AccessoryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientKind {
    /// Straight line between the end colors in RGB space.
    #[default]
    Linear1,
    /// Straight line between the end colors in HSL space.
    Linear2,
    /// Bezier curve using every edge color as a control point.
    Bezier,
}

impl GradientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradientKind::Linear1 => "linear1",
            GradientKind::Linear2 => "linear2",
            GradientKind::Bezier => "bezier",
        }
    }
}

impl FromStr for GradientKind {
    type Err = AccessoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear1" => Ok(GradientKind::Linear1),
            "linear2" => Ok(GradientKind::Linear2),
            "bezier" => Ok(GradientKind::Bezier),
            _ => Err(AccessoryError::UnknownOption {
                option: "gradient kind",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for GradientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
}

impl FromStr for ColorFormat {
    type Err = AccessoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(ColorFormat::Hex),
            "rgb" => Ok(ColorFormat::Rgb),
            _ => Err(AccessoryError::UnknownOption {
                option: "color format",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorFormat::Hex => f.write_str("hex"),
            ColorFormat::Rgb => f.write_str("rgb"),
        }
    }
}

/// Gradient colors rendered in the requested [`ColorFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum GradientValues {
    /// Long `#rrggbb` strings.
    Hex(Vec<String>),
    Rgb(Vec<(f64, f64, f64)>),
}

impl GradientValues {
    pub fn len(&self) -> usize {
        match self {
            GradientValues::Hex(v) => v.len(),
            GradientValues::Rgb(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One printable line per color.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            GradientValues::Hex(v) => v.clone(),
            GradientValues::Rgb(v) => v
                .iter()
                .map(|(r, g, b)| format!("({}, {}, {})", r, g, b))
                .collect(),
        }
    }
}

/// Gradient generator over a fixed set of edge colors.
///
/// `linear1` and `linear2` run from the first to the last edge color and
/// ignore the ones in between; `bezier` bends through all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGradient {
    pub edge_colors: Vec<Color>,
    pub gradient_kind: GradientKind,
    pub return_format: ColorFormat,
}

impl ColorGradient {
    /// An empty color list gives a white to black gradient.
    pub fn new<I, C>(colors: I, gradient_kind: GradientKind, return_format: ColorFormat) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColorSpec>,
    {
        let mut edge_colors = colors.into_iter().map(colorize).collect::<Result<Vec<_>>>()?;
        if edge_colors.is_empty() {
            edge_colors = vec![Color::WHITE, Color::BLACK];
        }
        Ok(ColorGradient {
            edge_colors,
            gradient_kind,
            return_format,
        })
    }

    pub fn init_color(&self) -> Color {
        self.edge_colors.first().copied().unwrap_or(Color::WHITE)
    }

    pub fn last_color(&self) -> Color {
        self.edge_colors.last().copied().unwrap_or(Color::BLACK)
    }

    /// The gradient as [`Color`]s; `None` uses the configured kind.
    pub fn colors(&self, n: usize, kind: Option<GradientKind>) -> Vec<Color> {
        match kind.unwrap_or(self.gradient_kind) {
            GradientKind::Linear1 => linear_gradient1(self.init_color(), self.last_color(), n),
            GradientKind::Linear2 => linear_gradient2(self.init_color(), self.last_color(), n),
            GradientKind::Bezier => bezier_gradient(&self.edge_colors, n),
        }
    }

    pub fn gradient(
        &self,
        n: usize,
        kind: Option<GradientKind>,
        format: Option<ColorFormat>,
    ) -> GradientValues {
        let colors = self.colors(n, kind);
        match format.unwrap_or(self.return_format) {
            ColorFormat::Hex => GradientValues::Hex(colors.iter().map(Color::hex_l).collect()),
            ColorFormat::Rgb => GradientValues::Rgb(colors.iter().map(Color::rgb).collect()),
        }
    }

    /// Wrap a gradient in a [`Palette`] of family `"<kind>_gradient"`.
    pub fn gradient_palette(
        &self,
        name: impl Into<String>,
        n: usize,
        kind: Option<GradientKind>,
    ) -> Palette {
        let kind = kind.unwrap_or(self.gradient_kind);
        Palette {
            name: name.into(),
            family: format!("{}_gradient", kind),
            colors: self.colors(n, Some(kind)),
            pal_type: PaletteType::Unknown,
        }
    }
}

pub fn linear_gradient1(init: Color, finish: Color, n: usize) -> Vec<Color> {
    if n <= 1 {
        return vec![init];
    }
    let start = init.rgb();
    let end = finish.rgb();
    let last = (n - 1) as f64;
    (0..n)
        .map(|i| {
            let t = i as f64 / last;
            Color::clamped(
                start.0 + t * (end.0 - start.0),
                start.1 + t * (end.1 - start.1),
                start.2 + t * (end.2 - start.2),
            )
        })
        .collect()
}

pub fn linear_gradient2(init: Color, finish: Color, n: usize) -> Vec<Color> {
    init.range_to(&finish, n)
}

/// Bernstein basis polynomial `b(i, n)` evaluated at `frac`.
pub fn bernstein(frac: f64, num: u32, inx: u32) -> f64 {
    if inx > num {
        return 0.0;
    }
    binomial(num, inx) * (1.0 - frac).powi((num - inx) as i32) * frac.powi(inx as i32)
}

fn binomial(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

pub fn bezier_gradient(colors: &[Color], n: usize) -> Vec<Color> {
    let Some(first) = colors.first() else {
        return Vec::new();
    };
    if n <= 1 {
        return vec![*first];
    }
    let degree = (colors.len() - 1) as u32;
    let last = (n - 1) as f64;
    (0..n)
        .map(|step| {
            let t = step as f64 / last;
            let (mut r, mut g, mut b) = (0.0, 0.0, 0.0);
            for (i, color) in colors.iter().enumerate() {
                let weight = bernstein(t, degree, i as u32);
                let (cr, cg, cb) = color.rgb();
                r += weight * cr;
                g += weight * cg;
                b += weight * cb;
            }
            Color::clamped(r, g, b)
        })
        .collect()
}
