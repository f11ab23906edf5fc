use std::fmt;
use std::str::FromStr;

use super::color::Color;
use crate::error::{AccessoryError, Result};

/// Anything that can be turned into a [`Color`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    Color(Color),
    /// Name or hex string.
    Text(String),
    /// RGB components; only the first three are used.
    Components(Vec<f64>),
    /// Red channel over black. Only 0 and 1 are in range.
    Red(i64),
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Color(color)
    }
}

impl From<&str> for ColorSpec {
    fn from(text: &str) -> Self {
        ColorSpec::Text(text.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(text: String) -> Self {
        ColorSpec::Text(text)
    }
}

impl From<i64> for ColorSpec {
    fn from(red: i64) -> Self {
        ColorSpec::Red(red)
    }
}

impl From<(f64, f64, f64)> for ColorSpec {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        ColorSpec::Components(vec![r, g, b])
    }
}

impl From<[f64; 3]> for ColorSpec {
    fn from(rgb: [f64; 3]) -> Self {
        ColorSpec::Components(rgb.to_vec())
    }
}

impl From<Vec<f64>> for ColorSpec {
    fn from(components: Vec<f64>) -> Self {
        ColorSpec::Components(components)
    }
}

/// Normalise a color given as a [`Color`], a name or hex string, RGB
/// components or an integer red channel.
pub fn colorize(spec: impl Into<ColorSpec>) -> Result<Color> {
    match spec.into() {
        ColorSpec::Color(color) => Ok(color),
        ColorSpec::Text(text) => text.parse(),
        ColorSpec::Components(c) => match c.as_slice() {
            [r, g, b, ..] => Color::from_rgb(*r, *g, *b),
            _ => Err(AccessoryError::InvalidColor(format!(
                "need 3 rgb components, got {}",
                c.len()
            ))),
        },
        ColorSpec::Red(red) => Color::from_rgb(red as f64, 0.0, 0.0),
    }
}

/// Palette categories, as used by color brewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteType {
    Quantitative,
    Qualitative,
    Sequential,
    Diverging,
    #[default]
    Unknown,
}

impl PaletteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteType::Quantitative => "quantitative",
            PaletteType::Qualitative => "qualitative",
            PaletteType::Sequential => "sequential",
            PaletteType::Diverging => "diverging",
            PaletteType::Unknown => "unknown",
        }
    }
}

impl FromStr for PaletteType {
    type Err = std::convert::Infallible;

    /// Unrecognised labels become [`PaletteType::Unknown`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "quantitative" => PaletteType::Quantitative,
            "qualitative" => PaletteType::Qualitative,
            "sequential" => PaletteType::Sequential,
            "diverging" => PaletteType::Diverging,
            _ => PaletteType::Unknown,
        })
    }
}

impl fmt::Display for PaletteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, ordered list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    pub family: String,
    pub colors: Vec<Color>,
    pub pal_type: PaletteType,
}

impl Palette {
    pub fn new<I, C>(
        name: impl Into<String>,
        family: impl Into<String>,
        colors: I,
        pal_type: PaletteType,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColorSpec>,
    {
        let colors = colors.into_iter().map(colorize).collect::<Result<Vec<_>>>()?;
        Ok(Palette {
            name: name.into(),
            family: family.into(),
            colors,
            pal_type,
        })
    }

    pub fn ncols(&self) -> usize {
        self.colors.len()
    }

    pub fn rgb(&self) -> Vec<(f64, f64, f64)> {
        self.colors.iter().map(Color::rgb).collect()
    }

    pub fn hsl(&self) -> Vec<(f64, f64, f64)> {
        self.colors.iter().map(Color::hsl).collect()
    }

    pub fn hex(&self) -> Vec<String> {
        self.colors.iter().map(Color::hex).collect()
    }

    pub fn hex_l(&self) -> Vec<String> {
        self.colors.iter().map(Color::hex_l).collect()
    }

    /// `<Palette NAME ('TYPE', N colors)>`
    pub fn describe(&self) -> String {
        format!(
            "<Palette {} ('{}', {} colors)>",
            self.name,
            self.pal_type,
            self.ncols()
        )
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
