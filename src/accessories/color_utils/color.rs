use std::fmt;
use std::str::FromStr;

use super::named;
use crate::error::{AccessoryError, Result};

/// Tolerance on component ranges and hex rounding.
pub const FLOAT_ERROR: f64 = 0.0000005;

/// An RGB color with every component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
}

fn in_unit_range(v: f64) -> bool {
    (-FLOAT_ERROR..=1.0 + FLOAT_ERROR).contains(&v)
}

impl Color {
    pub const WHITE: Color = Color { red: 1.0, green: 1.0, blue: 1.0 };
    pub const BLACK: Color = Color { red: 0.0, green: 0.0, blue: 0.0 };

    pub fn from_rgb(red: f64, green: f64, blue: f64) -> Result<Self> {
        for v in [red, green, blue] {
            if !in_unit_range(v) {
                return Err(AccessoryError::InvalidColor(format!(
                    "rgb component {} is outside 0..1",
                    v
                )));
            }
        }
        Ok(Self::clamped(red, green, blue))
    }

    /// Hue is taken modulo 1; saturation and lightness must be in `0..=1`.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Result<Self> {
        if !in_unit_range(saturation) || !in_unit_range(lightness) {
            return Err(AccessoryError::InvalidColor(format!(
                "hsl ({}, {}, {}) has saturation or lightness outside 0..1",
                hue, saturation, lightness
            )));
        }
        let (r, g, b) = hsl2rgb(hue, saturation, lightness);
        Ok(Self::clamped(r, g, b))
    }

    /// Interpolation results can overshoot by rounding; callers that mix
    /// valid colors use this instead of [`from_rgb`](Self::from_rgb).
    pub(crate) fn clamped(red: f64, green: f64, blue: f64) -> Self {
        Color {
            red: red.clamp(0.0, 1.0),
            green: green.clamp(0.0, 1.0),
            blue: blue.clamp(0.0, 1.0),
        }
    }

    fn from_packed(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f64 / 255.0;
        Color {
            red: channel(16),
            green: channel(8),
            blue: channel(0),
        }
    }

    pub fn rgb(&self) -> (f64, f64, f64) {
        (self.red, self.green, self.blue)
    }

    pub fn hsl(&self) -> (f64, f64, f64) {
        rgb2hsl(self.red, self.green, self.blue)
    }

    /// Six-digit form, `#rrggbb`.
    pub fn hex_l(&self) -> String {
        let byte = |c: f64| (c * 255.0 + 0.5 - FLOAT_ERROR) as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    /// Shortest form: `#fff` when every byte is a doubled digit, else `#rrggbb`.
    pub fn hex(&self) -> String {
        let long = self.hex_l();
        let digits = long.as_bytes();
        if digits[1] == digits[2] && digits[3] == digits[4] && digits[5] == digits[6] {
            format!(
                "#{}{}{}",
                digits[1] as char, digits[3] as char, digits[5] as char
            )
        } else {
            long
        }
    }

    /// `steps` colors from `self` to `other`, both included, interpolated
    /// component-wise in HSL space. The hue is not wrapped around.
    pub fn range_to(&self, other: &Color, steps: usize) -> Vec<Color> {
        if steps <= 1 {
            return vec![*self];
        }
        let begin = self.hsl();
        let end = other.hsl();
        let n = (steps - 1) as f64;
        let step = |b: f64, e: f64| (e - b) / n;
        let (dh, ds, dl) = (step(begin.0, end.0), step(begin.1, end.1), step(begin.2, end.2));
        (0..steps)
            .map(|i| {
                let i = i as f64;
                let (r, g, b) = hsl2rgb(begin.0 + i * dh, begin.1 + i * ds, begin.2 + i * dl);
                Color::clamped(r, g, b)
            })
            .collect()
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let long = self.hex_l();
        let name = named::WEB_COLORS
            .iter()
            .find(|(_, rgb)| format!("#{:06x}", rgb) == long)
            .map(|(name, _)| *name);
        match name {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.hex()),
        }
    }
}

impl FromStr for Color {
    type Err = AccessoryError;

    /// Accepts `#rgb`, `#rrggbb` or a web color name. Names are matched
    /// case-insensitively with spaces ignored, so `"Light Blue"` works.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| {
                AccessoryError::InvalidColor(format!("invalid hex color {:?}", s))
            });
        }
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        named::lookup(&key)
            .map(Color::from_packed)
            .ok_or_else(|| AccessoryError::InvalidColor(format!("unknown color name {:?}", s)))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    u32::from_str_radix(&expanded, 16).ok().map(Color::from_packed)
}

fn rgb2hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let vmin = r.min(g).min(b);
    let vmax = r.max(g).max(b);
    let diff = vmax - vmin;
    let vsum = vmin + vmax;
    let l = vsum / 2.0;

    if diff < FLOAT_ERROR {
        return (0.0, 0.0, l);
    }

    let s = if l < 0.5 {
        diff / vsum
    } else {
        diff / (2.0 - vsum)
    };

    let dr = ((vmax - r) / 6.0 + diff / 2.0) / diff;
    let dg = ((vmax - g) / 6.0 + diff / 2.0) / diff;
    let db = ((vmax - b) / 6.0 + diff / 2.0) / diff;

    let mut h = if r == vmax {
        db - dg
    } else if g == vmax {
        1.0 / 3.0 + dr - db
    } else {
        2.0 / 3.0 + dg - dr
    };
    if h < 0.0 {
        h += 1.0;
    }
    if h > 1.0 {
        h -= 1.0;
    }
    (h, s, l)
}

fn hsl2rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let v2 = if l < 0.5 { l * (1.0 + s) } else { (l + s) - s * l };
    let v1 = 2.0 * l - v2;
    (
        hue2rgb(v1, v2, h + 1.0 / 3.0),
        hue2rgb(v1, v2, h),
        hue2rgb(v1, v2, h - 1.0 / 3.0),
    )
}

fn hue2rgb(v1: f64, v2: f64, mut vh: f64) -> f64 {
    while vh < 0.0 {
        vh += 1.0;
    }
    while vh > 1.0 {
        vh -= 1.0;
    }
    if 6.0 * vh < 1.0 {
        v1 + (v2 - v1) * 6.0 * vh
    } else if 2.0 * vh < 1.0 {
        v2
    } else if 3.0 * vh < 2.0 {
        v1 + (v2 - v1) * (2.0 / 3.0 - vh) * 6.0
    } else {
        v1
    }
}
