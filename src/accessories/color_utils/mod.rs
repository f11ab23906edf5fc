//! Colors, palettes and smooth gradients between them.
//!
//! ```
//! use gatlab_tools::accessories::color_utils::{ColorFormat, ColorGradient, GradientKind};
//!
//! let grad = ColorGradient::new(["white", "black"], GradientKind::Linear1, ColorFormat::Hex)?;
//! let shades = grad.gradient(3, None, None).to_lines();
//! assert_eq!(shades, vec!["#ffffff", "#808080", "#000000"]);
//! # Ok::<(), gatlab_tools::error::AccessoryError>(())
//! ```

pub mod color;
pub mod gradient;
mod named;
pub mod palette;

pub use color::Color;
pub use gradient::{
    bernstein, bezier_gradient, linear_gradient1, linear_gradient2, ColorFormat, ColorGradient,
    GradientKind, GradientValues,
};
pub use palette::{colorize, ColorSpec, Palette, PaletteType};
