//! Accessory modules shared by the gatlab tools.

pub mod align_utils;
pub mod color_utils;
pub mod fai_utils;
pub mod print_utils;
pub mod progress_bar;
pub mod utils;
