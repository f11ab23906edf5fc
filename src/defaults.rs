// src/defaults.rs

// Progress bar
pub const BAR_LEN: usize = 40;
pub const BAR_CHAR: &str = "=";

// Pretty printing
pub const PRETTY_LIST_MAX_LEN: usize = 6;

// Gapped alignment rendering
pub const SKIP_MODE: &str = "skip";
pub const ROW_LABEL_WIDTH: usize = 8;

// Color gradients
pub const GRADIENT_SIZE: usize = 5;
pub const GRADIENT_KIND: &str = "linear1";
pub const GRADIENT_FORMAT: &str = "hex";
pub const GRADIENT_START: &str = "white";
pub const GRADIENT_END: &str = "black";

// FASTA output
pub const FASTA_LINE_WIDTH: usize = 60;

// Other Constants
pub const VERBOSITY: i32 = 3;
