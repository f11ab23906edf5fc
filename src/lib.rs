//! Accessory helpers for sequencing data: SAM alignment strings, indexed
//! FASTA access, terminal output and color gradients.
//!
//! Everything lives under [`accessories`], e.g.
//! `gatlab_tools::accessories::align_utils`.

pub mod accessories;
pub mod defaults;
pub mod error;
pub mod io; // SAM text input for batch rendering
