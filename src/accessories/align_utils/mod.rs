//! Helpers for processing sequence alignments.
//!
//! Parsing, checking and rendering of the alignment description carried by a
//! SAM record: the read sequence (SEQ), the CIGAR string and the MD tag.
//!
//! | Op | Description                                         |
//! |----|-----------------------------------------------------|
//! | M  | alignment match (can be a sequence match or mismatch) |
//! | I  | insertion to the reference                          |
//! | D  | deletion from the reference                         |
//! | N  | skipped region from the reference                   |
//! | S  | soft clipping (clipped sequences present in SEQ)    |
//! | H  | hard clipping (clipped sequences NOT present in SEQ) |
//! | P  | padding (silent deletion from padded reference)     |
//! | =  | sequence match                                      |
//! | X  | sequence mismatch                                   |
//!
//! `H` can only be the first and/or last operation, and `S` may only have
//! `H` between it and the ends of the string. The sum of the `M I S = X`
//! lengths equals the length of SEQ.

pub mod cigar;
pub mod consistency;
pub mod edit_distance;
pub mod gapped;
pub mod md_tag;

pub use cigar::{
    aln_len_from_cigar, cigar_to_list, parse_cigar, seq_len_from_cigar, CigarElement, CigarOp,
};
pub use consistency::{is_consistent, validate_alignment, Insertion, ParsedAlignment};
pub use edit_distance::{compute_nm_and_md, compute_nm_from_md, edit_dist_range};
pub use gapped::{sam2gapped, GappedAlignment, SkipMode};
pub use md_tag::{md_to_list, parse_md, MdOp};
