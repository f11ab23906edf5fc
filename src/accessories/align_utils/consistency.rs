//! Cross-checking of a read sequence against its CIGAR string and MD tag.

use super::cigar::{cigar_to_list, CigarElement, CigarOp};
use super::md_tag::{md_to_list, MdOp};
use crate::error::{AccessoryError, Result};

/// An insertion recorded while walking the CIGAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    /// Number of aligned (`M = X`) bases preceding the insertion
    pub anchor: u64,
    /// Inserted bases
    pub len: u32,
    /// A deletion at the same anchor precedes the insertion in the CIGAR
    pub after_deletion: bool,
}

/// A read/CIGAR/MD triple that has been checked for consistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAlignment {
    pub cigar: Vec<CigarElement>,
    pub md: Vec<MdOp>,
    pub insertions: Vec<Insertion>,
}

/// Confirm that a read sequence, CIGAR string and MD tag describe the same
/// alignment.
///
/// The triple is consistent when:
/// - every CIGAR deletion has an MD deletion of the same length at the same
///   aligned position, and no MD deletion is left unclaimed;
/// - the aligned length of the CIGAR (`M = X`) equals the length covered by
///   the MD matches and mismatches;
/// - the query length of the CIGAR (`M I S = X`) equals the read length.
///
/// Both strings are parsed leniently, so malformed fragments are dropped
/// before the checks run.
pub fn validate_alignment(read_seq: &str, cigar: &str, md_tag: &str) -> Result<ParsedAlignment> {
    let inconsistent = |reason: String| AccessoryError::InconsistentAlignment {
        read_seq: read_seq.to_string(),
        cigar: cigar.to_string(),
        md_tag: md_tag.to_string(),
        reason,
    };

    let md = md_to_list(md_tag);
    let parsed_cigar = cigar_to_list(cigar);

    let mut md_len: u64 = 0;
    let mut md_dels: Vec<(u64, u64)> = Vec::new();
    for op in &md {
        match op {
            MdOp::Match(n) => md_len += *n as u64,
            MdOp::Mismatch(bases) => md_len += bases.len() as u64,
            MdOp::Deletion(bases) => md_dels.push((md_len, bases.len() as u64)),
        }
    }

    let mut query_len: u64 = 0;
    let mut aligned_len: u64 = 0;
    let mut insertions = Vec::new();
    let mut last_del_anchor: Option<u64> = None;
    for e in &parsed_cigar {
        let len = e.len as u64;
        match e.op {
            CigarOp::Del => {
                let Some(idx) = md_dels.iter().position(|&d| d == (aligned_len, len)) else {
                    return Err(inconsistent(format!(
                        "{}D after {} aligned bases has no matching MD deletion",
                        len, aligned_len
                    )));
                };
                md_dels.remove(idx);
                last_del_anchor = Some(aligned_len);
            }
            CigarOp::Ins => {
                insertions.push(Insertion {
                    anchor: aligned_len,
                    len: e.len,
                    after_deletion: last_del_anchor == Some(aligned_len),
                });
                query_len += len;
            }
            CigarOp::SoftClip => query_len += len,
            CigarOp::Match | CigarOp::Equal | CigarOp::Diff => {
                query_len += len;
                aligned_len += len;
            }
            CigarOp::RefSkip | CigarOp::HardClip | CigarOp::Pad => {}
        }
    }

    if let Some(&(pos, len)) = md_dels.first() {
        return Err(inconsistent(format!(
            "MD deletion of {} bases after {} aligned bases is missing from the CIGAR",
            len, pos
        )));
    }
    if aligned_len != md_len {
        return Err(inconsistent(format!(
            "CIGAR aligns {} bases but MD covers {}",
            aligned_len, md_len
        )));
    }
    if query_len != read_seq.len() as u64 {
        return Err(inconsistent(format!(
            "CIGAR consumes {} query bases but the read has {}",
            query_len,
            read_seq.len()
        )));
    }

    Ok(ParsedAlignment {
        cigar: parsed_cigar,
        md,
        insertions,
    })
}

/// Shorthand for [`validate_alignment`] when only the verdict matters.
pub fn is_consistent(read_seq: &str, cigar: &str, md_tag: &str) -> bool {
    match validate_alignment(read_seq, cigar, md_tag) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("{}", e);
            false
        }
    }
}
