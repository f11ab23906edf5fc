//! Edit distance (NM), MD tag generation and per-position edit ranges.

use std::fmt::Write;

use super::cigar::{cigar_to_list, CigarElement, CigarOp};
use super::md_tag::{md_to_list, MdOp};
use crate::error::{AccessoryError, Result};

/// Compute NM (edit distance) and MD tag from aligned sequences and CIGAR.
///
/// `ref_seq` holds only the reference span covered by the alignment and
/// `query_seq` only the aligned part of the read (soft clips excluded).
/// Bases are compared case-insensitively.
///
/// NM = mismatches + insertions + deletions
pub fn compute_nm_and_md(
    ref_seq: &[u8],
    query_seq: &[u8],
    cigar: &[CigarElement],
) -> (u64, String) {
    let mut nm: u64 = 0;
    let mut md = String::with_capacity(cigar.len() * 3 + 8);
    let mut match_count: u64 = 0;

    let mut ri = 0usize;
    let mut qi = 0usize;

    for e in cigar {
        let len = e.len as usize;
        match e.op {
            CigarOp::Match | CigarOp::Equal | CigarOp::Diff => {
                for _ in 0..len {
                    if ri >= ref_seq.len() || qi >= query_seq.len() {
                        break;
                    }
                    if ref_seq[ri].eq_ignore_ascii_case(&query_seq[qi]) {
                        match_count += 1;
                    } else {
                        nm += 1;
                        // match count is emitted even if 0
                        let _ = write!(md, "{}", match_count);
                        match_count = 0;
                        md.push(ref_seq[ri].to_ascii_uppercase() as char);
                    }
                    ri += 1;
                    qi += 1;
                }
            }
            CigarOp::Ins => {
                nm += e.len as u64;
                qi += len;
            }
            CigarOp::Del => {
                nm += e.len as u64;
                if match_count > 0 {
                    let _ = write!(md, "{}", match_count);
                    match_count = 0;
                }
                md.push('^');
                for _ in 0..len {
                    if ri >= ref_seq.len() {
                        break;
                    }
                    md.push(ref_seq[ri].to_ascii_uppercase() as char);
                    ri += 1;
                }
            }
            CigarOp::RefSkip => {
                ri += len;
            }
            // query_seq excludes clipped bases; padding is silent
            CigarOp::SoftClip | CigarOp::HardClip | CigarOp::Pad => {}
        }
    }

    if match_count > 0 {
        let _ = write!(md, "{}", match_count);
    }
    if md.is_empty() {
        md.push('0');
    }

    (nm, md)
}

/// Compute NM from an existing MD tag and CIGAR.
///
/// Mismatches come from the MD tag (letters outside deletion blocks),
/// insertions and deletions from the CIGAR.
pub fn compute_nm_from_md(md_tag: &str, cigar: &[CigarElement]) -> u64 {
    let mismatches: u64 = md_to_list(md_tag)
        .iter()
        .filter_map(|op| match op {
            MdOp::Mismatch(bases) => Some(bases.len() as u64),
            _ => None,
        })
        .sum();

    let indels: u64 = cigar
        .iter()
        .filter(|e| matches!(e.op, CigarOp::Ins | CigarOp::Del))
        .map(|e| e.len as u64)
        .sum();

    mismatches + indels
}

/// Cumulative edit distance at every reference position of an alignment.
///
/// The distance starts at 0 at the 5' end and grows by one with each
/// mismatched or deleted reference base. Inserted bases are added to every
/// position that follows the insertion. Positions inside a skipped region
/// (`N`) repeat the value that precedes the region.
///
/// Fails when the reference span implied by the CIGAR differs from the one
/// implied by the MD tag.
pub fn edit_dist_range(cigar: &str, md_tag: &str) -> Result<Vec<u64>> {
    let mut md_by_pos: Vec<u64> = Vec::new();
    let mut cur_edit: u64 = 0;
    for op in md_to_list(md_tag) {
        match op {
            MdOp::Match(n) => {
                md_by_pos.extend(std::iter::repeat(cur_edit).take(n as usize));
            }
            MdOp::Mismatch(bases) | MdOp::Deletion(bases) => {
                let n = bases.len() as u64;
                md_by_pos.extend(cur_edit + 1..=cur_edit + n);
                cur_edit += n;
            }
        }
    }

    let mut md_by_cigar: Vec<u64> = Vec::with_capacity(md_by_pos.len());
    cur_edit = 0;
    for e in cigar_to_list(cigar) {
        let len = e.len as usize;
        match e.op {
            CigarOp::SoftClip | CigarOp::HardClip | CigarOp::Pad => {}
            CigarOp::Match | CigarOp::Equal | CigarOp::Diff | CigarOp::Del => {
                md_by_cigar.extend(std::iter::repeat(cur_edit).take(len));
            }
            CigarOp::Ins => {
                cur_edit += e.len as u64;
            }
            CigarOp::RefSkip => {
                let at = md_by_cigar.len();
                if at > md_by_pos.len() {
                    return Err(AccessoryError::EditRangeMismatch {
                        by_cigar: at,
                        by_md: md_by_pos.len(),
                    });
                }
                let fill = if at == 0 { 0 } else { md_by_pos[at - 1] };
                md_by_pos.splice(at..at, std::iter::repeat(fill).take(len));
                md_by_cigar.extend(std::iter::repeat(cur_edit).take(len));
            }
        }
    }

    if md_by_cigar.len() != md_by_pos.len() {
        return Err(AccessoryError::EditRangeMismatch {
            by_cigar: md_by_cigar.len(),
            by_md: md_by_pos.len(),
        });
    }

    Ok(md_by_cigar
        .iter()
        .zip(&md_by_pos)
        .map(|(c, m)| c + m)
        .collect())
}
