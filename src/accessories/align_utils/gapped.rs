//! Gapped pairwise rendering of an alignment from SEQ, CIGAR and MD alone.
//!
//! ```text
//! ref     AGTGCCTTGGGTGTTCA-----ATCCCCATGCAACAACC
//! aln     ||.||||.   ||||||     |.|||||||||||||||
//! read    AGAGCCTC---TGTTCACATAGACCCCCATGCAACAACC
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use super::cigar::CigarOp;
use super::consistency::validate_alignment;
use super::md_tag::MdOp;
use crate::defaults::ROW_LABEL_WIDTH;
use crate::error::{AccessoryError, Result};

/// How skipped reference regions (`N`) are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipMode {
    /// One `N` per skipped base
    Full,
    /// Leave the region out
    #[default]
    Skip,
    /// A compact `[<len>N]` marker
    Short,
}

impl FromStr for SkipMode {
    type Err = AccessoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(SkipMode::Full),
            "skip" => Ok(SkipMode::Skip),
            "short" => Ok(SkipMode::Short),
            _ => Err(AccessoryError::UnknownSkipMode(s.to_string())),
        }
    }
}

impl fmt::Display for SkipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkipMode::Full => "full",
            SkipMode::Skip => "skip",
            SkipMode::Short => "short",
        };
        f.write_str(name)
    }
}

/// Three equally long rows: implied reference, match line and read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GappedAlignment {
    pub reference: String,
    pub pairwise: String,
    pub read: String,
}

impl fmt::Display for GappedAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<w$}{}", "ref", self.reference, w = ROW_LABEL_WIDTH)?;
        writeln!(f, "{:<w$}{}", "aln", self.pairwise, w = ROW_LABEL_WIDTH)?;
        write!(f, "{:<w$}{}", "read", self.read, w = ROW_LABEL_WIDTH)
    }
}

/// Insert `insert` into `row` at `pos`, overwriting as many bytes when
/// `replace` is set.
fn splice_row(row: &mut Vec<u8>, pos: usize, insert: &[u8], replace: bool) {
    let pos = pos.min(row.len());
    let end = if replace {
        (pos + insert.len()).min(row.len())
    } else {
        pos
    };
    row.splice(pos..end, insert.iter().copied());
}

/// Render a read, its CIGAR and MD tag as a gapped alignment against the
/// reference implied by them.
///
/// - mismatches show the reference base on the `ref` row and `.` on the
///   `aln` row
/// - deletions show `-` on the `read` row
/// - insertions and soft clips show `-` on the `ref` row
/// - skipped regions are drawn according to `skip_mode`
/// - hard clips and padding are not drawn
///
/// Fails when the triple is inconsistent (see
/// [`validate_alignment`](super::consistency::validate_alignment)).
pub fn sam2gapped(
    read_seq: &str,
    cigar: &str,
    md_tag: &str,
    skip_mode: SkipMode,
) -> Result<GappedAlignment> {
    if !read_seq.is_ascii() {
        return Err(AccessoryError::InconsistentAlignment {
            read_seq: read_seq.to_string(),
            cigar: cigar.to_string(),
            md_tag: md_tag.to_string(),
            reason: "read sequence is not ASCII".to_string(),
        });
    }
    let parsed = validate_alignment(read_seq, cigar, md_tag)?;

    let mut read = read_seq.as_bytes().to_vec();
    let mut reference = read.clone();
    let mut pairwise = vec![b'|'; read.len()];

    // Leading soft clip, possibly behind a hard clip
    let mut soft_pos = 0usize;
    for e in parsed.cigar.iter().take(2) {
        match e.op {
            CigarOp::SoftClip => soft_pos += e.len as usize,
            CigarOp::HardClip => {}
            _ => break,
        }
    }

    // MD pass: place mismatches and deletions
    let mut insertions: VecDeque<_> = parsed.insertions.iter().copied().collect();
    let mut cur_pos = soft_pos;
    let mut aligned: u64 = 0;
    let mut deleted_at: Option<u64> = None;
    for md_op in &parsed.md {
        while let Some(ins) = insertions.front() {
            // an insertion written after a deletion waits for that deletion
            let pending_del = ins.after_deletion && deleted_at != Some(ins.anchor);
            if ins.anchor > aligned || (ins.anchor == aligned && pending_del) {
                break;
            }
            cur_pos += ins.len as usize;
            insertions.pop_front();
        }
        let op_len = match md_op {
            MdOp::Match(n) => {
                aligned += *n as u64;
                *n as usize
            }
            MdOp::Deletion(bases) => {
                let n = bases.len();
                splice_row(&mut read, cur_pos, &vec![b'-'; n], false);
                splice_row(&mut reference, cur_pos, bases.as_bytes(), false);
                splice_row(&mut pairwise, cur_pos, &vec![b' '; n], false);
                deleted_at = Some(aligned);
                n
            }
            MdOp::Mismatch(bases) => {
                let n = bases.len();
                splice_row(&mut reference, cur_pos, bases.as_bytes(), true);
                splice_row(&mut pairwise, cur_pos, &vec![b'.'; n], true);
                aligned += n as u64;
                n
            }
        };
        cur_pos += op_len;
    }

    // CIGAR pass: gap the reference under read-only bases, draw skips
    cur_pos = 0;
    for e in &parsed.cigar {
        let mut op_len = e.len as usize;
        match e.op {
            CigarOp::Ins | CigarOp::SoftClip => {
                splice_row(&mut reference, cur_pos, &vec![b'-'; op_len], true);
                splice_row(&mut pairwise, cur_pos, &vec![b' '; op_len], true);
            }
            CigarOp::RefSkip => {
                let insert = match skip_mode {
                    SkipMode::Full => vec![b'N'; op_len],
                    SkipMode::Skip => Vec::new(),
                    SkipMode::Short => format!("[{}N]", op_len).into_bytes(),
                };
                op_len = insert.len();
                splice_row(&mut reference, cur_pos, &insert, false);
                splice_row(&mut pairwise, cur_pos, &vec![b' '; op_len], false);
                splice_row(&mut read, cur_pos, &vec![b'-'; op_len], false);
            }
            _ => {}
        }
        if !matches!(e.op, CigarOp::HardClip | CigarOp::Pad) {
            cur_pos += op_len;
        }
    }

    // All three rows only ever receive ASCII bytes
    let into_string = |row: Vec<u8>| String::from_utf8_lossy(&row).into_owned();
    Ok(GappedAlignment {
        reference: into_string(reference),
        pairwise: into_string(pairwise),
        read: into_string(read),
    })
}
