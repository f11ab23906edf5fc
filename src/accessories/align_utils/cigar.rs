//! CIGAR string parsing and length bookkeeping.
//!
//! Parsing is lenient: any fragment that is not a run of digits followed by a
//! valid operation letter is dropped, the same way a `[0-9]+[MIDNSHP=X]`
//! scan would drop it.

use std::fmt;

/// A single CIGAR operation as defined by the SAM format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarOp {
    /// Alignment match (sequence match or mismatch)
    Match,
    /// Insertion to the reference
    Ins,
    /// Deletion from the reference
    Del,
    /// Skipped region from the reference (intron for mRNA-to-genome)
    RefSkip,
    /// Soft clip, bases present in SEQ
    SoftClip,
    /// Hard clip, bases absent from SEQ
    HardClip,
    /// Padding (silent deletion from padded reference)
    Pad,
    /// Sequence match
    Equal,
    /// Sequence mismatch
    Diff,
}

impl CigarOp {
    #[inline]
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'M' => Some(CigarOp::Match),
            b'I' => Some(CigarOp::Ins),
            b'D' => Some(CigarOp::Del),
            b'N' => Some(CigarOp::RefSkip),
            b'S' => Some(CigarOp::SoftClip),
            b'H' => Some(CigarOp::HardClip),
            b'P' => Some(CigarOp::Pad),
            b'=' => Some(CigarOp::Equal),
            b'X' => Some(CigarOp::Diff),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_byte(self) -> u8 {
        match self {
            CigarOp::Match => b'M',
            CigarOp::Ins => b'I',
            CigarOp::Del => b'D',
            CigarOp::RefSkip => b'N',
            CigarOp::SoftClip => b'S',
            CigarOp::HardClip => b'H',
            CigarOp::Pad => b'P',
            CigarOp::Equal => b'=',
            CigarOp::Diff => b'X',
        }
    }

    #[inline]
    pub const fn as_char(self) -> char {
        self.as_byte() as char
    }

    /// Operations whose bases are present in SEQ: `M I S = X`
    #[inline]
    pub const fn consumes_query(self) -> bool {
        matches!(
            self,
            CigarOp::Match | CigarOp::Ins | CigarOp::SoftClip | CigarOp::Equal | CigarOp::Diff
        )
    }

    /// Operations counted towards the alignment length: `M D N P`
    #[inline]
    pub const fn counts_for_alignment(self) -> bool {
        matches!(
            self,
            CigarOp::Match | CigarOp::Del | CigarOp::RefSkip | CigarOp::Pad
        )
    }

    /// Operations that place a read base against a reference base: `M = X`
    #[inline]
    pub const fn is_aligned(self) -> bool {
        matches!(self, CigarOp::Match | CigarOp::Equal | CigarOp::Diff)
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One `(op, len)` pair of a CIGAR string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarElement {
    pub op: CigarOp,
    pub len: u32,
}

impl CigarElement {
    pub const fn new(op: CigarOp, len: u32) -> Self {
        CigarElement { op, len }
    }
}

impl fmt::Display for CigarElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.op)
    }
}

/// Scan the CIGAR and yield `(fragment, op, len)` for every well-formed run.
fn scan_cigar(cigar: &str) -> impl Iterator<Item = (&str, CigarOp, u32)> + '_ {
    let bytes = cigar.as_bytes();
    let mut i = 0usize;
    std::iter::from_fn(move || {
        while i < bytes.len() {
            if !bytes[i].is_ascii_digit() {
                i += 1;
                continue;
            }
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            // A digit run is only kept when an operation letter follows it.
            let Some(&op_byte) = bytes.get(i) else {
                return None;
            };
            let Some(op) = CigarOp::from_byte(op_byte) else {
                continue;
            };
            i += 1;
            match cigar[start..i - 1].parse::<u32>() {
                Ok(len) => return Some((&cigar[start..i], op, len)),
                Err(e) => {
                    log::warn!("Dropping CIGAR fragment {}: {}", &cigar[start..i], e);
                }
            }
        }
        None
    })
}

/// Split a CIGAR string into its `"<len><op>"` fragments.
///
/// Parts of the string that do not conform to the SAM format are silently
/// ignored: `"10M5Z3I"` yields `["10M", "3I"]`.
pub fn parse_cigar(cigar: &str) -> Vec<String> {
    scan_cigar(cigar)
        .map(|(fragment, _, _)| fragment.to_string())
        .collect()
}

/// Parse a CIGAR string into typed operations.
pub fn cigar_to_list(cigar: &str) -> Vec<CigarElement> {
    scan_cigar(cigar)
        .map(|(_, op, len)| CigarElement::new(op, len))
        .collect()
}

/// Length of SEQ implied by the CIGAR (sum of `M I S = X`).
pub fn seq_len_from_cigar(cigar: &str) -> u64 {
    query_len(&cigar_to_list(cigar))
}

/// Alignment length implied by the CIGAR (sum of `M D N P`).
pub fn aln_len_from_cigar(cigar: &str) -> u64 {
    cigar_to_list(cigar)
        .iter()
        .filter(|e| e.op.counts_for_alignment())
        .map(|e| e.len as u64)
        .sum()
}

pub fn query_len(cigar: &[CigarElement]) -> u64 {
    cigar
        .iter()
        .filter(|e| e.op.consumes_query())
        .map(|e| e.len as u64)
        .sum()
}

/// Format parsed operations back into a CIGAR string. An empty list is `*`.
pub fn cigar_to_string(cigar: &[CigarElement]) -> String {
    if cigar.is_empty() {
        return "*".to_string();
    }
    cigar.iter().map(|e| e.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cigar_simple() {
        assert_eq!(parse_cigar("10M2I5M"), vec!["10M", "2I", "5M"]);
    }

    #[test]
    fn test_parse_cigar_ignores_garbage() {
        assert_eq!(parse_cigar("10M5Z3I"), vec!["10M", "3I"]);
        assert_eq!(parse_cigar("M10"), Vec::<String>::new());
        assert_eq!(parse_cigar("*"), Vec::<String>::new());
        assert_eq!(parse_cigar("3S 4M"), vec!["3S", "4M"]);
    }

    #[test]
    fn test_parse_cigar_lowercase_is_not_an_op() {
        assert_eq!(parse_cigar("5m6M"), vec!["6M"]);
    }

    #[test]
    fn test_cigar_to_list() {
        let ops = cigar_to_list("5S20M1D3N=2X");
        // "3N=" is 3N followed by a stray '=', "2X" stands on its own
        assert_eq!(
            ops,
            vec![
                CigarElement::new(CigarOp::SoftClip, 5),
                CigarElement::new(CigarOp::Match, 20),
                CigarElement::new(CigarOp::Del, 1),
                CigarElement::new(CigarOp::RefSkip, 3),
                CigarElement::new(CigarOp::Diff, 2),
            ]
        );
    }

    #[test]
    fn test_seq_len_from_cigar() {
        assert_eq!(seq_len_from_cigar("100M"), 100);
        assert_eq!(seq_len_from_cigar("5H5S40M2I10M3D40M"), 97);
        assert_eq!(seq_len_from_cigar("10=1X10="), 21);
        assert_eq!(seq_len_from_cigar("50M1000N50M"), 100);
    }

    #[test]
    fn test_aln_len_from_cigar() {
        assert_eq!(aln_len_from_cigar("100M"), 100);
        assert_eq!(aln_len_from_cigar("5S40M2I10M3D40M"), 93);
        assert_eq!(aln_len_from_cigar("50M1000N50M"), 1100);
        assert_eq!(aln_len_from_cigar("10M2P10M"), 22);
    }

    #[test]
    fn test_cigar_to_string() {
        let ops = cigar_to_list("3S7M1I");
        assert_eq!(cigar_to_string(&ops), "3S7M1I");
        assert_eq!(cigar_to_string(&[]), "*");
    }
}
