//! MD tag parsing.
//!
//! MD tag format:
//! - Numbers: count of matching bases
//! - Letters: mismatching reference base(s)
//! - ^LETTERS: deleted reference bases
//! - Consecutive mismatches are separated by 0: "A0T" not "AT"

use std::fmt;

/// One token of an MD tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MdOp {
    /// Run of matching bases
    Match(u32),
    /// Reference base(s) at mismatching positions
    Mismatch(String),
    /// Reference bases deleted from the read (without the leading '^')
    Deletion(String),
}

impl MdOp {
    /// Number of reference bases covered by this token
    pub fn ref_len(&self) -> u32 {
        match self {
            MdOp::Match(n) => *n,
            MdOp::Mismatch(bases) | MdOp::Deletion(bases) => bases.len() as u32,
        }
    }
}

impl fmt::Display for MdOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MdOp::Match(n) => write!(f, "{}", n),
            MdOp::Mismatch(bases) => write!(f, "{}", bases),
            MdOp::Deletion(bases) => write!(f, "^{}", bases),
        }
    }
}

fn run_end(bytes: &[u8], mut i: usize, pred: impl Fn(u8) -> bool) -> usize {
    while i < bytes.len() && pred(bytes[i]) {
        i += 1;
    }
    i
}

/// Split an MD tag into its tokens.
///
/// Tokens are digit runs, uppercase runs, or `^` followed by an uppercase
/// run. Anything else is silently ignored.
pub fn parse_md(md_tag: &str) -> Vec<String> {
    let bytes = md_tag.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        let end = if b.is_ascii_digit() {
            run_end(bytes, i, |c| c.is_ascii_digit())
        } else if b.is_ascii_uppercase() {
            run_end(bytes, i, |c| c.is_ascii_uppercase())
        } else if b == b'^' && bytes.get(i + 1).is_some_and(|c| c.is_ascii_uppercase()) {
            run_end(bytes, i + 1, |c| c.is_ascii_uppercase())
        } else {
            i += 1;
            continue;
        };
        tokens.push(md_tag[i..end].to_string());
        i = end;
    }
    tokens
}

/// Parse an MD tag into typed tokens.
pub fn md_to_list(md_tag: &str) -> Vec<MdOp> {
    parse_md(md_tag)
        .into_iter()
        .filter_map(|token| {
            if let Some(deleted) = token.strip_prefix('^') {
                Some(MdOp::Deletion(deleted.to_string()))
            } else if token.as_bytes()[0].is_ascii_digit() {
                match token.parse::<u32>() {
                    Ok(n) => Some(MdOp::Match(n)),
                    Err(e) => {
                        log::warn!("Dropping MD token {}: {}", token, e);
                        None
                    }
                }
            } else {
                Some(MdOp::Mismatch(token))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_md() {
        assert_eq!(parse_md("10A5^AC6"), vec!["10", "A", "5", "^AC", "6"]);
        assert_eq!(parse_md("0T0G12"), vec!["0", "T", "0", "G", "12"]);
    }

    #[test]
    fn test_parse_md_ignores_garbage() {
        assert_eq!(parse_md("5a^3C"), vec!["5", "3", "C"]);
        assert_eq!(parse_md("MD:Z:7"), vec!["MD", "Z", "7"]);
        assert_eq!(parse_md(""), Vec::<String>::new());
    }

    #[test]
    fn test_md_to_list() {
        assert_eq!(
            md_to_list("3C^GT0AG4"),
            vec![
                MdOp::Match(3),
                MdOp::Mismatch("C".to_string()),
                MdOp::Deletion("GT".to_string()),
                MdOp::Match(0),
                MdOp::Mismatch("AG".to_string()),
                MdOp::Match(4),
            ]
        );
    }

    #[test]
    fn test_md_op_display_round_trips_tokens() {
        let md = "12^TTA0C7";
        let rebuilt: String = md_to_list(md).iter().map(|op| op.to_string()).collect();
        assert_eq!(rebuilt, md);
    }
}
