/// Regression tests for CIGAR parsing and alignment consistency
///
/// These tests ensure:
/// 1. CIGAR query length matches the read length for consistent triples
/// 2. Malformed CIGAR fragments are skipped instead of failing
/// 3. Deletions in the CIGAR and the MD tag are checked against each other
/// 4. Clips, skips and padding are counted on the right side
use gatlab_tools::accessories::align_utils::cigar::{cigar_to_string, query_len};
use gatlab_tools::accessories::align_utils::{
    aln_len_from_cigar, cigar_to_list, is_consistent, parse_cigar, seq_len_from_cigar,
    validate_alignment, CigarElement, CigarOp, Insertion,
};
use gatlab_tools::error::AccessoryError;

/// Test that CIGAR length matches query length
#[test]
fn test_cigar_length_matches_query() {
    let test_cases = vec![
        // (CIGAR, query_length, should_match)
        ("100M", 100, true),
        ("50M10I40M", 100, true),
        ("50M10D50M", 100, true),
        ("5S90M5S", 100, true),
        ("5H100M", 100, true),
        ("40=1X59=", 100, true),
        ("50M10I40M", 101, false), // Wrong length
        ("50M10D50M", 110, false), // Deletion doesn't consume query
    ];

    for (cigar, query_len, should_match) in test_cases {
        let cigar_len = seq_len_from_cigar(cigar);
        if should_match {
            assert_eq!(cigar_len, query_len, "CIGAR {} should cover {} bases", cigar, query_len);
        } else {
            assert_ne!(cigar_len, query_len, "CIGAR {} should NOT cover {} bases", cigar, query_len);
        }
    }
}

/// Alignment length counts M, D, N and P but not clips or insertions
#[test]
fn test_alignment_length() {
    assert_eq!(aln_len_from_cigar("5S90M5S"), 90);
    assert_eq!(aln_len_from_cigar("50M10D50M"), 110);
    assert_eq!(aln_len_from_cigar("50M10I40M"), 90);
    assert_eq!(aln_len_from_cigar("10M100N10M"), 120);
    assert_eq!(aln_len_from_cigar("10M2P10M"), 22);
}

/// Garbage between fragments is dropped like a regex findall would
#[test]
fn test_lenient_cigar_parsing() {
    assert_eq!(parse_cigar("10M2I3D"), vec!["10M", "2I", "3D"]);
    assert_eq!(parse_cigar("10M  2Q 3=x4X"), vec!["10M", "3=", "4X"]);
    assert!(parse_cigar("*").is_empty());
    assert_eq!(seq_len_from_cigar("*"), 0);
}

/// Parsed elements keep order and render back to the same string
#[test]
fn test_cigar_elements_roundtrip() {
    let elements = cigar_to_list("3S8M3D6M5I17M2H");
    assert_eq!(elements.len(), 7);
    assert_eq!(elements[0], CigarElement::new(CigarOp::SoftClip, 3));
    assert_eq!(elements[2], CigarElement::new(CigarOp::Del, 3));
    assert_eq!(cigar_to_string(&elements), "3S8M3D6M5I17M2H");
    assert_eq!(query_len(&elements), 39);
    assert_eq!(cigar_to_string(&[]), "*");
}

/// The documented example alignment is consistent and yields one insertion
#[test]
fn test_validate_reference_example() {
    let parsed = validate_alignment(
        "AGAGCCTCTGTTCACATAGACCCCCATGCAACAACC",
        "8M3D6M5I17M",
        "2T4T0^GGG7T15",
    )
    .unwrap();
    assert_eq!(
        parsed.insertions,
        vec![Insertion {
            anchor: 14,
            len: 5,
            after_deletion: false
        }]
    );
    assert_eq!(parsed.cigar.len(), 5);
}

/// A CIGAR deletion without a matching MD deletion is inconsistent
#[test]
fn test_deletion_must_match_md() {
    let err = validate_alignment("ACGTACGT", "4M2D4M", "8").unwrap_err();
    match err {
        AccessoryError::InconsistentAlignment { read_seq, cigar, md_tag, .. } => {
            assert_eq!(read_seq, "ACGTACGT");
            assert_eq!(cigar, "4M2D4M");
            assert_eq!(md_tag, "8");
        }
        other => panic!("unexpected error {:?}", other),
    }
    // deletion at the wrong position
    assert!(!is_consistent("ACGTACGT", "4M2D4M", "3^GG5"));
    // deletion of the wrong length
    assert!(!is_consistent("ACGTACGT", "4M2D4M", "4^GGG4"));
    // leftover MD deletion
    assert!(!is_consistent("ACGTACGT", "8M", "4^GG4"));
}

/// Aligned length and read length are both checked
#[test]
fn test_length_checks() {
    assert!(is_consistent("ACGTACGT", "8M", "8"));
    assert!(!is_consistent("ACGTACGT", "8M", "7"));
    assert!(!is_consistent("ACGTACG", "8M", "8"));
    assert!(is_consistent("NNACGTACGT", "2S8M", "8"));
    assert!(is_consistent("ACGTACGT", "2H8M2H", "8"));
}

/// Skipped regions and padding consume neither count
#[test]
fn test_skip_and_padding_are_neutral() {
    assert!(is_consistent("ACGTACGT", "4M1000N4M", "8"));
    assert!(is_consistent("ACGTACGT", "4M2P4M", "8"));
}
