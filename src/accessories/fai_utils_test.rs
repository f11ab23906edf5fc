// src/accessories/fai_utils_test.rs

use super::*;
use std::io::Cursor;

const FASTA: &str = ">chr1 first sequence\n\
ACGTACGTAC\n\
GGGGCCCCAA\n\
TTT\n\
>chr2\n\
AAAACCCCGG\n\
TT\n\
>chr10\n\
NNNN\n";

const FAI: &str = "chr1\t23\t21\t10\t11\n\
chr2\t12\t53\t10\t11\n\
chr10\t4\t74\t4\t5\n";

fn indexed() -> IndexedFasta<Cursor<&'static [u8]>> {
    IndexedFasta::new(Cursor::new(FASTA.as_bytes()), Cursor::new(FAI.as_bytes())).unwrap()
}

// --- build_fai Tests ---

#[test]
fn test_build_fai_matches_samtools_layout() {
    let records = build_fai(Cursor::new(FASTA.as_bytes())).unwrap();
    let mut out = Vec::new();
    write_fai(&records, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), FAI);
}

#[test]
fn test_build_fai_crlf() {
    let records = build_fai(Cursor::new(&b">s\r\nACG\r\nT\r\n"[..])).unwrap();
    assert_eq!(
        records,
        vec![FaiRecord {
            name: "s".to_string(),
            length: 4,
            offset: 4,
            line_bases: 3,
            line_width: 5,
        }]
    );
}

#[test]
fn test_build_fai_without_trailing_newline() {
    let records = build_fai(Cursor::new(&b">s\nACGT\nAC"[..])).unwrap();
    assert_eq!(records[0].length, 6);
    assert_eq!(records[0].line_bases, 4);
    assert_eq!(records[0].line_width, 5);
}

#[test]
fn test_build_fai_rejects_ragged_lines() {
    assert!(matches!(
        build_fai(Cursor::new(&b">s\nACG\nA\nACG\n"[..])),
        Err(AccessoryError::MalformedFasta { .. })
    ));
    assert!(matches!(
        build_fai(Cursor::new(&b">s\nAC\nACG\n"[..])),
        Err(AccessoryError::MalformedFasta { .. })
    ));
}

#[test]
fn test_build_fai_rejects_sequence_before_header() {
    assert!(build_fai(Cursor::new(&b"ACGT\n>s\nACGT\n"[..])).is_err());
}

#[test]
fn test_build_fai_empty_sequence() {
    let records = build_fai(Cursor::new(&b">empty\n>s\nAC\n"[..])).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].length, 0);
    assert_eq!(records[1].offset, 10);
}

// --- FaiRecord Tests ---

#[test]
fn test_parse_fai_line() {
    let record = IndexedFasta::<Cursor<&[u8]>>::parse_fai_line("chr2\t12\t53\t10\t11\n").unwrap();
    assert_eq!(record.name, "chr2");
    assert_eq!(record.length, 12);
    assert_eq!(record.offset, 53);
    assert_eq!(record.line_bases, 10);
    assert_eq!(record.line_width, 11);
}

#[test]
fn test_parse_fai_line_ignores_fastq_columns() {
    let record: FaiRecord = "read1\t4\t6\t4\t5\t13".parse().unwrap();
    assert_eq!(record.to_string(), "read1\t4\t6\t4\t5");
}

#[test]
fn test_parse_fai_line_errors() {
    assert!(matches!(
        "chr1\t23\t21".parse::<FaiRecord>(),
        Err(AccessoryError::MalformedFaiLine { .. })
    ));
    assert!(matches!(
        "chr1\tlots\t21\t10\t11".parse::<FaiRecord>(),
        Err(AccessoryError::MalformedFaiLine { .. })
    ));
    assert!("chr1\t23\t21\t10\t9".parse::<FaiRecord>().is_err());
}

#[test]
fn test_byte_offset() {
    let record: FaiRecord = "chr1\t23\t21\t10\t11".parse().unwrap();
    assert_eq!(record.byte_offset(0), 21);
    assert_eq!(record.byte_offset(9), 30);
    assert_eq!(record.byte_offset(10), 32);
    assert_eq!(record.byte_offset(22), 45);
}

// --- IndexedFasta Tests ---

#[test]
fn test_grep_fai_is_substring_match() {
    let fasta = indexed();
    let lines = fasta.grep_fai("chr1");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("chr1\t"));
    assert!(lines[1].starts_with("chr10\t"));
    assert!(fasta.grep_fai("chrX").is_empty());
}

#[test]
fn test_get_fai_info() {
    let fasta = indexed();
    let info = fasta.get_fai_info("chr2").unwrap();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].offset, 53);
}

#[test]
fn test_get_seq() {
    let mut fasta = indexed();
    let info = fasta.find("chr1").unwrap();
    assert_eq!(fasta.get_seq(&info).unwrap(), "ACGTACGTACGGGGCCCCAATTT");
    let info = fasta.find("chr2").unwrap();
    assert_eq!(fasta.get_seq(&info).unwrap(), "AAAACCCCGGTT");
    let info = fasta.find("chr10").unwrap();
    assert_eq!(fasta.get_seq(&info).unwrap(), "NNNN");
}

#[test]
fn test_get_subseq_crosses_lines() {
    let mut fasta = indexed();
    let info = fasta.find("chr1").unwrap();
    assert_eq!(fasta.get_subseq(&info, 8, 13).unwrap(), "ACGGG");
    assert_eq!(fasta.get_subseq(&info, 20, 23).unwrap(), "TTT");
    assert_eq!(fasta.get_subseq(&info, 5, 5).unwrap(), "");
    assert!(fasta.get_subseq(&info, 20, 24).is_err());
}

#[test]
fn test_find_is_exact() {
    let fasta = indexed();
    assert!(matches!(
        fasta.find("chr"),
        Err(AccessoryError::SequenceNotFound(_))
    ));
}

#[test]
fn test_iter_all_seq() {
    let mut fasta = indexed();
    let all: Vec<(String, String)> = fasta
        .iter_all_seq("chr1")
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(
        all,
        vec![
            ("chr1".to_string(), "ACGTACGTACGGGGCCCCAATTT".to_string()),
            ("chr10".to_string(), "NNNN".to_string()),
        ]
    );
}

#[test]
fn test_truncated_fasta_is_reported() {
    let fai = "chr1\t23\t21\t10\t11\nghost\t50\t74\t10\t11\n";
    let mut fasta =
        IndexedFasta::new(Cursor::new(FASTA.as_bytes()), Cursor::new(fai.as_bytes())).unwrap();
    let info = fasta.find("ghost").unwrap();
    assert!(matches!(
        fasta.get_seq(&info),
        Err(AccessoryError::MalformedFasta { .. })
    ));
}

// --- Region Tests ---

#[test]
fn test_region_parse() {
    assert_eq!("chr1".parse::<Region>().unwrap(), Region::whole("chr1"));
    let region: Region = "chr1:1,000-2,000".parse().unwrap();
    assert_eq!(region.start, Some(1000));
    assert_eq!(region.end, Some(2000));
    let region: Region = "chr1:20".parse().unwrap();
    assert_eq!(region.start, Some(20));
    assert_eq!(region.end, None);
    // A trailing number after the last colon is read as a start coordinate
    assert_eq!(
        "HLA-A*01:01".parse::<Region>().unwrap().name,
        "HLA-A*01"
    );
    assert_eq!(
        "HLA-A*01:01:01:01:x".parse::<Region>().unwrap(),
        Region::whole("HLA-A*01:01:01:01:x")
    );
}

#[test]
fn test_region_parse_errors() {
    assert!("chr1:0-5".parse::<Region>().is_err());
    assert!("chr1:9-5".parse::<Region>().is_err());
    assert!(":1-5".parse::<Region>().is_err());
}

#[test]
fn test_region_display() {
    assert_eq!("chr1:5-9".parse::<Region>().unwrap().to_string(), "chr1:5-9");
    assert_eq!(Region::whole("chr2").to_string(), "chr2");
}

#[test]
fn test_fetch() {
    let mut fasta = indexed();
    assert_eq!(
        fasta.fetch(&"chr1:9-13".parse().unwrap()).unwrap(),
        "ACGGG"
    );
    assert_eq!(fasta.fetch(&"chr1:20".parse().unwrap()).unwrap(), "ATTT");
    // end is clamped to the sequence length
    assert_eq!(fasta.fetch(&"chr2:11-100".parse().unwrap()).unwrap(), "TT");
    assert_eq!(fasta.fetch(&Region::whole("chr10")).unwrap(), "NNNN");
    assert!(fasta.fetch(&"chr2:13".parse().unwrap()).is_err());
    assert!(fasta.fetch(&Region::whole("chr3")).is_err());
}

#[test]
fn test_index_path() {
    assert_eq!(
        index_path(Path::new("/data/ref.fa")),
        PathBuf::from("/data/ref.fa.fai")
    );
}
