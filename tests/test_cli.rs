// tests/test_cli.rs
// Drives the gatlab-accessories binary end to end.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_gatlab-accessories");

// Helper function to run the binary and return its output
fn run(args: &[&str]) -> io::Result<Output> {
    Command::new(BIN).args(args).output()
}

// Helper function to write a test input file
fn create_file(dir: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content.as_bytes())?;
    Ok(path)
}

fn stdout_of(output: &Output) -> String {
    assert!(output.status.success(), "command failed with: {output:?}");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_gapped_single_triple() -> io::Result<()> {
    let output = run(&[
        "gapped", "--seq", "ACGTACGT", "--cigar", "4M3N4M", "--md", "8", "-s", "short",
    ])?;
    assert_eq!(
        stdout_of(&output),
        "ref     ACGT[3N]ACGT\n\
         aln     ||||    ||||\n\
         read    ACGT----ACGT\n"
    );
    Ok(())
}

#[test]
fn test_gapped_sam_keeps_order_and_skips_unusable_records() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let sam = create_file(
        dir.path(),
        "reads.sam",
        "@HD\tVN:1.6\n\
         @SQ\tSN:chr1\tLN:1000\n\
         r1\t0\tchr1\t100\t60\t8M3D6M5I17M\t*\t0\t0\tAGAGCCTCTGTTCACATAGACCCCCATGCAACAACC\t*\tMD:Z:2T4T0^GGG7T15\n\
         r2\t0\tchr1\t200\t60\t4M\t*\t0\t0\tACGT\t*\n\
         r3\t256\tchr1\t300\t0\t4M\t*\t0\t0\tACGT\t*\tMD:Z:4\n\
         r4\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\t*\n\
         r5\t0\tchr1\t500\t60\t4M3N4M\t*\t0\t0\tACGTACGT\t*\tMD:Z:8\n",
    )?;

    let output = run(&["gapped", "--sam", sam.to_str().unwrap(), "-t", "2"])?;
    assert_eq!(
        stdout_of(&output),
        "r1\tchr1:100\n\
         ref     AGTGCCTTGGGTGTTCA-----ATCCCCATGCAACAACC\n\
         aln     ||.||||.   ||||||     |.|||||||||||||||\n\
         read    AGAGCCTC---TGTTCACATAGACCCCCATGCAACAACC\n\
         r5\tchr1:500\n\
         ref     ACGTACGT\n\
         aln     ||||||||\n\
         read    ACGTACGT\n"
    );
    Ok(())
}

#[test]
fn test_gapped_rejects_unknown_skip_mode() -> io::Result<()> {
    let output = run(&[
        "gapped", "--seq", "ACGT", "--cigar", "4M", "--md", "4", "-s", "compact",
    ])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_faidx_reverse_complement_and_line_width() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let fasta = create_file(dir.path(), "ref.fa", ">a\nACGTACGTACGT\n>b\nTTTT\n")?;

    let output = run(&[
        "faidx",
        fasta.to_str().unwrap(),
        "a:3-11",
        "b",
        "-i",
        "-l",
        "4",
    ])?;
    assert_eq!(stdout_of(&output), ">a:3-11\nCGTA\nCGTA\nC\n>b\nAAAA\n");
    Ok(())
}

#[test]
fn test_faidx_write_index_and_grep() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let fasta = create_file(dir.path(), "ref.fa", ">chr1\nACGT\nAC\n>scaffold\nGGG\n")?;

    let output = run(&["faidx", fasta.to_str().unwrap(), "-w", "-g", "chr"])?;
    assert_eq!(stdout_of(&output), ">chr1\nACGTAC\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("ref.fa.fai"))?,
        "chr1\t6\t6\t4\t5\nscaffold\t3\t24\t3\t4\n"
    );
    Ok(())
}

#[test]
fn test_faidx_unknown_sequence_fails() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let fasta = create_file(dir.path(), "ref.fa", ">a\nACGT\n")?;

    let output = run(&["faidx", fasta.to_str().unwrap(), "chrX"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_edit_range() -> io::Result<()> {
    let output = run(&["edit-range", "--cigar", "8M", "--md", "4A3", "-n", "10"])?;
    assert_eq!(stdout_of(&output), "[ 0 0 0 0 1 1 1 1]\n");
    Ok(())
}

#[test]
fn test_gradient_defaults_and_rgb() -> io::Result<()> {
    let output = run(&["gradient"])?;
    assert_eq!(
        stdout_of(&output),
        "#ffffff\n#bfbfbf\n#808080\n#404040\n#000000\n"
    );

    let output = run(&["gradient", "white", "black", "-n", "3", "-f", "rgb"])?;
    assert_eq!(
        stdout_of(&output),
        "(1, 1, 1)\n(0.5, 0.5, 0.5)\n(0, 0, 0)\n"
    );

    let output = run(&["gradient", "-k", "spiral"])?;
    assert!(!output.status.success());
    Ok(())
}
