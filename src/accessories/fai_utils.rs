//! Random access to indexed FASTA files (`.fa` + `.fai`).
//!
//! The index format is the samtools one: one tab-separated line per
//! sequence holding its name, length, byte offset of the first base, bases
//! per line and bytes per line (terminator included).

use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AccessoryError, Result};

#[cfg(test)]
#[path = "fai_utils_test.rs"]
mod fai_utils_test;

/// One parsed line of a `.fai` index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaiRecord {
    pub name: String,
    /// Number of bases in the sequence
    pub length: u64,
    /// Byte offset of the first base in the FASTA file
    pub offset: u64,
    /// Bases per full line
    pub line_bases: u64,
    /// Bytes per full line, terminator included
    pub line_width: u64,
}

impl FaiRecord {
    /// Byte offset in the FASTA file of the 0-based base `pos`.
    pub fn byte_offset(&self, pos: u64) -> u64 {
        if self.line_bases == 0 {
            return self.offset;
        }
        self.offset + pos / self.line_bases * self.line_width + pos % self.line_bases
    }
}

impl FromStr for FaiRecord {
    type Err = AccessoryError;

    fn from_str(line: &str) -> Result<Self> {
        let malformed = |reason: String| AccessoryError::MalformedFaiLine {
            line: line.to_string(),
            reason,
        };
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields.len() < 5 {
            return Err(malformed(format!(
                "expected at least 5 tab-separated fields, found {}",
                fields.len()
            )));
        }
        let number = |idx: usize, what: &str| -> Result<u64> {
            fields[idx]
                .trim()
                .parse::<u64>()
                .map_err(|e| malformed(format!("invalid {} {:?}: {}", what, fields[idx], e)))
        };
        let record = FaiRecord {
            name: fields[0].to_string(),
            length: number(1, "length")?,
            offset: number(2, "offset")?,
            line_bases: number(3, "line bases")?,
            line_width: number(4, "line width")?,
        };
        if record.length > 0 && record.line_bases == 0 {
            return Err(malformed("line bases must be > 0".to_string()));
        }
        if record.line_width < record.line_bases {
            return Err(malformed("line width is smaller than line bases".to_string()));
        }
        Ok(record)
    }
}

impl fmt::Display for FaiRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.length, self.offset, self.line_bases, self.line_width
        )
    }
}

/// A sequence region: `name`, `name:start` or `name:start-end`.
///
/// Coordinates are 1-based and inclusive, as on the samtools command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl Region {
    pub fn whole(name: impl Into<String>) -> Self {
        Region {
            name: name.into(),
            start: None,
            end: None,
        }
    }
}

fn parse_coordinate(s: &str) -> Option<u64> {
    let cleaned: String = s.chars().filter(|&c| c != ',').collect();
    cleaned.parse().ok()
}

impl FromStr for Region {
    type Err = AccessoryError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| AccessoryError::InvalidRegion {
            region: s.to_string(),
            reason: reason.to_string(),
        };
        // Names may contain ':', so only a parsable suffix counts as a range
        let Some((name, range)) = s.rsplit_once(':') else {
            return Ok(Region::whole(s));
        };
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => match (parse_coordinate(start), parse_coordinate(end)) {
                (Some(start), Some(end)) => (start, Some(end)),
                _ => return Ok(Region::whole(s)),
            },
            None => match parse_coordinate(range) {
                Some(start) => (start, None),
                None => return Ok(Region::whole(s)),
            },
        };
        if name.is_empty() {
            return Err(invalid("empty sequence name"));
        }
        if start == 0 {
            return Err(invalid("coordinates are 1-based"));
        }
        if end.is_some_and(|end| end < start) {
            return Err(invalid("end is before start"));
        }
        Ok(Region {
            name: name.to_string(),
            start: Some(start),
            end,
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(f, "{}:{}-{}", self.name, start, end),
            (Some(start), None) => write!(f, "{}:{}", self.name, start),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// Search `.fai` index lines and retrieve the matching sequences from the
/// accompanying FASTA file.
pub struct IndexedFasta<R> {
    fasta: R,
    fai_lines: Vec<String>,
}

impl<R: Read + Seek> IndexedFasta<R> {
    /// Wrap a FASTA handle and read its index lines.
    pub fn new<I: BufRead>(fasta: R, fai: I) -> Result<Self> {
        let mut fai_lines = Vec::new();
        for line in fai.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                fai_lines.push(line);
            }
        }
        Ok(IndexedFasta { fasta, fai_lines })
    }

    /// Wrap a FASTA handle with an index built in memory.
    pub fn from_records(fasta: R, records: &[FaiRecord]) -> Self {
        IndexedFasta {
            fasta,
            fai_lines: records.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Index lines containing `search_str` anywhere, unparsed.
    ///
    /// This is a plain substring match over the whole line: searching for
    /// `chr1` also returns `chr10`.
    pub fn grep_fai(&self, search_str: &str) -> Vec<&str> {
        self.fai_lines
            .iter()
            .filter(|line| line.contains(search_str))
            .map(String::as_str)
            .collect()
    }

    /// Parse one raw index line.
    pub fn parse_fai_line(fai_line: &str) -> Result<FaiRecord> {
        fai_line.trim().parse()
    }

    /// Parse every index line returned by [`grep_fai`](Self::grep_fai).
    pub fn get_fai_info(&self, search_str: &str) -> Result<Vec<FaiRecord>> {
        self.grep_fai(search_str)
            .into_iter()
            .map(Self::parse_fai_line)
            .collect()
    }

    /// All records of the index, in file order.
    pub fn records(&self) -> Result<Vec<FaiRecord>> {
        self.fai_lines
            .iter()
            .map(|line| Self::parse_fai_line(line))
            .collect()
    }

    /// The record whose name is exactly `name`.
    pub fn find(&self, name: &str) -> Result<FaiRecord> {
        for line in &self.fai_lines {
            if line.split('\t').next() == Some(name) {
                return Self::parse_fai_line(line);
            }
        }
        Err(AccessoryError::SequenceNotFound(name.to_string()))
    }

    /// The full sequence described by a parsed index record.
    pub fn get_seq(&mut self, fai_info: &FaiRecord) -> Result<String> {
        self.get_subseq(fai_info, 0, fai_info.length)
    }

    /// Bases `start..end` (0-based, half-open) of the sequence described by
    /// `fai_info`. Only the lines covering the slice are read.
    pub fn get_subseq(&mut self, fai_info: &FaiRecord, start: u64, end: u64) -> Result<String> {
        if start > end || end > fai_info.length {
            return Err(AccessoryError::InvalidRegion {
                region: format!("{}:{}-{}", fai_info.name, start, end),
                reason: format!("outside of sequence of length {}", fai_info.length),
            });
        }
        let wanted = (end - start) as usize;
        if wanted == 0 {
            return Ok(String::new());
        }

        let first = fai_info.byte_offset(start);
        // Bytes up to and including the last wanted base
        let span = fai_info.byte_offset(end - 1) + 1 - first;
        self.fasta.seek(SeekFrom::Start(first))?;
        let mut raw = Vec::with_capacity(span as usize);
        (&mut self.fasta).take(span).read_to_end(&mut raw)?;

        let seq: Vec<u8> = raw
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        if seq.len() != wanted {
            return Err(AccessoryError::MalformedFasta {
                message: format!(
                    "expected {} bases for {} at offset {}, found {}",
                    wanted,
                    fai_info.name,
                    first,
                    seq.len()
                ),
            });
        }
        String::from_utf8(seq).map_err(|e| AccessoryError::MalformedFasta {
            message: format!("sequence {} is not valid UTF-8: {}", fai_info.name, e),
        })
    }

    /// The bases covered by a region, looked up by exact sequence name.
    ///
    /// An end past the sequence is clamped to its length.
    pub fn fetch(&mut self, region: &Region) -> Result<String> {
        let record = self.find(&region.name)?;
        let start = region.start.unwrap_or(1) - 1;
        let end = region.end.unwrap_or(record.length).min(record.length);
        if start >= record.length && record.length > 0 {
            return Err(AccessoryError::InvalidRegion {
                region: region.to_string(),
                reason: format!("start is past the end of {} ({} bp)", record.name, record.length),
            });
        }
        log::debug!("Fetching {} ({}..{})", region, start, end);
        self.get_subseq(&record, start, end)
    }

    /// Lazily yield `(name, sequence)` for every index line matching
    /// `search_str`.
    pub fn iter_all_seq(&mut self, search_str: &str) -> SeqIter<'_, R> {
        let lines = self
            .grep_fai(search_str)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        SeqIter {
            fasta: self,
            lines: lines.into_iter(),
        }
    }
}

impl IndexedFasta<BufReader<File>> {
    /// Open `path` together with `<path>.fai`. When the index file does not
    /// exist, the index is built in memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let fai_path = index_path(path);
        let fasta = BufReader::new(File::open(path)?);
        if fai_path.exists() {
            log::debug!("Loading index {}", fai_path.display());
            Self::new(fasta, BufReader::new(File::open(&fai_path)?))
        } else {
            log::info!(
                "No index found at {}, building it in memory",
                fai_path.display()
            );
            let records = build_fai(BufReader::new(File::open(path)?))?;
            Ok(Self::from_records(fasta, &records))
        }
    }
}

/// Iterator returned by [`IndexedFasta::iter_all_seq`]
pub struct SeqIter<'a, R> {
    fasta: &'a mut IndexedFasta<R>,
    lines: std::vec::IntoIter<String>,
}

impl<R: Read + Seek> Iterator for SeqIter<'_, R> {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(
            IndexedFasta::<R>::parse_fai_line(&line)
                .and_then(|info| self.fasta.get_seq(&info).map(|seq| (info.name, seq))),
        )
    }
}

/// `<path>.fai`
pub fn index_path(path: &Path) -> PathBuf {
    let mut fai: OsString = path.as_os_str().to_owned();
    fai.push(".fai");
    PathBuf::from(fai)
}

struct RecordBuilder {
    record: FaiRecord,
    // A line shorter than line_bases (or a blank line) was seen
    closed: bool,
}

impl RecordBuilder {
    fn add_line(&mut self, bases: u64, width: u64) -> Result<()> {
        if bases == 0 {
            self.closed = true;
            return Ok(());
        }
        let record = &mut self.record;
        if record.line_bases == 0 {
            record.line_bases = bases;
            record.line_width = width;
        } else if self.closed || bases > record.line_bases {
            return Err(AccessoryError::MalformedFasta {
                message: format!("different line length in sequence {}", record.name),
            });
        } else if bases < record.line_bases || width != record.line_width {
            self.closed = true;
        }
        record.length += bases;
        Ok(())
    }
}

/// Scan a FASTA file and build its `.fai` records.
///
/// Every sequence line except the last must hold the same number of bases.
/// Both `\n` and `\r\n` terminators are accepted.
pub fn build_fai<R: BufRead>(mut reader: R) -> Result<Vec<FaiRecord>> {
    let mut records = Vec::new();
    let mut current: Option<RecordBuilder> = None;
    let mut pos: u64 = 0;
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            break;
        }
        pos += n as u64;
        let content = line
            .strip_suffix(b"\n")
            .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
            .unwrap_or(&line[..]);

        if let Some(header) = content.strip_prefix(b">") {
            if let Some(done) = current.take() {
                records.push(done.record);
            }
            let header = String::from_utf8_lossy(header);
            let name = header.split_whitespace().next().unwrap_or("");
            if name.is_empty() {
                return Err(AccessoryError::MalformedFasta {
                    message: format!("empty sequence name at byte {}", pos - n as u64),
                });
            }
            current = Some(RecordBuilder {
                record: FaiRecord {
                    name: name.to_string(),
                    length: 0,
                    offset: pos,
                    line_bases: 0,
                    line_width: 0,
                },
                closed: false,
            });
            continue;
        }

        match current.as_mut() {
            Some(builder) => builder.add_line(content.len() as u64, n as u64)?,
            None if content.iter().all(u8::is_ascii_whitespace) => {}
            None => {
                return Err(AccessoryError::MalformedFasta {
                    message: "sequence data before the first '>' header".to_string(),
                });
            }
        }
    }

    if let Some(done) = current {
        records.push(done.record);
    }
    log::debug!("Indexed {} sequences", records.len());
    Ok(records)
}

/// Write records in `.fai` format.
pub fn write_fai<W: Write>(records: &[FaiRecord], mut writer: W) -> Result<()> {
    for record in records {
        writeln!(writer, "{}", record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Build the index of the FASTA file at `path` and save it as `<path>.fai`.
pub fn build_fai_file(path: impl AsRef<Path>) -> Result<Vec<FaiRecord>> {
    let path = path.as_ref();
    let records = build_fai(BufReader::new(File::open(path)?))?;
    let fai_path = index_path(path);
    write_fai(&records, std::io::BufWriter::new(File::create(&fai_path)?))?;
    log::info!(
        "Wrote {} index records to {}",
        records.len(),
        fai_path.display()
    );
    Ok(records)
}
