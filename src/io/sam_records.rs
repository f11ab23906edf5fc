// SAM text input
//
// Reads the mandatory columns and optional tags of plain-text SAM records.
// Only what the alignment accessories need is kept: name, flag, position,
// CIGAR, sequence and tags. Header lines are skipped.

use std::io::BufRead;
use std::str::FromStr;

use crate::error::{AccessoryError, Result};

pub mod sam_flags {
    pub const UNMAPPED: u16 = 0x4; // Segment unmapped
    pub const SECONDARY: u16 = 0x100; // Secondary alignment
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamRecord {
    pub query_name: String,
    pub flag: u16,
    pub ref_name: String,
    pub pos: u64, // 1-based leftmost position, 0 when unmapped
    pub cigar: String,
    pub seq: String,
    pub tags: Vec<(String, String)>, // ("MD", "Z:10A5")
}

impl SamRecord {
    pub fn is_unmapped(&self) -> bool {
        self.flag & sam_flags::UNMAPPED != 0
    }

    pub fn is_secondary(&self) -> bool {
        self.flag & sam_flags::SECONDARY != 0
    }

    /// Value of an optional tag without its type prefix.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .and_then(|(_, value)| value.split_once(':').map(|(_, v)| v))
    }

    pub fn md_tag(&self) -> Option<&str> {
        self.tag("MD")
    }

    pub fn has_cigar(&self) -> bool {
        self.cigar != "*" && !self.cigar.is_empty()
    }
}

impl FromStr for SamRecord {
    type Err = AccessoryError;

    /// Parses one record line; errors carry line number 0.
    fn from_str(line: &str) -> Result<Self> {
        parse_record(line, 0)
    }
}

fn parse_record(line: &str, line_no: usize) -> Result<SamRecord> {
    let malformed = |reason: String| AccessoryError::MalformedSamLine { line_no, reason };

    let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
    if fields.len() < 11 {
        return Err(malformed(format!(
            "expected at least 11 columns, found {}",
            fields.len()
        )));
    }
    let flag = fields[1]
        .parse::<u16>()
        .map_err(|e| malformed(format!("FLAG {:?}: {}", fields[1], e)))?;
    let pos = fields[3]
        .parse::<u64>()
        .map_err(|e| malformed(format!("POS {:?}: {}", fields[3], e)))?;

    let mut tags = Vec::with_capacity(fields.len() - 11);
    for field in &fields[11..] {
        match field.split_once(':') {
            Some((tag, value)) if tag.len() == 2 => tags.push((tag.to_string(), value.to_string())),
            _ => return Err(malformed(format!("optional field {:?}", field))),
        }
    }

    Ok(SamRecord {
        query_name: fields[0].to_string(),
        flag,
        ref_name: fields[2].to_string(),
        pos,
        cigar: fields[5].to_string(),
        seq: fields[9].to_string(),
        tags,
    })
}

/// Iterator over the records of a SAM stream.
pub struct SamReader<R: BufRead> {
    reader: R,
    line: String,
    line_no: usize,
}

impl<R: BufRead> SamReader<R> {
    pub fn new(reader: R) -> Self {
        SamReader {
            reader,
            line: String::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for SamReader<R> {
    type Item = Result<SamRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            if self.line.starts_with('@') || self.line.trim().is_empty() {
                continue;
            }
            return Some(parse_record(&self.line, self.line_no));
        }
    }
}
