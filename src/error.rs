use thiserror::Error;

/// Errors raised by the accessory modules.
#[derive(Error, Debug)]
pub enum AccessoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("alignment is inconsistent: {read_seq},{cigar},{md_tag} ({reason})")]
    InconsistentAlignment {
        read_seq: String,
        cigar: String,
        md_tag: String,
        reason: String,
    },

    #[error("length of edit distance arrays by cigar ({by_cigar}) and md ({by_md}) do not match")]
    EditRangeMismatch { by_cigar: usize, by_md: usize },

    #[error("skip mode not known: {0}")]
    UnknownSkipMode(String),

    #[error("malformed fai line: {line:?} ({reason})")]
    MalformedFaiLine { line: String, reason: String },

    #[error("malformed FASTA: {message}")]
    MalformedFasta { message: String },

    #[error("sequence not found in index: {0}")]
    SequenceNotFound(String),

    #[error("malformed SAM line {line_no}: {reason}")]
    MalformedSamLine { line_no: usize, reason: String },

    #[error("invalid region {region:?}: {reason}")]
    InvalidRegion { region: String, reason: String },

    #[error("max_len has to be > 1, got {0}")]
    InvalidMaxLen(usize),

    #[error("'{0}' can't be colorized")]
    InvalidColor(String),

    #[error("unknown option value {value:?} for {option}")]
    UnknownOption { option: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, AccessoryError>;
