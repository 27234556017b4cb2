//! Error types for FastVcf
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for FastVcf operations
#[derive(Debug, Error)]
pub enum VcfError {
    /// Header scanning errors
    #[error("Header error: {0}")]
    Header(#[from] HeaderError),

    /// Record parsing errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Slot buffer errors
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while scanning the VCF header
#[derive(Debug, Error)]
pub enum HeaderError {
    /// End of input reached before the #CHROM column-header line
    #[error("No #CHROM column-header line found before end of input")]
    MissingColumnHeader,

    /// The column-header line is missing fixed columns
    #[error("Column-header line has {found} columns, expected at least 8")]
    TruncatedColumnHeader { found: usize },

    /// I/O error during header scanning
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while parsing a single record line
#[derive(Debug, Error)]
pub enum RecordError {
    /// Fewer than the 8 fixed tab-delimited fields are present
    #[error("Line {line}: found {found} fields, expected at least 8")]
    FieldCount { line: u64, found: usize },

    /// POS is not a positive integer
    #[error("Line {line}: invalid POS value '{value}'")]
    InvalidPosition { line: u64, value: String },

    /// A fixed field contains invalid UTF-8
    #[error("Line {line}: invalid UTF-8 in {field} field")]
    InvalidUtf8 { line: u64, field: &'static str },

    /// Genotype decoding failed
    #[error("Line {line}: {source}")]
    Genotype {
        line: u64,
        #[source]
        source: GenotypeError,
    },
}

/// Errors that can occur while decoding the genotype section of a record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenotypeError {
    /// FORMAT is present but its first subfield is not GT
    #[error("FORMAT does not start with the GT subfield")]
    GtNotFirst,

    /// Sample token count does not match the declared sample count
    #[error("Found {found} sample fields, expected {expected}")]
    SampleCount { expected: usize, found: usize },

    /// Allele token is empty or not a decimal number
    #[error("Invalid allele token '{token}'")]
    InvalidAllele { token: String },

    /// Allele index too large for the compact representation
    #[error("Allele index {value} exceeds the supported maximum of 254")]
    AlleleOverflow { value: u64 },
}

/// Errors that can occur in the slot buffer pool
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Capacity arithmetic overflowed while growing a slot
    #[error("Slot capacity overflow while growing to hold {required} bytes")]
    CapacityOverflow { required: usize },
}

/// Result type alias for FastVcf operations
pub type Result<T> = std::result::Result<T, VcfError>;

/// Result type alias for genotype decoding
pub type GenotypeResult<T> = std::result::Result<T, GenotypeError>;
