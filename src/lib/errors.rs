//! Custom error types for cadabra operations.

use thiserror::Error;

/// Result type alias for cadabra operations
pub type Result<T> = std::result::Result<T, CadabraError>;

/// Error type for cadabra operations
#[derive(Error, Debug)]
pub enum CadabraError {
    /// The assembled-contig tag on a read could not be parsed
    #[error("Malformed contig tag '{value}': {reason}")]
    MalformedContigTag {
        /// The raw tag value as found on the read
        value: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A CIGAR string could not be parsed
    #[error("Invalid CIGAR '{cigar}': {reason}")]
    InvalidCigar {
        /// The CIGAR text
        cigar: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A locus stream is not sorted by the chromosome order and position
    #[error("{sample} input is out of order: {current} follows {previous}")]
    OrderingViolation {
        /// Which input stream (e.g. "normal", "tumor")
        sample: String,
        /// The locus seen before
        previous: String,
        /// The offending locus
        current: String,
    },

    /// A chromosome is not present in the chromosome order table
    #[error("Chromosome '{name}' not found in the sequence dictionary")]
    UnknownChromosome {
        /// The chromosome name (or reference id when no name is known)
        name: String,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Error reading alignment records
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
