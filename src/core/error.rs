//! Error types for ibs-extract
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for extraction sessions
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Configuration errors (fatal, abort the session)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A decoded value does not fit the declared output type
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// I/O errors from the underlying byte source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building the session configuration or positioning a file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration key was not supplied
    #[error("Missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    /// Manifest entry is not of the form "<key> <count>"
    #[error("Malformed line count entry at line {line}: '{content}'")]
    MalformedEntry { line: usize, content: String },

    /// Manifest count is not a non-negative integer
    #[error("Invalid line count '{value}' at line {line}: expected a non-negative integer")]
    InvalidCount { line: usize, value: String },

    /// Same chromosome listed twice in the manifest
    #[error("Duplicate line count entry for {chrom} at line {line}")]
    DuplicateEntry { line: usize, chrom: String },

    /// Manifest lacks one of chr1..chr22
    #[error("Line count manifest has no entry for {0}")]
    MissingChromosome(String),

    /// Line counts sum past the largest position index
    #[error("Line counts overflow the position index at {0}")]
    CountOverflow(String),

    /// Selected file name carries no chr-prefixed token
    #[error("No chromosome name found in file name '{0}'")]
    MissingChromLabel(String),

    /// Selected file's chromosome has no offset
    #[error("Chromosome {chrom} of file '{file}' has no start offset")]
    UnknownChromosome { chrom: String, file: String },
}

/// Errors raised while building an output row
#[derive(Debug, Error)]
pub enum FormatError {
    /// Value cannot be parsed as a floating-point number
    #[error("Value '{value}' of sample {sample_idx} at position {pos_idx} is not a number")]
    InvalidValue {
        value: String,
        sample_idx: i64,
        pos_idx: i64,
    },
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
