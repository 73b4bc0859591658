//! ibs-extract - Allele-frequency matrix decoding
//!
//! Decodes per-chromosome genotype files into a long-format stream of
//! `(sample_idx, pos_idx, val)` rows for columnar storage.
//!
//! # Features
//!
//! - Concatenates chr1..chr22 files into one increasing position index space
//! - Raw mode: one row per non-missing genotype token
//! - Coverage mode: allele indicators plus a per-variant minor allele frequency
//! - Transparent gzip/bzip2 input for local files
//!
//! # Example
//!
//! ```ignore
//! use ibs_extract::{DecoderConfig, PathInputSet, RecordEmitter};
//!
//! let attrs = [("line.count", manifest.as_str()), ("mode", "cov")];
//! let config = DecoderConfig::from_attributes(&attrs[..])?;
//!
//! let inputs = PathInputSet::new(["chr1.merge.af", "chr2.merge.af"]);
//! for row in RecordEmitter::new(inputs, config) {
//!     let row = row?;
//!     println!("{}\t{}\t{}", row.sample_idx, row.pos_idx, row.value);
//! }
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    ConfigError, DecodeMode, DecoderConfig, ExtractError, FormatError, InputSet,
    MemoryInputSet, OffsetTable, OutputRow, PathInputSet, RecordEmitter, Result,
};
pub use formats::{manifest, tsv};
