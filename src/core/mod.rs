//! Core decoding functionality
//!
//! This module contains the offset table, chromosome file selection,
//! row scanning, and the sample fan-out state machine.

pub mod config;
pub mod decoder;
pub mod emitter;
mod error;
pub mod io;
pub mod offsets;
pub mod scanner;
pub mod source;

pub use config::{Attributes, DecodeMode, DecoderConfig, LINE_COUNT_KEY, MODE_KEY};
pub use decoder::{Decoded, DecoderCursor, FanoutEngine};
pub use emitter::{Column, ColumnType, OutputRow, RecordEmitter, AGGREGATE_SAMPLE_IDX, OUTPUT_SCHEMA};
pub use error::{ConfigError, ConfigResult, ExtractError, FormatError, Result};
pub use io::{detect_compression, open_decompressed, CompressionFormat, LineIterator, DEFAULT_BUFFER_SIZE};
pub use offsets::{autosome_number, OffsetTable, AUTOSOME_COUNT};
pub use scanner::{RowScanner, VariantRow};
pub use source::{
    chrom_label, ChromosomeFileSelector, InputSet, MemoryInputSet, NamedSource, PathInputSet,
    SelectedFile, VARIANT_FILE_SUFFIX,
};
