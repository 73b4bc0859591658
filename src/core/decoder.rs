//! Sample fan-out decoding
//!
//! The decoding state machine. Each variant row fans out into one value per
//! sample; in coverage mode a whole-row minor allele frequency follows the
//! last sample. The algorithm per call:
//! 1. Advance the sample offset
//! 2. Pull a new row when none is loaded or the offset was reset
//! 3. At end of row, reset the offset to -1 and emit the row aggregate
//!    (coverage mode) or move on (raw mode)
//! 4. Otherwise decode the genotype token at the offset; missing data is
//!    skipped ("N" in coverage mode, "N" or "n" in raw mode)

use crate::core::config::{DecodeMode, DecoderConfig};
use crate::core::error::Result;
use crate::core::scanner::{RowScanner, VariantRow};
use crate::core::source::{ChromosomeFileSelector, InputSet};

/// Genotype token marking missing data
pub const MISSING_TOKEN: &str = "N";

/// Sample offset meaning "fetch a new row next"
pub const NEED_ROW: i64 = -1;

/// Mutable scanning state of one decode session
#[derive(Debug, Clone)]
pub struct DecoderCursor {
    row: Option<VariantRow>,
    sample_offset: i64,
    position_index: i64,
    major_count: u64,
    minor_count: u64,
    end_of_stream: bool,
}

impl DecoderCursor {
    pub fn new() -> Self {
        Self {
            row: None,
            sample_offset: NEED_ROW,
            position_index: -1,
            major_count: 0,
            minor_count: 0,
            end_of_stream: false,
        }
    }

    /// Current sample offset, -1 right after a row was finished
    pub fn sample_offset(&self) -> i64 {
        self.sample_offset
    }

    /// Global position index of the current row
    pub fn position_index(&self) -> i64 {
        self.position_index
    }

    pub fn major_count(&self) -> u64 {
        self.major_count
    }

    pub fn minor_count(&self) -> u64 {
        self.minor_count
    }

    pub fn is_exhausted(&self) -> bool {
        self.end_of_stream
    }

    /// minor / (minor + major); NaN when no sample was classified
    pub fn minor_frequency(&self) -> f64 {
        self.minor_count as f64 / (self.minor_count + self.major_count) as f64
    }

    /// Position just before the first row of a new file
    ///
    /// Offsets come from an [`OffsetTable`](crate::core::OffsetTable) and stay
    /// within `i64` range.
    pub(crate) fn start_file(&mut self, start_offset: u64) {
        self.position_index = start_offset as i64 - 1;
    }

    /// Account for one physical row
    pub(crate) fn start_row(&mut self) {
        self.position_index += 1;
        self.sample_offset = 0;
        self.major_count = 0;
        self.minor_count = 0;
    }

    fn finish(&mut self) {
        self.row = None;
        self.end_of_stream = true;
    }
}

impl Default for DecoderCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// A value produced by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Per-sample value: a raw token or a "0"/"1" allele indicator
    Sample(String),
    /// Whole-row minor allele frequency (coverage mode)
    Frequency(f64),
}

/// Outcome of one step inside the current row
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Emit(Decoded),
    Skip,
}

/// Classify the token at the cursor's sample offset
fn step_row(cursor: &mut DecoderCursor, mode: DecodeMode) -> Step {
    let Some(row) = cursor.row.as_ref() else {
        return Step::Skip;
    };
    let offset = cursor.sample_offset as usize;

    if offset >= row.sample_count() {
        cursor.sample_offset = NEED_ROW;
        return match mode {
            DecodeMode::Coverage => Step::Emit(Decoded::Frequency(cursor.minor_frequency())),
            DecodeMode::Raw => Step::Skip,
        };
    }

    let token = row.genotype(offset).unwrap_or(MISSING_TOKEN);
    let missing = match mode {
        DecodeMode::Raw => token.eq_ignore_ascii_case(MISSING_TOKEN),
        DecodeMode::Coverage => token == MISSING_TOKEN,
    };
    if missing {
        return Step::Skip;
    }

    let value = match mode {
        DecodeMode::Raw => token.to_string(),
        DecodeMode::Coverage => {
            if token == row.major() {
                cursor.major_count += 1;
                "0".to_string()
            } else if token == row.minor() {
                cursor.minor_count += 1;
                "1".to_string()
            } else {
                // Third allele: counting restarts from this sample
                cursor.major_count = 1;
                cursor.minor_count = 1;
                token.to_string()
            }
        }
    };
    Step::Emit(Decoded::Sample(value))
}

/// Pulls rows from the scanner and yields one decoded value per call
pub struct FanoutEngine<S: InputSet> {
    scanner: RowScanner<S>,
    cursor: DecoderCursor,
    mode: DecodeMode,
}

impl<S: InputSet> FanoutEngine<S> {
    pub fn new(inputs: S, config: DecoderConfig) -> Self {
        let selector = ChromosomeFileSelector::new(inputs, config.offsets);
        Self {
            scanner: RowScanner::new(selector),
            cursor: DecoderCursor::new(),
            mode: config.mode,
        }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    pub fn cursor(&self) -> &DecoderCursor {
        &self.cursor
    }

    /// Next decoded value, `Ok(None)` at end of data
    pub fn next_value(&mut self) -> Result<Option<Decoded>> {
        if self.cursor.end_of_stream {
            return Ok(None);
        }
        loop {
            self.cursor.sample_offset += 1;

            if self.cursor.row.is_none() || self.cursor.sample_offset == 0 {
                match self.scanner.next_row(&mut self.cursor) {
                    Ok(Some(row)) => self.cursor.row = Some(row),
                    Ok(None) => {
                        self.cursor.finish();
                        return Ok(None);
                    }
                    Err(e) => {
                        self.close();
                        return Err(e);
                    }
                }
            }

            if let Step::Emit(value) = step_row(&mut self.cursor, self.mode) {
                return Ok(Some(value));
            }
        }
    }

    /// Release any open file; further calls yield end of data
    pub fn close(&mut self) {
        self.scanner.close();
        self.cursor.finish();
    }
}
