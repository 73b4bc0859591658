//! Output rows
//!
//! Wraps each decoded value with its sample and position index into a row
//! of the declared three-column schema.

use crate::core::config::{DecodeMode, DecoderConfig};
use crate::core::decoder::{Decoded, FanoutEngine};
use crate::core::error::{FormatError, Result};
use crate::core::source::InputSet;

/// Sample index of a whole-row aggregate
pub const AGGREGATE_SAMPLE_IDX: i64 = -1;

/// Declared column type of the output sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
}

/// Column declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
}

/// Output schema: sample_idx BIGINT, pos_idx BIGINT, val DOUBLE
pub const OUTPUT_SCHEMA: [Column; 3] = [
    Column { name: "sample_idx", column_type: ColumnType::BigInt },
    Column { name: "pos_idx", column_type: ColumnType::BigInt },
    Column { name: "val", column_type: ColumnType::Double },
];

/// One long-format output row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRow {
    pub sample_idx: i64,
    pub pos_idx: i64,
    pub value: f64,
}

impl OutputRow {
    /// Row carries a variant-level statistic rather than a sample value
    pub fn is_aggregate(&self) -> bool {
        self.sample_idx == AGGREGATE_SAMPLE_IDX
    }
}

/// Record emitter: the pull interface the host drives
///
/// # Example
///
/// ```
/// use ibs_extract::core::{DecodeMode, DecoderConfig, MemoryInputSet, OffsetTable, RecordEmitter};
///
/// let config = DecoderConfig::new(OffsetTable::from_counts(&[1; 22]).unwrap(), DecodeMode::Raw);
/// let inputs = MemoryInputSet::new().with("chr2.af", "x\ty\tA\tT\t0\tN\t1\n");
/// let rows: Vec<_> = RecordEmitter::new(inputs, config).collect::<Result<_, _>>().unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!((rows[1].sample_idx, rows[1].pos_idx, rows[1].value), (2, 1, 1.0));
/// ```
pub struct RecordEmitter<S: InputSet> {
    engine: FanoutEngine<S>,
}

impl<S: InputSet> RecordEmitter<S> {
    pub fn new(inputs: S, config: DecoderConfig) -> Self {
        Self {
            engine: FanoutEngine::new(inputs, config),
        }
    }

    /// Declared output columns
    pub fn schema(&self) -> &'static [Column] {
        &OUTPUT_SCHEMA
    }

    pub fn mode(&self) -> DecodeMode {
        self.engine.mode()
    }

    /// Next output row, `Ok(None)` when no rows remain
    ///
    /// A value that does not parse as a number is reported as a
    /// [`FormatError`]; the session stays positioned after it.
    pub fn next_row(&mut self) -> Result<Option<OutputRow>> {
        let Some(decoded) = self.engine.next_value()? else {
            return Ok(None);
        };

        let cursor = self.engine.cursor();
        let sample_idx = cursor.sample_offset();
        let pos_idx = cursor.position_index();

        let value = match decoded {
            Decoded::Frequency(f) => f,
            Decoded::Sample(token) => {
                token
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| FormatError::InvalidValue {
                        value: token.clone(),
                        sample_idx,
                        pos_idx,
                    })?
            }
        };

        Ok(Some(OutputRow {
            sample_idx,
            pos_idx,
            value,
        }))
    }

    /// Close any open file handle; idempotent
    pub fn close(&mut self) {
        self.engine.close();
    }
}

impl<S: InputSet> Iterator for RecordEmitter<S> {
    type Item = Result<OutputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
