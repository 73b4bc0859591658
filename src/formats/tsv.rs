//! TSV output sink
//!
//! Writes emitted rows as `sample_idx<TAB>pos_idx<TAB>val` lines under a
//! header naming the declared columns.

use crate::core::{InputSet, RecordEmitter, Result};
use std::io::{BufWriter, Write};

/// Extraction statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractStats {
    pub total: usize,
    /// Rows tied to one sample
    pub samples: usize,
    /// Variant-level frequency rows (coverage mode)
    pub aggregates: usize,
}

/// Drain an emitter into `output`
///
/// The emitter is closed on every exit path.
pub fn write_tsv<S: InputSet, W: Write>(
    emitter: &mut RecordEmitter<S>,
    output: W,
) -> Result<ExtractStats> {
    let result = write_rows(emitter, output);
    emitter.close();
    result
}

fn write_rows<S: InputSet, W: Write>(
    emitter: &mut RecordEmitter<S>,
    output: W,
) -> Result<ExtractStats> {
    // Use BufWriter to avoid per-line syscalls
    let mut out = BufWriter::with_capacity(128 * 1024, output);
    let mut stats = ExtractStats::default();

    let header: Vec<&str> = emitter.schema().iter().map(|c| c.name).collect();
    writeln!(out, "{}", header.join("\t"))?;

    while let Some(row) = emitter.next_row()? {
        writeln!(out, "{}\t{}\t{}", row.sample_idx, row.pos_idx, row.value)?;
        stats.total += 1;
        if row.is_aggregate() {
            stats.aggregates += 1;
        } else {
            stats.samples += 1;
        }
    }

    out.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DecodeMode, DecoderConfig, ExtractError, MemoryInputSet, OffsetTable};

    fn config(mode: DecodeMode) -> DecoderConfig {
        let mut counts = [0u64; 22];
        counts[0] = 1;
        DecoderConfig::new(OffsetTable::from_counts(&counts).unwrap(), mode)
    }

    #[test]
    fn test_write_coverage_tsv() {
        let inputs = MemoryInputSet::new()
            .with("chr1.af", "x\ty\tA\tT\tA\tT\n")
            .with("chr2.af", "x\ty\tC\tG\tG\tN\tG\n");
        let mut emitter = RecordEmitter::new(inputs, config(DecodeMode::Coverage));

        let mut buf = Vec::new();
        let stats = write_tsv(&mut emitter, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "sample_idx\tpos_idx\tval\n\
             0\t0\t0\n1\t0\t1\n-1\t0\t0.5\n\
             0\t1\t1\n2\t1\t1\n-1\t1\t1\n"
        );
        assert_eq!(stats, ExtractStats { total: 6, samples: 4, aggregates: 2 });
    }

    #[test]
    fn test_write_stops_on_format_error() {
        let inputs = MemoryInputSet::new().with("chr1.af", "x\ty\tA\tT\t1\tbad\t0\n");
        let mut emitter = RecordEmitter::new(inputs, config(DecodeMode::Raw));

        let mut buf = Vec::new();
        let err = write_tsv(&mut emitter, &mut buf).unwrap_err();
        assert!(matches!(err, ExtractError::Format(_)));
        assert!(emitter.next_row().unwrap().is_none());
    }
}
