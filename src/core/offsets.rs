//! Chromosome start offsets
//!
//! Builds the chromosome → first position index mapping from a line-count
//! manifest. Chromosomes chr1..chr22 occupy disjoint, consecutive ranges of
//! the global position index space, in numeric order.
//!
//! # Manifest Format
//!
//! ```text
//! chr1.merge.mat.tsv.gz 1204
//! chr2.merge.mat.tsv.gz 1311
//! ...
//! chr22.merge.mat.tsv.gz 188
//! ```

use crate::core::error::{ConfigError, ConfigResult};
use crate::core::source::chrom_label;

/// Number of autosomes covered by the table
pub const AUTOSOME_COUNT: usize = 22;

/// Largest row total representable as a BIGINT position index
const MAX_POSITION: u64 = i64::MAX as u64;

/// Map a canonical autosome label ("chr1".."chr22") to its number
pub fn autosome_number(label: &str) -> Option<usize> {
    let digits = label.strip_prefix("chr")?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = digits.parse().ok()?;
    (1..=AUTOSOME_COUNT).contains(&n).then_some(n)
}

/// Immutable chromosome → start offset mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    offsets: [u64; AUTOSOME_COUNT],
    total: u64,
}

impl OffsetTable {
    /// Build the table from per-chromosome line counts, `counts[0]` being chr1
    ///
    /// The total must fit a signed 64-bit position index.
    pub fn from_counts(counts: &[u64; AUTOSOME_COUNT]) -> ConfigResult<Self> {
        let mut offsets = [0u64; AUTOSOME_COUNT];
        let mut running = 0u64;
        for (n, (offset, count)) in offsets.iter_mut().zip(counts).enumerate() {
            *offset = running;
            running = running
                .checked_add(*count)
                .filter(|&total| total <= MAX_POSITION)
                .ok_or_else(|| ConfigError::CountOverflow(format!("chr{}", n + 1)))?;
        }
        Ok(Self { offsets, total: running })
    }

    /// Parse a newline-separated "<key> <count>" manifest
    pub fn parse_manifest(manifest: &str) -> ConfigResult<Self> {
        let mut counts: [Option<u64>; AUTOSOME_COUNT] = [None; AUTOSOME_COUNT];

        for (idx, raw) in manifest.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 2 {
                return Err(ConfigError::MalformedEntry {
                    line: line_number,
                    content: line.chars().take(100).collect(),
                });
            }

            let count: u64 = fields[1].parse().map_err(|_| ConfigError::InvalidCount {
                line: line_number,
                value: fields[1].to_string(),
            })?;

            // Entries for other contigs (chrX, chrM, ...) are tolerated
            let Some(n) = chrom_label(fields[0]).and_then(autosome_number) else {
                continue;
            };

            let slot = &mut counts[n - 1];
            if slot.is_some() {
                return Err(ConfigError::DuplicateEntry {
                    line: line_number,
                    chrom: format!("chr{}", n),
                });
            }
            *slot = Some(count);
        }

        let mut resolved = [0u64; AUTOSOME_COUNT];
        for (n, (dst, src)) in resolved.iter_mut().zip(counts.iter()).enumerate() {
            *dst = src.ok_or_else(|| ConfigError::MissingChromosome(format!("chr{}", n + 1)))?;
        }

        Self::from_counts(&resolved)
    }

    /// Start offset of a chromosome, `None` for labels outside chr1..chr22
    pub fn offset(&self, chrom: &str) -> Option<u64> {
        autosome_number(chrom).map(|n| self.offsets[n - 1])
    }

    /// Total number of rows across all chromosomes
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterate (label, offset) pairs in chromosome order
    pub fn iter(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| (format!("chr{}", i + 1), offset))
    }
}
