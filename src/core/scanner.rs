//! Variant row scanning
//!
//! Turns the selected variant files into one flat sequence of rows. Every
//! physical line advances the global position index, including the lines
//! that are discarded because they carry no allele information.

use crate::core::decoder::DecoderCursor;
use crate::core::error::Result;
use crate::core::io::{LineIterator, DEFAULT_BUFFER_SIZE};
use crate::core::source::{ChromosomeFileSelector, InputSet, SelectedFile};
use memchr::memchr_iter;
use std::io::{BufReader, Read};

/// Column holding the major allele symbol
pub const MAJOR_FIELD: usize = 2;
/// Column holding the minor allele symbol
pub const MINOR_FIELD: usize = 3;
/// Column of the first genotype token
pub const FIRST_SAMPLE_FIELD: usize = 4;

/// One tab-separated variant line
///
/// Fields 0 and 1 are identifiers, 2 and 3 the major and minor allele,
/// and every field from 4 on is one sample's genotype token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRow {
    line: String,
    /// Field boundaries (start, end) for lazy access
    field_bounds: Vec<(usize, usize)>,
}

impl VariantRow {
    /// Split a line on tabs
    pub fn parse(line: impl Into<String>) -> Self {
        let line = line.into();
        let mut field_bounds = Vec::with_capacity(16);
        let mut start = 0;
        for tab in memchr_iter(b'\t', line.as_bytes()) {
            field_bounds.push((start, tab));
            start = tab + 1;
        }
        field_bounds.push((start, line.len()));
        Self { line, field_bounds }
    }

    pub fn field_count(&self) -> usize {
        self.field_bounds.len()
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.field_bounds
            .get(index)
            .map(|&(start, end)| &self.line[start..end])
    }

    pub fn major(&self) -> &str {
        self.field(MAJOR_FIELD).unwrap_or("")
    }

    pub fn minor(&self) -> &str {
        self.field(MINOR_FIELD).unwrap_or("")
    }

    /// Number of genotype tokens
    pub fn sample_count(&self) -> usize {
        self.field_count().saturating_sub(FIRST_SAMPLE_FIELD)
    }

    /// Genotype token of the sample at `offset`
    pub fn genotype(&self, offset: usize) -> Option<&str> {
        self.field(FIRST_SAMPLE_FIELD + offset)
    }

    /// Too few fields to carry both alleles
    pub fn is_degenerate(&self) -> bool {
        self.field_count() < FIRST_SAMPLE_FIELD
    }

    /// Major and minor alleles differ (ignoring case)
    pub fn is_informative(&self) -> bool {
        !self.major().eq_ignore_ascii_case(self.minor())
    }
}

struct OpenFile {
    name: String,
    lines: LineIterator<BufReader<Box<dyn Read + Send>>>,
    rows_read: u64,
}

impl OpenFile {
    fn new(selected: SelectedFile) -> Self {
        Self {
            name: selected.name,
            lines: LineIterator::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, selected.reader)),
            rows_read: 0,
        }
    }
}

/// Lazy, single-pass row sequence over every selected variant file
pub struct RowScanner<S: InputSet> {
    selector: ChromosomeFileSelector<S>,
    current: Option<OpenFile>,
    finished: bool,
}

impl<S: InputSet> RowScanner<S> {
    pub fn new(selector: ChromosomeFileSelector<S>) -> Self {
        Self {
            selector,
            current: None,
            finished: false,
        }
    }

    /// Next informative row, `Ok(None)` once all files are consumed
    ///
    /// Positions `cursor` for every physical line read: a new file moves the
    /// position index to just before the file's start offset, and each line
    /// advances it by one and clears the per-row state.
    pub fn next_row(&mut self, cursor: &mut DecoderCursor) -> Result<Option<VariantRow>> {
        loop {
            if self.finished {
                return Ok(None);
            }

            let Some(file) = self.current.as_mut() else {
                match self.selector.next_file() {
                    Ok(Some(selected)) => {
                        cursor.start_file(selected.start_offset);
                        self.current = Some(OpenFile::new(selected));
                    }
                    Ok(None) => self.finished = true,
                    Err(e) => {
                        self.close();
                        return Err(e);
                    }
                }
                continue;
            };

            let next = file.lines.next_line().map(|r| r.map(str::to_owned));
            let line = match next {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.close();
                    return Err(e.into());
                }
                None => {
                    self.close_current();
                    continue;
                }
            };
            file.rows_read += 1;
            cursor.start_row();

            let row = VariantRow::parse(line);
            if row.is_degenerate() {
                log::warn!(
                    "Discarding row {} of {}: expected at least {} fields, found {}",
                    file.rows_read,
                    file.name,
                    FIRST_SAMPLE_FIELD,
                    row.field_count()
                );
                continue;
            }
            if !row.is_informative() {
                continue;
            }
            return Ok(Some(row));
        }
    }

    fn close_current(&mut self) {
        if let Some(file) = self.current.take() {
            log::debug!("Closed {} after {} rows", file.name, file.rows_read);
        }
    }

    /// Release the open file and end the sequence; safe to call repeatedly
    pub fn close(&mut self) {
        self.close_current();
        self.finished = true;
    }

    /// A file is currently open
    pub fn has_open_file(&self) -> bool {
        self.current.is_some()
    }
}
