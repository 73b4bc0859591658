//! Input sources and chromosome file selection
//!
//! The host supplies an ordered set of named byte streams. Only variant
//! files (suffix `.af`) are decoded; every other candidate is skipped.

use crate::core::error::{ConfigError, ExtractError, Result};
use crate::core::io::open_decompressed;
use crate::core::offsets::OffsetTable;
use std::collections::VecDeque;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;

/// File name suffix of variant files
pub const VARIANT_FILE_SUFFIX: &str = ".af";

/// Derive the chromosome label from a file name
///
/// Takes the last path segment, splits it on '.', and returns the first
/// token beginning with "chr".
///
/// # Examples
/// ```
/// use ibs_extract::core::chrom_label;
/// assert_eq!(chrom_label("oss://bucket/mat/chr7.merge.mat.af"), Some("chr7"));
/// assert_eq!(chrom_label("sample.chrX.af"), Some("chrX"));
/// assert_eq!(chrom_label("merged.af"), None);
/// ```
pub fn chrom_label(file_name: &str) -> Option<&str> {
    let segment = file_name.rsplit('/').next().unwrap_or(file_name);
    segment.split('.').find(|token| token.starts_with("chr"))
}

/// A named, readable byte stream handed over by the host
pub struct NamedSource {
    pub name: String,
    pub reader: Box<dyn Read + Send>,
}

impl NamedSource {
    pub fn new(name: impl Into<String>, reader: Box<dyn Read + Send>) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    /// Source backed by an in-memory buffer
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Box::new(Cursor::new(data.into())))
    }
}

impl std::fmt::Debug for NamedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedSource").field("name", &self.name).finish()
    }
}

/// Ordered multi-file input supplied by the host
pub trait InputSet {
    /// Next candidate source, `None` once the set is exhausted
    fn next_source(&mut self) -> io::Result<Option<NamedSource>>;
}

/// Input set over local files, opened lazily with transparent decompression
#[derive(Debug, Default)]
pub struct PathInputSet {
    paths: VecDeque<PathBuf>,
}

impl PathInputSet {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl InputSet for PathInputSet {
    fn next_source(&mut self) -> io::Result<Option<NamedSource>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let name = path.to_string_lossy().into_owned();
        // Skipped candidates are never opened
        if !name.ends_with(VARIANT_FILE_SUFFIX) {
            return Ok(Some(NamedSource::from_bytes(name, Vec::new())));
        }
        let reader = open_decompressed(&path)?;
        Ok(Some(NamedSource::new(name, reader)))
    }
}

/// Input set over in-memory sources
#[derive(Debug, Default)]
pub struct MemoryInputSet {
    sources: VecDeque<NamedSource>,
}

impl MemoryInputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source holding `data`
    pub fn push(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.sources.push_back(NamedSource::from_bytes(name, data));
    }

    /// Builder-style `push`
    pub fn with(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.push(name, data);
        self
    }
}

impl InputSet for MemoryInputSet {
    fn next_source(&mut self) -> io::Result<Option<NamedSource>> {
        Ok(self.sources.pop_front())
    }
}

/// A variant file positioned in the global index space
pub struct SelectedFile {
    pub name: String,
    pub chrom: String,
    /// Position index of the file's first row
    pub start_offset: u64,
    pub reader: Box<dyn Read + Send>,
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("chrom", &self.chrom)
            .field("start_offset", &self.start_offset)
            .finish_non_exhaustive()
    }
}

/// Picks variant files out of an input set and resolves their start offsets
pub struct ChromosomeFileSelector<S: InputSet> {
    inputs: S,
    offsets: OffsetTable,
}

impl<S: InputSet> ChromosomeFileSelector<S> {
    pub fn new(inputs: S, offsets: OffsetTable) -> Self {
        Self { inputs, offsets }
    }

    /// Next variant file, `Ok(None)` when the input set is exhausted
    pub fn next_file(&mut self) -> Result<Option<SelectedFile>> {
        loop {
            let Some(source) = self.inputs.next_source()? else {
                return Ok(None);
            };

            if !source.name.ends_with(VARIANT_FILE_SUFFIX) {
                log::debug!("Skipping non-variant file: {}", source.name);
                continue;
            }

            let chrom = chrom_label(&source.name)
                .ok_or_else(|| ConfigError::MissingChromLabel(source.name.clone()))?
                .to_string();

            let start_offset = self.offsets.offset(&chrom).ok_or_else(|| {
                ExtractError::from(ConfigError::UnknownChromosome {
                    chrom: chrom.clone(),
                    file: source.name.clone(),
                })
            })?;

            log::info!(
                "Selected variant file {} (chromosome {}, start offset {})",
                source.name,
                chrom,
                start_offset
            );

            return Ok(Some(SelectedFile {
                name: source.name,
                chrom,
                start_offset,
                reader: source.reader,
            }));
        }
    }
}
