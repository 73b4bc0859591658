//! Line-count manifest generation
//!
//! Counts the rows of each per-chromosome matrix and writes the
//! `"<file name> <count>"` manifest consumed by the offset table.

use crate::core::io::{open_decompressed, DEFAULT_BUFFER_SIZE};
use crate::core::{autosome_number, chrom_label};
use memchr::memchr_iter;
use rayon::prelude::*;
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// One manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub key: String,
    pub count: u64,
}

impl ManifestEntry {
    /// Autosome number of the entry's key, if any
    fn chrom_number(&self) -> Option<usize> {
        chrom_label(&self.key).and_then(autosome_number)
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.count)
    }
}

/// Count physical lines; a final line without a newline still counts
pub fn count_lines<R: Read>(mut reader: R) -> io::Result<u64> {
    let mut buf = vec![0u8; DEFAULT_BUFFER_SIZE];
    let mut lines = 0u64;
    let mut last = None;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        lines += memchr_iter(b'\n', &buf[..n]).count() as u64;
        last = Some(buf[n - 1]);
    }
    if matches!(last, Some(b) if b != b'\n') {
        lines += 1;
    }
    Ok(lines)
}

/// Count one file, keyed by its file name
pub fn count_file(path: &Path) -> io::Result<ManifestEntry> {
    let key = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let count = count_lines(open_decompressed(path)?)?;
    log::debug!("Counted {} lines in {}", count, path.display());
    Ok(ManifestEntry { key, count })
}

/// Count every file in parallel, ordered by chromosome number
pub fn build_manifest(paths: &[PathBuf], threads: usize) -> io::Result<Vec<ManifestEntry>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to create thread pool: {}", e)
        ))?;

    let mut entries = pool.install(|| {
        paths
            .par_iter()
            .map(|p| count_file(p))
            .collect::<io::Result<Vec<_>>>()
    })?;

    // Autosomes first in numeric order, everything else by name
    entries.sort_by(|a, b| {
        let key = |e: &ManifestEntry| (e.chrom_number().unwrap_or(usize::MAX), e.key.clone());
        key(a).cmp(&key(b))
    });
    Ok(entries)
}

/// Write entries one per line
pub fn write_manifest<W: Write>(entries: &[ManifestEntry], mut out: W) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{}", entry)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OffsetTable;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::tempdir;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(&b""[..]).unwrap(), 0);
        assert_eq!(count_lines(&b"a"[..]).unwrap(), 1);
        assert_eq!(count_lines(&b"a\n"[..]).unwrap(), 1);
        assert_eq!(count_lines(&b"a\nb"[..]).unwrap(), 2);
        assert_eq!(count_lines(&b"\n\n\n"[..]).unwrap(), 3);
    }

    #[test]
    fn test_manifest_round_trips_through_offset_table() -> io::Result<()> {
        let dir = tempdir()?;
        let mut paths = Vec::new();
        for n in (1..=22).rev() {
            let path = dir.path().join(format!("chr{}.merge.mat.tsv.gz", n));
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            for i in 0..n {
                writeln!(encoder, "rs{}\t{}\tA\tT\t0\t1", i, i)?;
            }
            std::fs::write(&path, encoder.finish()?)?;
            paths.push(path);
        }
        let extra = dir.path().join("samples.txt");
        std::fs::write(&extra, "s1\ns2\n")?;
        paths.push(extra);

        let entries = build_manifest(&paths, 4)?;
        assert_eq!(entries[0], ManifestEntry { key: "chr1.merge.mat.tsv.gz".into(), count: 1 });
        assert_eq!(entries[21].count, 22);
        assert_eq!(entries[22].key, "samples.txt");

        let mut text = Vec::new();
        write_manifest(&entries, &mut text)?;
        let table = OffsetTable::parse_manifest(&String::from_utf8(text).unwrap()).unwrap();
        // offset(chrN) = 1 + 2 + ... + (N - 1)
        assert_eq!(table.offset("chr5"), Some(10));
        assert_eq!(table.total(), 253);
        Ok(())
    }
}
