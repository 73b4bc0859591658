//! Host-side adapters
//!
//! Output sink (TSV) and the line-count manifest generator that feeds the
//! offset table.

pub mod manifest;
pub mod tsv;

pub use manifest::{build_manifest, count_lines, write_manifest, ManifestEntry};
pub use tsv::{write_tsv, ExtractStats};
