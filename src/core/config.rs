//! Session configuration
//!
//! The host supplies configuration as string key/value pairs:
//!
//! | key          | required | effect                                      |
//! |--------------|----------|---------------------------------------------|
//! | `line.count` | yes      | line-count manifest for the offset table    |
//! | `mode`       | no       | `cov` (any case) selects coverage decoding  |

use crate::core::error::{ConfigError, ConfigResult};
use crate::core::offsets::OffsetTable;
use std::collections::{BTreeMap, HashMap};

/// Key of the line-count manifest
pub const LINE_COUNT_KEY: &str = "line.count";
/// Key of the decoding mode
pub const MODE_KEY: &str = "mode";
/// Mode value selecting coverage decoding
pub const COVERAGE_MODE: &str = "cov";

/// How genotype tokens are turned into values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Emit genotype tokens verbatim
    #[default]
    Raw,
    /// Re-encode tokens as allele indicators and emit one minor allele
    /// frequency per row
    Coverage,
}

impl DecodeMode {
    /// Interpret the optional `mode` attribute
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case(COVERAGE_MODE) => DecodeMode::Coverage,
            _ => DecodeMode::Raw,
        }
    }

    pub fn is_coverage(&self) -> bool {
        matches!(self, DecodeMode::Coverage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeMode::Raw => "raw",
            DecodeMode::Coverage => COVERAGE_MODE,
        }
    }
}

/// Read-only key/value view of host configuration
pub trait Attributes {
    fn value(&self, key: &str) -> Option<&str>;
}

impl Attributes for HashMap<String, String> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Attributes for BTreeMap<String, String> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Attributes for [(&str, &str)] {
    fn value(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// Everything a decode session needs, built once at setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    pub offsets: OffsetTable,
    pub mode: DecodeMode,
}

impl DecoderConfig {
    pub fn new(offsets: OffsetTable, mode: DecodeMode) -> Self {
        Self { offsets, mode }
    }

    /// Build from host key/value pairs
    pub fn from_attributes<A: Attributes + ?Sized>(attrs: &A) -> ConfigResult<Self> {
        let manifest = attrs
            .value(LINE_COUNT_KEY)
            .ok_or(ConfigError::MissingAttribute(LINE_COUNT_KEY))?;
        let offsets = OffsetTable::parse_manifest(manifest)?;
        let mode = DecodeMode::from_attribute(attrs.value(MODE_KEY));
        log::debug!(
            "Decoder configured: mode={}, {} rows across chr1..chr22",
            mode.as_str(),
            offsets.total()
        );
        Ok(Self { offsets, mode })
    }
}
