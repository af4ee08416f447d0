//! Configuration types deserialized from `tlog.toml`.

use serde::Deserialize;

/// Log file stem written by the command-table compiler.
pub const DEFAULT_COMPONENT: &str = "VSCT";

/// The top-level configuration parsed from `tlog.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct TlogConfig {
    /// Dependency log layout and encoding.
    #[serde(default)]
    pub log: LogConfig,
}

/// Settings for the persisted read/write dependency logs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// File stem of the logs: `<component>.read.1.tlog` and
    /// `<component>.write.1.tlog`.
    #[serde(default = "default_component")]
    pub component: String,
    /// Text encoding used when writing the logs.
    #[serde(default)]
    pub encoding: TextEncoding,
    /// How paths are spelled in the written logs.
    #[serde(default)]
    pub path_case: PathCase,
}

fn default_component() -> String {
    DEFAULT_COMPONENT.to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            component: default_component(),
            encoding: TextEncoding::default(),
            path_case: PathCase::default(),
        }
    }
}

/// Text encoding of a dependency log file.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-16 little-endian with a byte-order mark (default).
    #[default]
    #[serde(rename = "utf-16le", alias = "utf-16")]
    Utf16Le,
    /// UTF-8 without a byte-order mark.
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
}

/// Spelling of paths written to the logs.
///
/// Comparisons are always case-insensitive; this only controls the text on
/// disk.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PathCase {
    /// Keep the spelling of the first recording (default). Required on
    /// case-sensitive file systems, where the logged path is what gets
    /// checked on disk.
    #[default]
    Preserve,
    /// Write every path uppercased, matching logs produced on Windows.
    Upper,
}
