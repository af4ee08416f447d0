//! Parsing and validation of `tlog.toml` configuration files.
//!
//! The configuration names the dependency logs and chooses how they are
//! encoded. Every field has a default, so a missing file yields the same
//! layout the command-table compiler has always written.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use types::*;
