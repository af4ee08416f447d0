//! Shared helpers for CLI commands: configuration lookup and store setup.

use tlog_config::TlogConfig;
use tlog_diagnostics::{MessageWriter, NullWriter, StderrWriter};
use tlog_store::TlogStore;

use crate::GlobalArgs;

/// Loads the configuration named by `--config`, or `tlog.toml` in the
/// intermediate directory when present.
pub fn load_config(global: &GlobalArgs) -> Result<TlogConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => tlog_config::load_config_file(path)?,
        None => tlog_config::load_config(&global.dir)?,
    };
    Ok(config)
}

/// Opens the store for the intermediate directory without loading it.
pub fn open_store(global: &GlobalArgs) -> Result<TlogStore, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let store = TlogStore::from_config(&global.dir, &config.log)?;
    tracing::debug!(
        read_log = %store.read_log_path().display(),
        write_log = %store.write_log_path().display(),
        "opened dependency store"
    );
    Ok(store)
}

/// Returns the writer for human-readable messages. `--quiet` discards them;
/// failures still surface as the command's error.
pub fn message_writer(global: &GlobalArgs) -> Box<dyn MessageWriter> {
    if global.quiet {
        Box::new(NullWriter)
    } else {
        Box::new(StderrWriter::new(global.color))
    }
}
