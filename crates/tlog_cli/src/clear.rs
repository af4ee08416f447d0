//! `tlog clear`: delete both dependency logs.

use crate::session::open_store;
use crate::GlobalArgs;

/// Runs the `tlog clear` command. Every source is unrecorded afterwards.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut store = open_store(global)?;
    store.clear()?;
    if !global.quiet {
        eprintln!(
            "   Removed {} and {}",
            store.read_log_path().display(),
            store.write_log_path().display()
        );
    }
    Ok(0)
}
