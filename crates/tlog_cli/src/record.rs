//! `tlog record`: add read/write facts for a source and save the logs.

use crate::session::open_store;
use crate::{GlobalArgs, RecordArgs};

/// Runs the `tlog record` command.
///
/// Existing records are kept; the given facts are added to the source's
/// entries. Returns exit code 0 once both logs are saved.
pub fn run(args: &RecordArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut store = open_store(global)?;
    store.load()?;

    let mut added = 0;
    for path in &args.read {
        if store.add_read_dependency(&args.source, path) {
            added += 1;
        }
    }
    for path in &args.write {
        if store.add_write_dependency(&args.source, path) {
            added += 1;
        }
    }
    store.save()?;

    if !global.quiet {
        eprintln!(
            "   Recorded {added} new fact(s) for {}",
            store.key(&args.source)
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlog_store::{LogKind, TlogStore};

    #[test]
    fn record_appends_to_existing_logs() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalArgs {
            quiet: true,
            color: false,
            config: None,
            dir: dir.path().to_path_buf(),
        };
        let src = dir.path().join("a.vsct");

        let first = RecordArgs {
            source: src.clone(),
            read: vec![src.clone()],
            write: vec![dir.path().join("a.cto")],
        };
        assert_eq!(run(&first, &global).unwrap(), 0);

        let second = RecordArgs {
            source: src.clone(),
            read: vec![dir.path().join("inc/a.h"), src.clone()],
            write: vec![],
        };
        assert_eq!(run(&second, &global).unwrap(), 0);

        let mut store = TlogStore::new(dir.path(), "VSCT").unwrap();
        store.load().unwrap();
        let record = store.record(&src).unwrap();
        assert_eq!(record.reads.len(), 2);
        assert_eq!(record.writes.len(), 1);
        assert!(store.contains(LogKind::Write, &src));
    }
}
