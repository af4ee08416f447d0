//! `tlog show`: print the recorded builds.

use serde::Serialize;
use tlog_common::FileKey;
use tlog_store::{LogKind, TlogStore};

use crate::session::open_store;
use crate::{GlobalArgs, ReportFormat, ShowArgs};

/// One source with everything recorded for it. Either list may be empty when
/// the source appears in only one log.
#[derive(Serialize, Debug)]
struct RecordView<'a> {
    source: &'a FileKey,
    reads: Vec<&'a FileKey>,
    writes: Vec<&'a FileKey>,
}

/// Runs the `tlog show` command.
pub fn run(args: &ShowArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut store = open_store(global)?;
    store.load()?;

    let views = collect(&store, args);
    match args.format {
        ReportFormat::Text => {
            if views.is_empty() && !global.quiet {
                eprintln!("no recorded builds in {}", store.intermediate_dir().display());
            }
            print!("{}", render_text(&views));
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }
    Ok(0)
}

fn collect<'a>(store: &'a TlogStore, args: &ShowArgs) -> Vec<RecordView<'a>> {
    let wanted = args.source.as_deref().map(|s| store.key(s));
    store
        .sources()
        .into_iter()
        .filter(|source| wanted.as_ref().map_or(true, |w| w == *source))
        .map(|source| RecordView {
            source,
            reads: entries(store, LogKind::Read, source),
            writes: entries(store, LogKind::Write, source),
        })
        .collect()
}

fn entries<'a>(store: &'a TlogStore, kind: LogKind, source: &FileKey) -> Vec<&'a FileKey> {
    store
        .log(kind)
        .get(source)
        .map(|set| set.iter().collect())
        .unwrap_or_default()
}

fn render_text(views: &[RecordView<'_>]) -> String {
    let mut out = String::new();
    for view in views {
        out.push_str(&format!("{}\n", view.source));
        for path in &view.reads {
            out.push_str(&format!("  read  {path}\n"));
        }
        for path in &view.writes {
            out.push_str(&format!("  write {path}\n"));
        }
    }
    out
}
