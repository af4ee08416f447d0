//! `tlog check`: staleness query for one source/target pair.
//!
//! Exits with 0 when the recorded build is current and 1 when the target has
//! to be rebuilt, so build scripts can branch on the status alone.

use std::path::Path;

use serde::Serialize;
use tlog_diagnostics::{Diagnostic, DiagnosticSink};
use tlog_store::{Staleness, StalenessEvaluator};

use crate::session::{message_writer, open_store};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// JSON shape of a check result.
#[derive(Serialize)]
struct CheckReport<'a> {
    current: bool,
    reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a Path>,
    diagnostics: Vec<Diagnostic>,
}

/// Runs the `tlog check` command.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut store = open_store(global)?;

    let outcome = match args.format {
        ReportFormat::Text => {
            let writer = message_writer(global);
            let outcome = StalenessEvaluator::new(writer.as_ref())
                .check(&mut store, &args.source, &args.target);
            if !global.quiet {
                if outcome.is_current() {
                    eprintln!("   Up to date {}", args.target.display());
                } else {
                    eprintln!("   Rebuild required ({})", reason(&outcome));
                }
            }
            outcome
        }
        ReportFormat::Json => {
            let sink = DiagnosticSink::new();
            let outcome =
                StalenessEvaluator::new(&sink).check(&mut store, &args.source, &args.target);
            let report = CheckReport {
                current: outcome.is_current(),
                reason: reason(&outcome),
                path: outcome.path(),
                diagnostics: sink.take_all(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            outcome
        }
    };

    Ok(if outcome.is_current() { 0 } else { 1 })
}

fn reason(outcome: &Staleness) -> &'static str {
    match outcome {
        Staleness::UpToDate => "up-to-date",
        Staleness::Unrecorded => "unrecorded",
        Staleness::LogUnavailable => "log-unavailable",
        Staleness::TargetMissing(_) => "target-missing",
        Staleness::OutputMissing(_) => "output-missing",
        Staleness::InputMissing(_) => "input-missing",
        Staleness::InputNewer(_) => "input-newer",
    }
}
