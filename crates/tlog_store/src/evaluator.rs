//! Staleness evaluation against the recorded build and file timestamps.
//!
//! A recorded build is current when the target exists, every recorded output
//! exists, and no recorded input is newer than the oldest of the target and
//! the outputs. Anything unknown or missing means rebuild.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tlog_diagnostics::{Diagnostic, DiagnosticCode, MessageWriter};

use crate::store::TlogStore;

/// Outcome of a staleness check, with the reason when a rebuild is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// The recorded build is still valid.
    UpToDate,
    /// The source is missing from the read log, the write log, or both.
    Unrecorded,
    /// The dependency logs could not be read.
    LogUnavailable,
    /// The target does not exist.
    TargetMissing(PathBuf),
    /// A recorded output no longer exists.
    OutputMissing(PathBuf),
    /// A recorded input no longer exists.
    InputMissing(PathBuf),
    /// A recorded input was modified after the oldest output.
    InputNewer(PathBuf),
}

impl Staleness {
    /// Returns `true` only for [`Staleness::UpToDate`].
    pub fn is_current(&self) -> bool {
        matches!(self, Staleness::UpToDate)
    }

    /// Returns the file responsible for the rebuild, if there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Staleness::TargetMissing(p)
            | Staleness::OutputMissing(p)
            | Staleness::InputMissing(p)
            | Staleness::InputNewer(p) => Some(p),
            Staleness::UpToDate | Staleness::Unrecorded | Staleness::LogUnavailable => None,
        }
    }
}

/// Decides whether a recorded build still satisfies its target.
///
/// The evaluator reads the store but never records facts in it. Every
/// rebuild reason other than an unrecorded source is reported through the
/// message writer.
pub struct StalenessEvaluator<'w> {
    writer: &'w dyn MessageWriter,
}

impl<'w> StalenessEvaluator<'w> {
    /// Creates an evaluator reporting through `writer`.
    pub fn new(writer: &'w dyn MessageWriter) -> Self {
        Self { writer }
    }

    /// Returns `true` if `target` built from `source` is up to date.
    ///
    /// Reads the persisted logs first if the store has not yet, keeping any
    /// facts already added to it.
    pub fn is_current(&self, store: &mut TlogStore, source: &Path, target: &Path) -> bool {
        self.check(store, source, target).is_current()
    }

    /// Like [`is_current`](Self::is_current), returning the reason.
    pub fn check(&self, store: &mut TlogStore, source: &Path, target: &Path) -> Staleness {
        if let Err(e) = store.ensure_loaded() {
            self.writer.emit(Diagnostic::warning(
                DiagnosticCode::LOG_UNAVAILABLE,
                format!("cannot read dependency logs, rebuilding: {e}"),
            ));
            return Staleness::LogUnavailable;
        }
        self.evaluate(store, source, target)
    }

    /// Evaluates against the store as it is, without loading it.
    pub fn evaluate(&self, store: &TlogStore, source: &Path, target: &Path) -> Staleness {
        let Some(record) = store.record(source) else {
            tracing::debug!(source = %source.display(), "no recorded build");
            return Staleness::Unrecorded;
        };

        let target = store.key(target);
        let Some(mut baseline) = modified(target.path()) else {
            return self.stale(
                DiagnosticCode::TARGET_NOT_FOUND,
                "target file not found",
                Staleness::TargetMissing(target.path().to_path_buf()),
            );
        };

        for output in record.writes {
            match modified(output.path()) {
                Some(time) => baseline = baseline.min(time),
                None => {
                    return self.stale(
                        DiagnosticCode::OUTPUT_MISSING,
                        "output file not found",
                        Staleness::OutputMissing(output.path().to_path_buf()),
                    );
                }
            }
        }

        for input in record.reads {
            match modified(input.path()) {
                None => {
                    return self.stale(
                        DiagnosticCode::INPUT_MISSING,
                        "source file is missing, rebuilding",
                        Staleness::InputMissing(input.path().to_path_buf()),
                    );
                }
                Some(time) if time > baseline => {
                    return self.stale(
                        DiagnosticCode::INPUT_NEWER,
                        "target is out of date with respect to",
                        Staleness::InputNewer(input.path().to_path_buf()),
                    );
                }
                Some(_) => {}
            }
        }

        self.writer.emit(Diagnostic::note(
            DiagnosticCode::SKIP_UP_TO_DATE,
            "skipping, all outputs are up to date with respect to their inputs",
        ));
        Staleness::UpToDate
    }

    fn stale(&self, code: DiagnosticCode, message: &str, outcome: Staleness) -> Staleness {
        let mut diag = Diagnostic::warning(code, message);
        if let Some(path) = outcome.path() {
            diag = diag.with_path(path);
        }
        self.writer.emit(diag);
        outcome
    }
}

/// Returns the modification time of a regular file.
///
/// Anything that prevents reading it (absence, a directory in its place,
/// permissions) counts as missing.
fn modified(path: &Path) -> Option<SystemTime> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    metadata.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};
    use tlog_diagnostics::{DiagnosticSink, NullWriter, Severity};

    fn touch(path: &Path, secs: u64) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        if !path.exists() {
            std::fs::write(path, b"x").unwrap();
        }
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs))
            .unwrap();
    }

    /// `a.src` recorded as reading itself and `a.h`, and writing `obj/a.out`.
    struct Fixture {
        dir: tempfile::TempDir,
        store: TlogStore,
        src: PathBuf,
        header: PathBuf,
        out: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = TlogStore::with_base(&dir.path().join("obj"), "VSCT", dir.path());
            let src = dir.path().join("a.src");
            let header = dir.path().join("a.h");
            let out = dir.path().join("obj/a.out");
            Self {
                dir,
                store,
                src,
                header,
                out,
            }
        }

        fn recorded() -> Self {
            let mut fx = Self::new();
            fx.store.add_read_dependency(&fx.src, &fx.src);
            fx.store.add_read_dependency(&fx.src, &fx.header);
            fx.store.add_write_dependency(&fx.src, &fx.out);
            fx
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }
    }

    #[test]
    fn unrecorded_source_is_stale_without_message() {
        let mut fx = Fixture::new();
        let sink = DiagnosticSink::new();
        let outcome = StalenessEvaluator::new(&sink).check(
            &mut fx.store,
            Path::new("never-seen.src"),
            Path::new("out.bin"),
        );
        assert_eq!(outcome, Staleness::Unrecorded);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn partial_record_is_stale() {
        let mut fx = Fixture::new();
        touch(&fx.src, 0);
        touch(&fx.out, 10);
        fx.store.add_read_dependency(&fx.src, &fx.src);
        let eval = StalenessEvaluator::new(&NullWriter);
        assert_eq!(eval.check(&mut fx.store, &fx.src, &fx.out), Staleness::Unrecorded);
    }

    #[test]
    fn fresh_build_is_current() {
        let mut fx = Fixture::recorded();
        touch(&fx.src, 0);
        touch(&fx.header, 0);
        touch(&fx.out, 10);

        let sink = DiagnosticSink::new();
        let eval = StalenessEvaluator::new(&sink);
        assert!(eval.is_current(&mut fx.store, &fx.src, &fx.out));
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::SKIP_UP_TO_DATE);
        assert_eq!(diags[0].severity, Severity::Note);
    }

    #[test]
    fn facts_added_before_any_load_survive_the_check() {
        let mut fx = Fixture::new();
        touch(&fx.src, 0);
        touch(&fx.out, 10);
        fx.store.add_read_dependency(&fx.src, &fx.src);
        fx.store.add_write_dependency(&fx.src, &fx.out);

        let eval = StalenessEvaluator::new(&NullWriter);
        assert!(eval.is_current(&mut fx.store, &fx.src, &fx.out));
        assert!(fx.store.record(&fx.src).is_some());

        fx.store.save().unwrap();
        let mut reloaded =
            TlogStore::with_base(fx.store.intermediate_dir(), "VSCT", fx.dir.path());
        reloaded.load().unwrap();
        let record = reloaded.record(&fx.src).unwrap();
        assert_eq!(record.reads.len(), 1);
        assert_eq!(record.writes.len(), 1);
    }

    #[test]
    fn equal_timestamps_are_current() {
        let mut fx = Fixture::recorded();
        touch(&fx.src, 5);
        touch(&fx.header, 5);
        touch(&fx.out, 5);
        let eval = StalenessEvaluator::new(&NullWriter);
        assert!(eval.is_current(&mut fx.store, &fx.src, &fx.out));
    }

    #[test]
    fn modified_input_triggers_rebuild() {
        let mut fx = Fixture::recorded();
        touch(&fx.src, 20);
        touch(&fx.header, 0);
        touch(&fx.out, 10);

        let sink = DiagnosticSink::new();
        let outcome = StalenessEvaluator::new(&sink).check(&mut fx.store, &fx.src, &fx.out);
        assert_eq!(outcome, Staleness::InputNewer(fx.src.clone()));
        let diags = sink.take_all();
        assert_eq!(diags[0].code, DiagnosticCode::INPUT_NEWER);
        assert_eq!(diags[0].path.as_deref(), Some(fx.src.as_path()));
    }

    #[test]
    fn target_missing_is_stale() {
        let mut fx = Fixture::recorded();
        touch(&fx.src, 0);
        touch(&fx.header, 0);
        touch(&fx.out, 10);
        let other = fx.path("obj/other.out");

        let sink = DiagnosticSink::new();
        let outcome = StalenessEvaluator::new(&sink).check(&mut fx.store, &fx.src, &other);
        assert_eq!(outcome, Staleness::TargetMissing(other));
        assert_eq!(sink.take_all()[0].code, DiagnosticCode::TARGET_NOT_FOUND);
    }

    #[test]
    fn missing_output_triggers_rebuild_even_with_target_present() {
        let mut fx = Fixture::recorded();
        let generated = fx.path("obj/a.h.gen");
        fx.store.add_write_dependency(&fx.src, &generated);
        touch(&fx.src, 0);
        touch(&fx.header, 0);
        touch(&fx.out, 10);

        let sink = DiagnosticSink::new();
        let outcome = StalenessEvaluator::new(&sink).check(&mut fx.store, &fx.src, &fx.out);
        assert_eq!(outcome, Staleness::OutputMissing(generated));
        assert_eq!(sink.take_all()[0].code, DiagnosticCode::OUTPUT_MISSING);
    }

    #[test]
    fn oldest_output_governs() {
        let mut fx = Fixture::recorded();
        let generated = fx.path("obj/a.h.gen");
        fx.store.add_write_dependency(&fx.src, &generated);
        touch(&fx.src, 5);
        touch(&fx.header, 0);
        touch(&fx.out, 10);
        touch(&generated, 3);

        let eval = StalenessEvaluator::new(&NullWriter);
        assert_eq!(
            eval.check(&mut fx.store, &fx.src, &fx.out),
            Staleness::InputNewer(fx.src.clone())
        );
    }

    #[test]
    fn missing_input_triggers_rebuild() {
        let mut fx = Fixture::recorded();
        touch(&fx.src, 0);
        touch(&fx.out, 10);

        let sink = DiagnosticSink::new();
        let outcome = StalenessEvaluator::new(&sink).check(&mut fx.store, &fx.src, &fx.out);
        assert_eq!(outcome, Staleness::InputMissing(fx.header.clone()));
        assert_eq!(sink.take_all()[0].code, DiagnosticCode::INPUT_MISSING);
    }

    #[test]
    fn case_insensitive_query_hits_record() {
        let fx = Fixture::recorded();
        let shouted = PathBuf::from(fx.src.to_string_lossy().to_uppercase());
        assert!(fx.store.record(&shouted).is_some());
    }

    #[test]
    fn directory_in_place_of_output_counts_as_missing() {
        let mut fx = Fixture::recorded();
        touch(&fx.src, 0);
        touch(&fx.header, 0);
        std::fs::create_dir_all(&fx.out).unwrap();
        let eval = StalenessEvaluator::new(&NullWriter);
        assert!(!eval.is_current(&mut fx.store, &fx.src, &fx.out));
    }

    #[test]
    fn unreadable_logs_are_stale() {
        let mut fx = Fixture::new();
        std::fs::create_dir_all(fx.store.read_log_path()).unwrap();
        std::fs::write(fx.store.write_log_path(), b"").unwrap();

        let sink = DiagnosticSink::new();
        let outcome = StalenessEvaluator::new(&sink).check(&mut fx.store, &fx.src, &fx.out);
        assert_eq!(outcome, Staleness::LogUnavailable);
        assert_eq!(sink.take_all()[0].code, DiagnosticCode::LOG_UNAVAILABLE);
    }

    #[test]
    fn staleness_path_accessor() {
        assert!(Staleness::UpToDate.is_current());
        assert!(Staleness::UpToDate.path().is_none());
        assert!(!Staleness::Unrecorded.is_current());
        let p = PathBuf::from("/x");
        assert_eq!(Staleness::InputNewer(p.clone()).path(), Some(p.as_path()));
    }
}
