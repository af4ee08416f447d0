//! Collecting a build's dependencies and committing them to the store.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tlog_common::{clean, FileKey};

use crate::error::StoreError;
use crate::store::TlogStore;

/// Receives dependency facts from a compiler while it runs.
///
/// The compiler calls [`on_dependency_observed`](Self::on_dependency_observed)
/// for every file it opens besides the main source, such as included
/// headers. It does not need to know how the facts are stored.
pub trait DependencyObserver {
    /// Reports that the build read `path`.
    fn on_dependency_observed(&mut self, path: &Path);
}

/// Files produced by a successful build.
///
/// Relative paths are resolved against the store's intermediate directory
/// when the build is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutputs {
    primary: PathBuf,
    generated: Vec<PathBuf>,
}

impl BuildOutputs {
    /// Creates the output list with the main compiled artifact.
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            generated: Vec::new(),
        }
    }

    /// Adds a generated side file, such as emitted source code or a header.
    pub fn with_generated(mut self, path: impl Into<PathBuf>) -> Self {
        self.generated.push(path.into());
        self
    }

    /// Iterates over every output, primary first.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.primary.as_path()).chain(self.generated.iter().map(PathBuf::as_path))
    }
}

/// Collects the dependencies of one source during a build.
///
/// Observed paths are deduplicated case-insensitively. Nothing reaches the
/// store until [`commit`](Self::commit), which the caller invokes only after
/// the build succeeded; an abandoned recorder leaves the logs untouched.
#[derive(Debug)]
pub struct BuildRecorder {
    source: PathBuf,
    observed: IndexSet<FileKey>,
}

impl BuildRecorder {
    /// Starts recording for `source`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            observed: IndexSet::new(),
        }
    }

    /// Returns the source being built.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Iterates over the dependencies observed so far.
    pub fn observed(&self) -> impl Iterator<Item = &Path> {
        self.observed.iter().map(FileKey::path)
    }

    /// Replaces the record for the source with this build's facts and saves
    /// the store.
    ///
    /// The source is recorded as its own input, followed by every observed
    /// dependency. Each output is recorded as written. The previous record is
    /// dropped first, so files the source no longer uses stop forcing
    /// rebuilds.
    pub fn commit(self, store: &mut TlogStore, outputs: &BuildOutputs) -> Result<(), StoreError> {
        store.ensure_loaded()?;
        store.forget(&self.source);

        store.add_read_dependency(&self.source, &self.source);
        for dependency in &self.observed {
            store.add_read_dependency(&self.source, dependency.path());
        }

        let dir = store.intermediate_dir().to_path_buf();
        for output in outputs.iter() {
            store.add_write_dependency(&self.source, &dir.join(output));
        }

        tracing::debug!(
            source = %self.source.display(),
            reads = self.observed.len() + 1,
            "committing build record"
        );
        store.save()
    }
}

impl DependencyObserver for BuildRecorder {
    fn on_dependency_observed(&mut self, path: &Path) {
        self.observed.insert(FileKey::from_normalized(clean(path)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LogKind;

    fn make_store() -> (tempfile::TempDir, TlogStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TlogStore::with_base(&dir.path().join("obj"), "VSCT", dir.path());
        (dir, store)
    }

    #[test]
    fn outputs_iterate_primary_first() {
        let outputs = BuildOutputs::new("Menus.cto")
            .with_generated("Menus.cs")
            .with_generated("Menus.h");
        let all: Vec<_> = outputs.iter().collect();
        assert_eq!(
            all,
            vec![Path::new("Menus.cto"), Path::new("Menus.cs"), Path::new("Menus.h")]
        );
    }

    #[test]
    fn observer_deduplicates_ignoring_case() {
        let mut recorder = BuildRecorder::new("Menus.vsct");
        recorder.on_dependency_observed(Path::new("/inc/stdidcmd.h"));
        recorder.on_dependency_observed(Path::new("/INC/StdIDCmd.h"));
        recorder.on_dependency_observed(Path::new("/inc/./vsshlids.h"));
        let observed: Vec<_> = recorder.observed().collect();
        assert_eq!(
            observed,
            vec![Path::new("/inc/stdidcmd.h"), Path::new("/inc/vsshlids.h")]
        );
    }

    #[test]
    fn commit_records_source_dependencies_and_outputs() {
        let (dir, mut store) = make_store();
        let src = dir.path().join("Menus.vsct");
        let mut recorder = BuildRecorder::new(&src);
        recorder.on_dependency_observed(&dir.path().join("inc/stdidcmd.h"));

        recorder
            .commit(&mut store, &BuildOutputs::new("Menus.cto").with_generated("Menus.h"))
            .unwrap();

        let record = store.record(&src).unwrap();
        let reads: Vec<_> = record.reads.iter().map(|k| k.path().to_path_buf()).collect();
        assert_eq!(reads, vec![src.clone(), dir.path().join("inc/stdidcmd.h")]);
        let writes: Vec<_> = record.writes.iter().map(|k| k.path().to_path_buf()).collect();
        assert_eq!(
            writes,
            vec![dir.path().join("obj/Menus.cto"), dir.path().join("obj/Menus.h")]
        );
        assert!(store.read_log_path().exists());
        assert!(store.write_log_path().exists());
    }

    #[test]
    fn commit_replaces_previous_record() {
        let (dir, mut store) = make_store();
        let src = dir.path().join("Menus.vsct");

        let mut first = BuildRecorder::new(&src);
        first.on_dependency_observed(&dir.path().join("old.h"));
        first.commit(&mut store, &BuildOutputs::new("Menus.cto")).unwrap();

        let second = BuildRecorder::new(&src);
        second.commit(&mut store, &BuildOutputs::new("Menus.cto")).unwrap();

        let mut reloaded = TlogStore::with_base(&dir.path().join("obj"), "VSCT", dir.path());
        reloaded.load().unwrap();
        let record = reloaded.record(&src).unwrap();
        assert_eq!(record.reads.len(), 1);
        assert_eq!(record.writes.len(), 1);
    }

    #[test]
    fn commit_keeps_other_sources() {
        let (dir, mut store) = make_store();
        let a = dir.path().join("a.vsct");
        let b = dir.path().join("b.vsct");
        BuildRecorder::new(&a)
            .commit(&mut store, &BuildOutputs::new("a.cto"))
            .unwrap();

        let mut fresh = TlogStore::with_base(&dir.path().join("obj"), "VSCT", dir.path());
        BuildRecorder::new(&b)
            .commit(&mut fresh, &BuildOutputs::new("b.cto"))
            .unwrap();

        assert!(fresh.contains(LogKind::Read, &a));
        assert!(fresh.contains(LogKind::Write, &b));
    }

    #[test]
    fn absolute_output_is_kept() {
        let (dir, mut store) = make_store();
        let src = dir.path().join("a.vsct");
        let elsewhere = dir.path().join("bin/a.cto");
        BuildRecorder::new(&src)
            .commit(&mut store, &BuildOutputs::new(&elsewhere))
            .unwrap();
        let record = store.record(&src).unwrap();
        assert_eq!(record.writes[0].path(), elsewhere.as_path());
    }
}
