//! The dependency store: the read and write logs of one intermediate directory.
//!
//! The store is an explicit object owned by the build session that uses it.
//! It loads both logs from `<dir>/<component>.read.1.tlog` and
//! `<dir>/<component>.write.1.tlog`, accepts new facts while a build runs,
//! and rewrites both files when the build succeeds.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tempfile::NamedTempFile;
use tlog_common::{absolutize, current_base, FileKey};
use tlog_config::{LogConfig, PathCase, TextEncoding};

use crate::codec;
use crate::error::StoreError;
use crate::log::DependencyLog;

/// Which of the two logs a fact belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Files read while building a source.
    Read,
    /// Files written while building a source.
    Write,
}

impl LogKind {
    /// Both kinds, in the order they are loaded and saved.
    pub const ALL: [LogKind; 2] = [LogKind::Read, LogKind::Write];
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Read => write!(f, "read"),
            LogKind::Write => write!(f, "write"),
        }
    }
}

/// Everything recorded for one source by its last successful build.
#[derive(Debug, Clone, Copy)]
pub struct BuildRecord<'a> {
    /// The source key as recorded in the read log.
    pub source: &'a FileKey,
    /// Files the build read.
    pub reads: &'a IndexSet<FileKey>,
    /// Files the build wrote.
    pub writes: &'a IndexSet<FileKey>,
}

/// Read and write dependency logs for one intermediate directory.
#[derive(Debug)]
pub struct TlogStore {
    dir: PathBuf,
    component: String,
    base: PathBuf,
    encoding: TextEncoding,
    path_case: PathCase,
    reads: DependencyLog,
    writes: DependencyLog,
    loaded: bool,
}

impl TlogStore {
    /// Creates an empty store whose relative paths resolve against the
    /// process working directory.
    pub fn new(dir: &Path, component: &str) -> Result<Self, StoreError> {
        Ok(Self::with_base(dir, component, &current_base()?))
    }

    /// Creates an empty store whose relative paths resolve against `base`.
    pub fn with_base(dir: &Path, component: &str, base: &Path) -> Self {
        Self {
            dir: absolutize(dir, base),
            component: component.to_string(),
            base: base.to_path_buf(),
            encoding: TextEncoding::default(),
            path_case: PathCase::default(),
            reads: DependencyLog::new(),
            writes: DependencyLog::new(),
            loaded: false,
        }
    }

    /// Creates an empty store configured from the `[log]` section.
    pub fn from_config(dir: &Path, config: &LogConfig) -> Result<Self, StoreError> {
        Ok(Self::new(dir, &config.component)?
            .with_encoding(config.encoding)
            .with_path_case(config.path_case))
    }

    /// Sets the encoding used when saving.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets how paths are spelled when saving.
    pub fn with_path_case(mut self, path_case: PathCase) -> Self {
        self.path_case = path_case;
        self
    }

    /// Returns the directory holding the logs.
    pub fn intermediate_dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the directory relative paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Returns the path of the log file for `kind`.
    pub fn log_path(&self, kind: LogKind) -> PathBuf {
        self.dir.join(format!("{}.{kind}.1.tlog", self.component))
    }

    /// Returns the path of the read log.
    pub fn read_log_path(&self) -> PathBuf {
        self.log_path(LogKind::Read)
    }

    /// Returns the path of the write log.
    pub fn write_log_path(&self) -> PathBuf {
        self.log_path(LogKind::Write)
    }

    /// Normalizes `path` the way every key and recorded path is normalized.
    pub fn key(&self, path: &Path) -> FileKey {
        FileKey::new(path, &self.base)
    }

    /// Returns `true` once the persisted logs have been read.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces the in-memory logs with the persisted ones.
    ///
    /// Facts recorded since the last load are discarded. If either log file
    /// is absent, as on a first build, both logs are left empty. Orphan lines
    /// are skipped. Any other I/O failure is returned and leaves the
    /// in-memory logs unchanged.
    pub fn load(&mut self) -> Result<(), StoreError> {
        self.loaded = false;
        let (reads, writes) = self.read_persisted()?;
        self.reads = reads;
        self.writes = writes;
        self.loaded = true;
        Ok(())
    }

    /// Loads the logs unless they have already been loaded.
    ///
    /// Facts added before the first load are kept. They are merged on top of
    /// the persisted ones, so a persisted key keeps its position and
    /// spelling and gains the new paths after its recorded ones.
    pub fn ensure_loaded(&mut self) -> Result<(), StoreError> {
        if self.loaded {
            return Ok(());
        }
        let (mut reads, mut writes) = self.read_persisted()?;
        reads.absorb(std::mem::take(&mut self.reads));
        writes.absorb(std::mem::take(&mut self.writes));
        self.reads = reads;
        self.writes = writes;
        self.loaded = true;
        Ok(())
    }

    /// Reads both persisted logs. Both are empty unless both files exist.
    fn read_persisted(&self) -> Result<(DependencyLog, DependencyLog), StoreError> {
        let read_path = self.read_log_path();
        let write_path = self.write_log_path();
        let (Some(read_bytes), Some(write_bytes)) =
            (read_optional(&read_path)?, read_optional(&write_path)?)
        else {
            tracing::debug!(dir = %self.dir.display(), "dependency logs absent, starting empty");
            return Ok((DependencyLog::new(), DependencyLog::new()));
        };

        let reads = self.parse(&read_path, &read_bytes);
        let writes = self.parse(&write_path, &write_bytes);
        tracing::debug!(
            dir = %self.dir.display(),
            reads = reads.len(),
            writes = writes.len(),
            "loaded dependency logs"
        );
        Ok((reads, writes))
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> DependencyLog {
        let text = codec::decode(bytes, self.encoding);
        let (log, orphans) = DependencyLog::parse(&text);
        if orphans > 0 {
            tracing::debug!(path = %path.display(), orphans, "skipped lines outside any source block");
        }
        log
    }

    /// Records that building `source` read `path`. Returns `false` if the
    /// fact was already known.
    pub fn add_read_dependency(&mut self, source: &Path, path: &Path) -> bool {
        self.add_dependency(LogKind::Read, source, path)
    }

    /// Records that building `source` wrote `path`. Returns `false` if the
    /// fact was already known.
    pub fn add_write_dependency(&mut self, source: &Path, path: &Path) -> bool {
        self.add_dependency(LogKind::Write, source, path)
    }

    /// Records a fact in the log selected by `kind`.
    pub fn add_dependency(&mut self, kind: LogKind, source: &Path, path: &Path) -> bool {
        let source = self.key(source);
        let path = self.key(path);
        self.log_mut(kind).insert(source, path)
    }

    /// Removes everything recorded for `source` from both logs. Returns
    /// `true` if either log had an entry.
    pub fn forget(&mut self, source: &Path) -> bool {
        let key = self.key(source);
        let read = self.reads.remove(&key).is_some();
        let write = self.writes.remove(&key).is_some();
        read || write
    }

    /// Returns the log for `kind`.
    pub fn log(&self, kind: LogKind) -> &DependencyLog {
        match kind {
            LogKind::Read => &self.reads,
            LogKind::Write => &self.writes,
        }
    }

    fn log_mut(&mut self, kind: LogKind) -> &mut DependencyLog {
        match kind {
            LogKind::Read => &mut self.reads,
            LogKind::Write => &mut self.writes,
        }
    }

    /// Returns `true` if the log for `kind` has an entry for `source`.
    pub fn contains(&self, kind: LogKind, source: &Path) -> bool {
        self.log(kind).contains(&self.key(source))
    }

    /// Returns the record for `source`, or `None` unless both logs have an
    /// entry for it.
    pub fn record(&self, source: &Path) -> Option<BuildRecord<'_>> {
        let key = self.key(source);
        let (source, reads) = self.reads.get_key_value(&key)?;
        let writes = self.writes.get(&key)?;
        Some(BuildRecord {
            source,
            reads,
            writes,
        })
    }

    /// Lists every source present in either log, read log order first.
    pub fn sources(&self) -> Vec<&FileKey> {
        let mut seen: IndexSet<&FileKey> = self.reads.iter().map(|(k, _)| k).collect();
        seen.extend(self.writes.iter().map(|(k, _)| k));
        seen.into_iter().collect()
    }

    /// Writes both logs, replacing their previous contents.
    ///
    /// Each file is written to a temporary sibling and renamed into place,
    /// so readers see either the old or the new log, never a partial one.
    /// Creates the intermediate directory if needed.
    pub fn save(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(StoreError::io(&self.dir))?;
        for kind in LogKind::ALL {
            self.write_log(kind)?;
        }
        tracing::debug!(
            dir = %self.dir.display(),
            reads = self.reads.len(),
            writes = self.writes.len(),
            "saved dependency logs"
        );
        Ok(())
    }

    fn write_log(&self, kind: LogKind) -> Result<(), StoreError> {
        let path = self.log_path(kind);
        let bytes = codec::encode(&self.log(kind).render(self.path_case), self.encoding);

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(StoreError::io(&self.dir))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(StoreError::io(tmp.path()))?;
        tmp.persist(&path).map_err(|e| StoreError::Persist {
            path,
            source: e.error,
        })?;
        Ok(())
    }

    /// Deletes both log files and empties the store.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        for kind in LogKind::ALL {
            let path = self.log_path(kind);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::Io { path, source: e }),
            }
        }
        self.reads.clear();
        self.writes.clear();
        self.loaded = true;
        Ok(())
    }
}

/// Reads a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
