//! A single dependency log: source keys mapped to ordered sets of paths.

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use tlog_common::FileKey;
use tlog_config::PathCase;

use crate::codec::{self, Line, KEY_MARKER, LINE_END};

/// Mapping from a source key to the paths recorded for it.
///
/// Keys and paths compare case-insensitively through [`FileKey`]. Both the
/// key order and the order within each set follow first insertion, so a log
/// that is loaded and saved again without changes is written back
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLog {
    entries: IndexMap<FileKey, IndexSet<FileKey>>,
}

impl DependencyLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path` to the set recorded for `source`, creating the set if
    /// needed. Returns `false` if the path was already present.
    pub fn insert(&mut self, source: FileKey, path: FileKey) -> bool {
        self.entries.entry(source).or_default().insert(path)
    }

    /// Ensures `source` has a (possibly empty) set.
    pub fn touch(&mut self, source: FileKey) {
        self.entries.entry(source).or_default();
    }

    /// Returns the set recorded for `source`.
    pub fn get(&self, source: &FileKey) -> Option<&IndexSet<FileKey>> {
        self.entries.get(source)
    }

    /// Returns the stored key (with its recorded spelling) and set for `source`.
    pub fn get_key_value(&self, source: &FileKey) -> Option<(&FileKey, &IndexSet<FileKey>)> {
        self.entries.get_key_value(source)
    }

    /// Returns `true` if `source` has an entry.
    pub fn contains(&self, source: &FileKey) -> bool {
        self.entries.contains_key(source)
    }

    /// Removes the entry for `source`, keeping the order of the others.
    pub fn remove(&mut self, source: &FileKey) -> Option<IndexSet<FileKey>> {
        self.entries.shift_remove(source)
    }

    /// Iterates over the entries in log order.
    pub fn iter(&self) -> impl Iterator<Item = (&FileKey, &IndexSet<FileKey>)> {
        self.entries.iter()
    }

    /// Returns the number of source keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the log has no source keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Adds every fact of `other`. Keys already present keep their position
    /// and spelling; new keys are appended in `other`'s order.
    pub fn absorb(&mut self, other: Self) {
        for (source, paths) in other.entries {
            self.entries.entry(source).or_default().extend(paths);
        }
    }

    /// Parses decoded log text.
    ///
    /// Returns the log and the number of orphan lines dropped. An orphan is a
    /// path that appears before any key line, or after a `^` line with an
    /// empty key. Blocks repeating a key are merged into the first one.
    pub fn parse(text: &str) -> (Self, usize) {
        let mut log = Self::new();
        let mut current: Option<usize> = None;
        let mut orphans = 0;

        for line in codec::lines(text) {
            match line {
                Line::Key(key) if key.trim().is_empty() => current = None,
                Line::Key(key) => {
                    let index = match log.entries.entry(FileKey::from_normalized(key)) {
                        Entry::Occupied(entry) => entry.index(),
                        Entry::Vacant(entry) => {
                            let index = entry.index();
                            entry.insert(IndexSet::new());
                            index
                        }
                    };
                    current = Some(index);
                }
                Line::Entry(path) => match current.and_then(|i| log.entries.get_index_mut(i)) {
                    Some((_, set)) => {
                        set.insert(FileKey::from_normalized(path));
                    }
                    None => orphans += 1,
                },
            }
        }

        (log, orphans)
    }

    /// Renders the log as text, one key line followed by its paths per block.
    pub fn render(&self, case: PathCase) -> String {
        let mut out = String::new();
        for (source, paths) in &self.entries {
            out.push(KEY_MARKER);
            out.push_str(&spell(source, case));
            out.push_str(LINE_END);
            for path in paths {
                out.push_str(&spell(path, case));
                out.push_str(LINE_END);
            }
        }
        out
    }
}

fn spell(key: &FileKey, case: PathCase) -> String {
    match case {
        PathCase::Preserve => key.path().to_string_lossy().into_owned(),
        PathCase::Upper => key.folded().to_string(),
    }
}
