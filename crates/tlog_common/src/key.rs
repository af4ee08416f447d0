//! Case-insensitive file identities for dependency log entries.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::path::{absolutize, fold_case};

/// A normalized file identity.
///
/// Holds the absolute, lexically-cleaned path as it was first spelled (used
/// to reach the file on disk) together with its uppercase fold. Equality,
/// ordering and hashing consider only the fold, so `C:\Foo\Bar.h` and
/// `c:\foo\bar.h` are the same key.
#[derive(Clone)]
pub struct FileKey {
    path: PathBuf,
    folded: String,
}

impl FileKey {
    /// Normalizes `path` against `base` and builds its key.
    pub fn new(path: &Path, base: &Path) -> Self {
        Self::from_normalized(absolutize(path, base))
    }

    /// Builds a key from a path that is already normalized, such as a line
    /// read back from a persisted log.
    pub fn from_normalized(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let folded = fold_case(&path.to_string_lossy());
        Self { path, folded }
    }

    /// Returns the path as spelled when the key was created.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the uppercase form used for comparisons.
    pub fn folded(&self) -> &str {
        &self.folded
    }
}

impl PartialEq for FileKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for FileKey {}

impl Hash for FileKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for FileKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileKey({})", self.path.display())
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Serialize for FileKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.path.display())
    }
}
