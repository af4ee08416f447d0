//! Lexical path normalization shared by the dependency logs.
//!
//! Paths recorded in a log may name files that do not exist yet (outputs of
//! a build that has not run), so normalization never touches the file system:
//! relative paths are joined onto a base directory and `.`/`..` components are
//! resolved textually.

use std::path::{Component, Path, PathBuf};

/// Errors that can occur while determining a base directory.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The process working directory could not be read.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Returns the process working directory, used as the default base for
/// resolving relative paths.
pub fn current_base() -> Result<PathBuf, PathError> {
    std::env::current_dir().map_err(PathError::CurrentDir)
}

/// Resolves `path` against `base` and removes `.` and `..` components.
///
/// Absolute paths ignore `base`. The result is absolute whenever `base` is.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&base.join(path))
    }
}

/// Lexically normalizes a path.
///
/// `.` components are dropped and each `..` removes the preceding normal
/// component. A `..` directly under the root is discarded; a leading `..` on
/// a relative path is kept.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Uppercases every character that has a single-character uppercase form.
///
/// This is a plain per-character transform, not Unicode case folding:
/// characters whose uppercase expands to several characters (such as `ß`)
/// are left as they are, so the folded key has the same character count as
/// the input.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_removes_cur_dir() {
        assert_eq!(clean(Path::new("/a/./b/.")), PathBuf::from("/a/b"));
    }

    #[test]
    fn clean_resolves_parent_dir() {
        assert_eq!(clean(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean(Path::new("/a/b/../../c")), PathBuf::from("/c"));
    }

    #[test]
    fn clean_stops_at_root() {
        assert_eq!(clean(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn clean_keeps_leading_parent_on_relative() {
        assert_eq!(clean(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(clean(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn absolutize_joins_relative() {
        let abs = absolutize(Path::new("src/../obj/out.cto"), Path::new("/work"));
        assert_eq!(abs, PathBuf::from("/work/obj/out.cto"));
    }

    #[test]
    fn absolutize_ignores_base_for_absolute() {
        let abs = absolutize(Path::new("/x/y.vsct"), Path::new("/work"));
        assert_eq!(abs, PathBuf::from("/x/y.vsct"));
    }

    #[test]
    fn fold_case_uppercases_ascii() {
        assert_eq!(fold_case("c:\\foo\\bar.h"), "C:\\FOO\\BAR.H");
    }

    #[test]
    fn fold_case_keeps_multi_char_expansions() {
        assert_eq!(fold_case("straße"), "STRAßE");
        assert_eq!(fold_case("é"), "É");
    }

    #[test]
    fn current_base_is_absolute() {
        let base = current_base().unwrap();
        assert!(base.is_absolute());
    }
}
