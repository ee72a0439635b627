//! Lazy directory traversal

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Recursively lists every regular file under a root directory.
///
/// The root is resolved and existence-checked at construction; the walk
/// itself is lazy and single-pass. Symlinks are not followed.
#[derive(Debug, Clone)]
pub struct Explorer {
    root: PathBuf,
}

impl Explorer {
    /// Resolve `root` to an absolute path, failing with
    /// [`Error::PathNotFound`] if it does not exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|source| Error::PathNotFound {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self { root })
    }

    /// The resolved scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A lazy iterator over every regular file strictly inside the root.
    ///
    /// Entries the walker cannot read mid-walk are skipped.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_rejected() {
        let err = Explorer::new("/definitely/not/a/real/path").unwrap_err();
        assert!(matches!(err, Error::PathNotFound { .. }));
    }

    #[test]
    fn test_walk_finds_nested_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), "b").unwrap();
        fs::write(dir.path().join("sub/deeper/c.txt"), "c").unwrap();

        let explorer = Explorer::new(dir.path()).unwrap();
        let mut names: Vec<String> = explorer
            .files()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_directories_are_not_yielded() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("only/dirs/here")).unwrap();

        let explorer = Explorer::new(dir.path()).unwrap();
        assert_eq!(explorer.files().count(), 0);
    }
}
