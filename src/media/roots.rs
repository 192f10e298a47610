//! Trusted root enumeration
//!
//! The folder registry is owned by the host application. Roots are
//! recomputed from it on every resolution, so directories that appear or
//! vanish at runtime are picked up without a restart.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Source of the directories under which resolution is permitted
pub trait FolderRegistry: Send + Sync {
    /// Every registered base directory, across all named groups
    fn folder_paths(&self) -> Vec<PathBuf>;

    /// The designated input directory, if any
    fn input_directory(&self) -> Option<PathBuf>;
}

/// Registry backed by a fixed name -> directories map
#[derive(Debug, Clone, Default)]
pub struct StaticFolderRegistry {
    folders: BTreeMap<String, Vec<PathBuf>>,
    input_directory: Option<PathBuf>,
}

impl StaticFolderRegistry {
    pub fn new(folders: BTreeMap<String, Vec<PathBuf>>, input_directory: Option<PathBuf>) -> Self {
        Self {
            folders,
            input_directory,
        }
    }

    /// Register a named group of directories
    pub fn with_folder(mut self, name: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        self.folders.entry(name.into()).or_default().extend(paths);
        self
    }

    /// Set the input directory
    pub fn with_input_directory(mut self, dir: PathBuf) -> Self {
        self.input_directory = Some(dir);
        self
    }
}

impl FolderRegistry for StaticFolderRegistry {
    fn folder_paths(&self) -> Vec<PathBuf> {
        self.folders.values().flatten().cloned().collect()
    }

    fn input_directory(&self) -> Option<PathBuf> {
        self.input_directory.clone()
    }
}

/// Canonicalized, existing root directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedRoots {
    roots: BTreeSet<PathBuf>,
}

impl TrustedRoots {
    /// Enumerate the registry plus input directory
    ///
    /// Entries that cannot be canonicalized or are not directories are
    /// dropped without error.
    pub fn collect(registry: &dyn FolderRegistry) -> Self {
        let roots = registry
            .folder_paths()
            .into_iter()
            .chain(registry.input_directory())
            .filter_map(|dir| match std::fs::canonicalize(&dir) {
                Ok(real) if real.is_dir() => Some(real),
                Ok(_) => None,
                Err(e) => {
                    tracing::trace!("Skipping registered directory {:?}: {}", dir, e);
                    None
                }
            })
            .collect();

        Self { roots }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(|root| root.as_path())
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Root containing an already canonical path, if any
    pub fn root_of(&self, path: &Path) -> Option<&Path> {
        self.iter().find(|root| path.starts_with(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_roots_dropped() {
        let temp = TempDir::new().unwrap();
        let registry = StaticFolderRegistry::default()
            .with_folder("checkpoints", vec![temp.path().to_path_buf()])
            .with_folder("loras", vec![temp.path().join("does-not-exist")]);

        let roots = TrustedRoots::collect(&registry);
        assert_eq!(roots.len(), 1);
        let canonical = std::fs::canonicalize(temp.path()).unwrap();
        assert_eq!(roots.iter().next(), Some(canonical.as_path()));
    }

    #[test]
    fn test_input_directory_included_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input");
        std::fs::create_dir(&input).unwrap();

        let registry = StaticFolderRegistry::default()
            .with_folder("a", vec![input.clone()])
            .with_folder("b", vec![input.join(".")])
            .with_input_directory(input.clone());

        let roots = TrustedRoots::collect(&registry);
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_file_is_not_a_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("model.ckpt");
        std::fs::write(&file, b"x").unwrap();

        let registry = StaticFolderRegistry::default().with_folder("checkpoints", vec![file]);
        assert!(TrustedRoots::collect(&registry).is_empty());
    }

    #[test]
    fn test_root_of() {
        let temp = TempDir::new().unwrap();
        let registry = StaticFolderRegistry::default()
            .with_folder("checkpoints", vec![temp.path().to_path_buf()]);
        let roots = TrustedRoots::collect(&registry);
        let canonical = std::fs::canonicalize(temp.path()).unwrap();

        assert!(roots.root_of(&canonical.join("x/y.png")).is_some());
        assert!(roots.root_of(Path::new("/definitely/elsewhere")).is_none());
    }
}
