//! Path resolver
//!
//! Resolution order:
//! 1. Traversal gate on the raw string (no filesystem access)
//! 2. Join with each trusted root and canonicalize
//! 3. Drop candidates that left their root after symlink resolution
//! 4. First existing regular file wins

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::category::{classify, Category};
use super::error::ResolveError;
use super::roots::{FolderRegistry, TrustedRoots};
use crate::core::utils::{get_extension, get_filename, get_stem, is_regular_file};

/// A verified file inside a trusted root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    path: PathBuf,
    root: PathBuf,
}

impl ResolvedFile {
    /// Canonical absolute path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical trusted root the file was found under
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn category(&self) -> Option<Category> {
        classify(&self.path)
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// A playable file chosen for preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub category: Category,
}

/// Reject paths that could leave a trusted root before touching the disk
///
/// The `..` check is a plain substring test, so names such as `a..b.png`
/// are rejected too.
pub fn check_relative_path(relative: &str) -> Result<&str, ResolveError> {
    if relative.trim().is_empty() {
        return Err(ResolveError::EmptyPath);
    }

    let unsafe_path = relative.contains("..")
        || relative.starts_with('/')
        || relative.starts_with('\\')
        || Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir));

    if unsafe_path {
        return Err(ResolveError::UnsafePath {
            path: relative.to_string(),
        });
    }

    Ok(relative)
}

/// errno values for a lookup that dead-ends under one root: ENOTDIR when a
/// path segment is a regular file, ELOOP for a symlink cycle
#[cfg(any(target_os = "linux", target_os = "android"))]
const DEAD_END_ERRNOS: &[i32] = &[20, 40];
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
const DEAD_END_ERRNOS: &[i32] = &[20, 62];
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
const DEAD_END_ERRNOS: &[i32] = &[];

/// Whether a canonicalize failure means "not under this root" rather than a
/// filesystem fault. Dead ends move on to the next root.
fn is_dead_end(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
        || err
            .raw_os_error()
            .is_some_and(|code| DEAD_END_ERRNOS.contains(&code))
}

/// Resolves relative paths against the folder registry
pub struct PathResolver {
    registry: Arc<dyn FolderRegistry>,
}

impl PathResolver {
    pub fn new(registry: Arc<dyn FolderRegistry>) -> Self {
        Self { registry }
    }

    /// Current trusted roots, recomputed from the registry
    pub fn trusted_roots(&self) -> TrustedRoots {
        TrustedRoots::collect(self.registry.as_ref())
    }

    /// Resolve a relative path to a regular file inside a trusted root
    ///
    /// Root order is unspecified. When several roots hold the same relative
    /// path, callers must not rely on which one wins.
    pub fn resolve(&self, relative: &str) -> Result<ResolvedFile, ResolveError> {
        let relative = check_relative_path(relative)?;

        let roots = self.trusted_roots();
        for root in roots.iter() {
            let candidate = root.join(relative);
            let real = match std::fs::canonicalize(&candidate) {
                Ok(real) => real,
                Err(e) if is_dead_end(&e) => continue,
                Err(e) => {
                    tracing::warn!("Error finding path for {}: {}", relative, e);
                    return Err(ResolveError::Io {
                        path: relative.to_string(),
                        source: e,
                    });
                }
            };

            if !real.starts_with(root) {
                tracing::warn!(
                    "Candidate {:?} escapes trusted root {:?}, skipping",
                    real,
                    root
                );
                continue;
            }

            if is_regular_file(&real) {
                return Ok(ResolvedFile {
                    path: real,
                    root: root.to_path_buf(),
                });
            }
        }

        Err(ResolveError::NoMatch {
            path: relative.to_string(),
        })
    }

    /// Find preview media sharing a model artifact's stem
    ///
    /// Probe order is the tie-break policy: categories image, video, audio;
    /// extensions in table order; `<stem>.<ext>` before `<stem>.preview.<ext>`.
    /// So `model.png` beats `model.preview.png`, and any image beats any
    /// audio file. Siblings that resolve outside the model's root are skipped.
    pub fn find_sibling_media(&self, file: &ResolvedFile) -> Option<MediaFile> {
        let parent = file.path().parent()?;
        let stem = get_stem(file.path())?;

        for category in Category::MEDIA {
            for ext in category.extensions() {
                let candidates = [
                    parent.join(format!("{}.{}", stem, ext)),
                    parent.join(format!("{}.preview.{}", stem, ext)),
                ];

                for candidate in candidates {
                    if !is_regular_file(&candidate) {
                        continue;
                    }
                    match std::fs::canonicalize(&candidate) {
                        Ok(real) if real.starts_with(file.root()) => {
                            return Some(MediaFile {
                                path: real,
                                category,
                            });
                        }
                        Ok(real) => {
                            tracing::warn!(
                                "Preview {:?} resolves outside {:?}, skipping",
                                real,
                                file.root()
                            );
                        }
                        Err(e) => {
                            tracing::debug!("Cannot canonicalize {:?}: {}", candidate, e);
                        }
                    }
                }
            }
        }

        None
    }

    /// Resolve a relative path to the media file that previews it
    ///
    /// Media files preview themselves; model artifacts defer to
    /// [`find_sibling_media`](Self::find_sibling_media).
    pub fn resolve_media(&self, relative: &str) -> Result<MediaFile, ResolveError> {
        let resolved = self.resolve(relative)?;

        match resolved.category() {
            Some(Category::Model) => {
                self.find_sibling_media(&resolved)
                    .ok_or_else(|| ResolveError::NoPreview {
                        path: relative.to_string(),
                    })
            }
            Some(category) => Ok(MediaFile {
                path: resolved.into_path(),
                category,
            }),
            None => {
                let extension = get_extension(resolved.path());
                tracing::debug!("Unsupported file {}", get_filename(resolved.path()));
                Err(ResolveError::Unsupported {
                    path: relative.to_string(),
                    extension,
                })
            }
        }
    }
}
