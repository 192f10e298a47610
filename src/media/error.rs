//! Resolution failure reasons
//!
//! Every variant means "not found" to the caller. The distinction only
//! feeds logging.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Empty path")]
    EmptyPath,

    #[error("Unsafe relative path rejected: {path}")]
    UnsafePath { path: String },

    #[error("No trusted root contains a file at: {path}")]
    NoMatch { path: String },

    #[error("Unsupported file type '{extension}' for: {path}")]
    Unsupported { path: String, extension: String },

    #[error("No preview media next to model: {path}")]
    NoPreview { path: String },

    #[error("IO error while resolving {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Whether this miss came from a filesystem fault rather than absence
    pub fn is_io(&self) -> bool {
        matches!(self, ResolveError::Io { .. })
    }

    /// Whether the input was rejected by the traversal gate
    pub fn is_rejected(&self) -> bool {
        matches!(self, ResolveError::EmptyPath | ResolveError::UnsafePath { .. })
    }
}
