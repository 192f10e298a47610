//! Media Path Resolution
//!
//! Maps caller-supplied relative paths onto files inside the trusted root
//! set and picks the media file that should be previewed for them:
//! - Traversal gate that runs before any filesystem access
//! - Symlink-aware containment check against every trusted root
//! - Extension classification (`model`, `image`, `video`, `audio`)
//! - Sibling preview lookup for model artifacts

mod category;
mod error;
mod resolver;
mod roots;

pub use category::{classify, Category, SupportedExtensions, EXTENSION_TABLE};
pub use error::ResolveError;
pub use resolver::{check_relative_path, MediaFile, PathResolver, ResolvedFile};
pub use roots::{FolderRegistry, StaticFolderRegistry, TrustedRoots};
