//! Utility functions
//!
//! Path helpers used by classification and sibling lookup.

use std::path::Path;

/// Extract file extension from path (lowercase, no leading dot)
pub fn get_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// Extract the file stem (name without its last extension)
pub fn get_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|s| s.to_string())
}

/// Extract filename from path
pub fn get_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Whether `path` exists and is a regular file (symlinks followed)
///
/// Any metadata error, including permission problems, counts as "no".
pub fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension(Path::new("model.SafeTensors")), "safetensors");
        assert_eq!(get_extension(Path::new("clip.preview.MP4")), "mp4");
        assert_eq!(get_extension(Path::new("no_extension")), "");
        assert_eq!(get_extension(Path::new(".hidden")), "");
    }

    #[test]
    fn test_get_stem() {
        assert_eq!(get_stem(Path::new("dir/model.ckpt")), Some("model".to_string()));
        assert_eq!(get_stem(Path::new("a.b.pt")), Some("a.b".to_string()));
        assert_eq!(get_stem(Path::new("plain")), Some("plain".to_string()));
    }

    #[test]
    fn test_get_filename() {
        assert_eq!(get_filename(Path::new("/x/y/photo.jpg")), "photo.jpg");
    }

    #[test]
    fn test_is_regular_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.png");
        std::fs::write(&file, b"png").unwrap();

        assert!(is_regular_file(&file));
        assert!(!is_regular_file(temp.path()));
        assert!(!is_regular_file(&temp.path().join("missing.png")));
    }
}
