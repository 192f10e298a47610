//! Content type selection for served media

use std::path::Path;

use crate::core::utils::get_extension;
use crate::media::Category;

/// Generic binary type
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type from the file extension alone
pub fn guess_content_type(path: &Path) -> Option<&'static str> {
    let content_type = match get_extension(path).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        _ => return None,
    };
    Some(content_type)
}

/// Per-category default when the extension is unknown
pub fn fallback_content_type(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Image) => "image/jpeg",
        Some(Category::Video) => "video/mp4",
        Some(Category::Audio) => "audio/mpeg",
        Some(Category::Model) | None => DEFAULT_CONTENT_TYPE,
    }
}

pub fn content_type_for(path: &Path, category: Option<Category>) -> &'static str {
    guess_content_type(path).unwrap_or_else(|| fallback_content_type(category))
}
