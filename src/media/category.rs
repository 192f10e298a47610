//! Extension classification table

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::utils::get_extension;

/// Coarse content classification derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Model,
    Image,
    Video,
    Audio,
}

/// Static extension table, in lookup order.
///
/// `webm` is registered for both video and audio. Classification returns the
/// first match (video); sibling lookup probes it in both slots.
pub const EXTENSION_TABLE: [(Category, &[&str]); 4] = [
    (Category::Model, &["ckpt", "safetensors", "pt", "pth", "gguf"]),
    (Category::Image, &["jpg", "jpeg", "bmp", "png", "webp", "gif"]),
    (Category::Video, &["mp4", "webm"]),
    (Category::Audio, &["ogg", "wav", "mp3", "webm"]),
];

impl Category {
    /// Playable categories in sibling-lookup priority order
    pub const MEDIA: [Category; 3] = [Category::Image, Category::Video, Category::Audio];

    /// Wire name used in JSON responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Model => "model",
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
        }
    }

    /// Extensions registered for this category, in table order
    pub fn extensions(&self) -> &'static [&'static str] {
        EXTENSION_TABLE
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, exts)| *exts)
            .unwrap_or(&[])
    }

    /// Whether files of this category can be streamed to a player
    pub fn is_media(&self) -> bool {
        !matches!(self, Category::Model)
    }

    /// Look up an extension (case-insensitive, leading dot optional)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            return None;
        }
        EXTENSION_TABLE
            .iter()
            .find(|(_, exts)| exts.contains(&ext.as_str()))
            .map(|(category, _)| *category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file by its lower-cased extension
pub fn classify(path: &Path) -> Option<Category> {
    Category::from_extension(&get_extension(path))
}

/// Wire form of the extension table
///
/// Field order matches table order so clients see `model` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedExtensions {
    pub model: &'static [&'static str],
    pub image: &'static [&'static str],
    pub video: &'static [&'static str],
    pub audio: &'static [&'static str],
}

impl SupportedExtensions {
    pub fn table() -> Self {
        Self {
            model: Category::Model.extensions(),
            image: Category::Image.extensions(),
            video: Category::Video.extensions(),
            audio: Category::Audio.extensions(),
        }
    }
}
