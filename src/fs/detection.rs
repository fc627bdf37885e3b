// src/fs/detection.rs
//! File type detection: magic numbers first, extension as a fallback.

use std::path::Path;

use infer::MatcherType;
use mime_guess::MimeGuess;

/// Coarse categories shown in the browser.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileCategory {
    Audio,
    Video,
    Image,
    Other,
}

impl FileCategory {
    fn from_mime(mime: &str) -> Self {
        match mime.split('/').next().unwrap_or_default() {
            "audio" => FileCategory::Audio,
            "video" => FileCategory::Video,
            "image" => FileCategory::Image,
            _ => FileCategory::Other,
        }
    }
}

/// Detect the category of the file at `path`.
///
/// Unreadable files are categorised from their extension alone.
pub fn detect_category(path: &Path) -> FileCategory {
    if let Ok(Some(kind)) = infer::get_from_path(path) {
        match kind.matcher_type() {
            MatcherType::Audio => return FileCategory::Audio,
            MatcherType::Video => return FileCategory::Video,
            MatcherType::Image => return FileCategory::Image,
            _ => {}
        }
    }

    let guess = MimeGuess::from_path(path);
    guess
        .first()
        .map(|mime| FileCategory::from_mime(mime.essence_str()))
        .unwrap_or(FileCategory::Other)
}
