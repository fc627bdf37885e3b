// src/fs/browser.rs
//! Directory listing for the file browser pane.

use std::fs;
use std::path::{Path, PathBuf};

use super::detection::{detect_category, FileCategory};

/// One row of the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub category: FileCategory,
}

impl Entry {
    pub fn is_audio(&self) -> bool {
        !self.is_dir && self.category == FileCategory::Audio
    }
}

/// List `dir`: directories first, then files, each sorted case-insensitively.
///
/// An unreadable directory yields an empty list.
pub fn load_entries(dir: &Path) -> Vec<Entry> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            log::warn!("cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut entries: Vec<Entry> = read
        .filter_map(Result::ok)
        .map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let path = e.path();
            if path.is_dir() {
                Entry {
                    name,
                    is_dir: true,
                    category: FileCategory::Other,
                }
            } else {
                Entry {
                    name,
                    is_dir: false,
                    category: detect_category(&path),
                }
            }
        })
        .collect();

    entries.sort_by_key(|e| (!e.is_dir, e.name.to_lowercase()));
    entries
}

/// The last `n` components of `path`, for compact titles.
pub fn tail_path(path: &Path, n: usize) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .filter(|s| s != "/")
        .collect();
    let start = parts.len().saturating_sub(n);
    let tail = parts[start..].join("/");
    if start > 0 {
        format!(".../{tail}")
    } else {
        tail
    }
}

/// Resolve a browser entry to a full path.
pub fn entry_path(dir: &Path, entry: &Entry) -> PathBuf {
    dir.join(&entry.name)
}
