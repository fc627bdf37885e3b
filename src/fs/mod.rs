// src/fs/mod.rs
//! Filesystem module - directory browsing and file type detection.

pub mod browser;
pub mod detection;

// Re-export commonly used types
pub use browser::{entry_path, load_entries, tail_path, Entry};
pub use detection::{detect_category, FileCategory};
