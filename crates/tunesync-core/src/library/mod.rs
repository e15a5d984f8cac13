//! Music library scanning and the album catalog

mod album;
mod scanner;

pub use album::{sort_albums, Album, CoverArt, SortKey};
pub use scanner::{LibraryScanner, ScanProgress, ScanReport, SkippedDir, MUSIC_EXTENSION};
