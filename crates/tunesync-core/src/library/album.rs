//! Album data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Embedded cover art pulled from a track's tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverArt {
    /// MIME type of the image (e.g. `image/jpeg`)
    pub mime_type: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

/// One album folder discovered by a library scan
///
/// Identity is the absolute `path`; records are immutable once produced and
/// replaced wholesale by the next scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    /// Artist folder name
    pub artist: String,
    /// Album folder name
    pub album: String,
    /// Absolute path of the album folder
    pub path: PathBuf,
    /// Track file names, in listing order
    pub tracks: Vec<String>,
    /// Sum of the sizes of all stat-accessible track files
    pub total_size_bytes: u64,
    /// Modification time of the album folder
    pub modified: DateTime<Utc>,
    /// Cover art embedded in the first track, if any
    pub cover_art: Option<CoverArt>,
}

impl Album {
    /// Number of tracks in the album
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// "Artist - Album" display string
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.album)
    }
}

/// Sort order for presenting a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently modified first
    #[default]
    Modified,
    /// By artist name
    Artist,
    /// By album name
    Album,
}

/// Sort a catalog for display, tie-breaking by path so the order is
/// deterministic for equal keys.
pub fn sort_albums(albums: &mut [Album], key: SortKey) {
    match key {
        SortKey::Modified => {
            albums.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)))
        }
        SortKey::Artist => {
            albums.sort_by(|a, b| a.artist.cmp(&b.artist).then_with(|| a.path.cmp(&b.path)))
        }
        SortKey::Album => {
            albums.sort_by(|a, b| a.album.cmp(&b.album).then_with(|| a.path.cmp(&b.path)))
        }
    }
}
