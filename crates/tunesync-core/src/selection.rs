//! The user's ordered album selection
//!
//! Insertion order is transfer order. An album can appear at most once,
//! identified by its path.

use std::path::Path;

use crate::library::Album;

/// Ordered, duplicate-free set of albums queued for transfer
#[derive(Debug, Default)]
pub struct Selection {
    albums: Vec<Album>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an album; returns false if it is already selected
    pub fn add(&mut self, album: &Album) -> bool {
        if self.contains(&album.path) {
            return false;
        }
        self.albums.push(album.clone());
        true
    }

    /// Remove an album by path; returns whether it was present
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.albums.len();
        self.albums.retain(|a| a.path != path);
        self.albums.len() != before
    }

    /// Add the album if absent, remove it if present; returns whether it is
    /// selected afterwards
    pub fn toggle(&mut self, album: &Album) -> bool {
        if self.remove(&album.path) {
            false
        } else {
            self.albums.push(album.clone());
            true
        }
    }

    /// Move the album at `from` to position `to`, shifting the rest
    pub fn move_to(&mut self, from: usize, to: usize) {
        if from >= self.albums.len() || to >= self.albums.len() {
            return;
        }
        let album = self.albums.remove(from);
        self.albums.insert(to, album);
    }

    /// Drop every selected album
    pub fn clear(&mut self) {
        self.albums.clear();
    }

    /// Whether an album with this path is selected
    pub fn contains(&self, path: &Path) -> bool {
        self.albums.iter().any(|a| a.path == path)
    }

    /// Selected albums in transfer order
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    /// Number of selected albums
    pub fn len(&self) -> usize {
        self.albums.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Running total of the selected albums' sizes
    pub fn total_size_bytes(&self) -> u64 {
        self.albums.iter().map(|a| a.total_size_bytes).sum()
    }
}
