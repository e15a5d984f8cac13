//! Scan a music library laid out as `Artist/Album/*.mp3`

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::library::album::Album;
use crate::media;

/// The one recognized music file extension (matched case-insensitively)
pub const MUSIC_EXTENSION: &str = "mp3";

/// Progress callback for scanning: (current, total, artist folder name)
pub type ScanProgress = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Result of one scan invocation
///
/// Unreadable subtrees never abort a scan; they are collected in `skipped`
/// so callers can see which branches were dropped and why.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// All albums with at least one recognized music file
    pub albums: Vec<Album>,
    /// Subtrees that could not be read, with the reason
    pub skipped: Vec<SkippedDir>,
}

impl ScanReport {
    fn merge(&mut self, other: ScanReport) {
        self.albums.extend(other.albums);
        self.skipped.extend(other.skipped);
    }
}

/// A directory that was skipped during a scan
#[derive(Debug, Clone)]
pub struct SkippedDir {
    /// Path of the unreadable directory
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Scanner for a two-level `Artist/Album` music library
pub struct LibraryScanner {
    root: PathBuf,
    extract_covers: bool,
}

impl LibraryScanner {
    /// Create a new scanner for the given library root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extract_covers: true,
        }
    }

    /// Skip cover-art extraction for faster scans
    pub fn without_covers(mut self) -> Self {
        self.extract_covers = false;
        self
    }

    /// Scan the library sequentially
    pub fn scan(&self) -> Result<ScanReport> {
        self.scan_with_progress(None)
    }

    /// Scan the library sequentially with a progress callback
    pub fn scan_with_progress(&self, progress: Option<ScanProgress>) -> Result<ScanReport> {
        let artist_dirs = self.artist_dirs()?;
        let total = artist_dirs.len();

        let mut report = ScanReport::default();
        for (idx, dir) in artist_dirs.iter().enumerate() {
            if let Some(ref cb) = progress {
                let name = dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                cb(idx + 1, total, &name);
            }
            self.scan_artist(dir, &mut report);
        }

        finish(&mut report);
        Ok(report)
    }

    /// Scan the library with one rayon task per artist subtree
    ///
    /// Subtree errors are still collected, never raised, exactly as in the
    /// sequential scan.
    pub fn scan_parallel(&self) -> Result<ScanReport> {
        let artist_dirs = self.artist_dirs()?;

        let parts: Vec<ScanReport> = artist_dirs
            .par_iter()
            .map(|dir| {
                let mut part = ScanReport::default();
                self.scan_artist(dir, &mut part);
                part
            })
            .collect();

        let mut report = ScanReport::default();
        for part in parts {
            report.merge(part);
        }

        finish(&mut report);
        tracing::info!("Scan found {} albums under {}", report.albums.len(), self.root.display());
        Ok(report)
    }

    /// Enumerate artist directories under the library root
    ///
    /// A failure here (missing or unreadable root) is fatal to the scan.
    fn artist_dirs(&self) -> Result<Vec<PathBuf>> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::NotConfigured);
        }
        if !self.root.exists() {
            return Err(Error::PathNotFound(self.root.clone()));
        }

        let mut dirs: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.path())
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    /// Scan one artist subtree, appending albums and skipped branches
    fn scan_artist(&self, artist_dir: &Path, report: &mut ScanReport) {
        let artist = artist_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let album_dirs = match fs::read_dir(artist_dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
                .map(|e| e.path()),
            Err(e) => {
                tracing::warn!("Could not read artist folder {}: {}", artist_dir.display(), e);
                report.skipped.push(SkippedDir {
                    path: artist_dir.to_path_buf(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        for album_dir in album_dirs {
            match self.scan_album(&artist, &album_dir) {
                Ok(Some(album)) => report.albums.push(album),
                Ok(None) => {} // no music files, not an error
                Err(e) => {
                    tracing::warn!("Could not read album folder {}: {}", album_dir.display(), e);
                    report.skipped.push(SkippedDir {
                        path: album_dir,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Scan one album directory; `None` means no recognized music files
    fn scan_album(&self, artist: &str, dir: &Path) -> Result<Option<Album>> {
        let mut tracks = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && is_music_file(entry.path()) {
                tracks.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        if tracks.is_empty() {
            return Ok(None);
        }

        // A track that disappears between listing and stat just drops out
        // of the size total; the album itself survives.
        let mut total_size_bytes = 0u64;
        for name in &tracks {
            match fs::metadata(dir.join(name)) {
                Ok(meta) => total_size_bytes += meta.len(),
                Err(e) => {
                    tracing::debug!("Could not stat {} in {}: {}", name, dir.display(), e);
                }
            }
        }

        let modified = fs::metadata(dir)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::UNIX_EPOCH);

        let cover_art = if self.extract_covers {
            tracks.first().and_then(|name| media::extract_cover(&dir.join(name)))
        } else {
            None
        };

        Ok(Some(Album {
            artist: artist.to_string(),
            album: dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            path: dir.to_path_buf(),
            tracks,
            total_size_bytes,
            modified,
            cover_art,
        }))
    }
}

/// Order the final catalog by path so results are deterministic
fn finish(report: &mut ScanReport) {
    report.albums.sort_by(|a, b| a.path.cmp(&b.path));
    report.skipped.sort_by(|a, b| a.path.cmp(&b.path));
}

/// Check whether a path has the recognized music extension
fn is_music_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(MUSIC_EXTENSION))
        .unwrap_or(false)
}
