//! Process-facing facade for a UI layer
//!
//! Each operation mirrors one bridge call of the presentation layer and
//! returns a structured success/failure value; no filesystem error escapes
//! unhandled. The selected destination and the cancellation flag live here
//! as session state, shared with the transfer engine by reference.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::library::{Album, CoverArt, LibraryScanner};
use crate::transfer::{
    ProgressCallback, TransferEngine, TransferMode, TransferRequest, TransferResult,
};
use crate::volume::{EraseConfirmer, FolderPicker, Volume, VolumeManager};

/// Structured response for every session operation
#[derive(Debug, Serialize)]
pub struct Response<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    /// User-facing message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Response<T> {
    /// Successful response carrying a payload
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            message: None,
        }
    }

    /// Successful response with nothing to return
    pub fn acknowledged() -> Self {
        Self {
            success: true,
            payload: None,
            message: None,
        }
    }

    /// Failed response with a user-facing message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            message: Some(message.into()),
        }
    }
}

/// Album record shaped for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct AlbumPayload {
    /// Artist folder name
    pub artist: String,
    /// Album folder name
    pub album: String,
    /// Absolute album path (the album's identity)
    pub path: PathBuf,
    /// Number of tracks
    pub track_count: usize,
    /// Total size of all tracks in bytes
    pub total_size_bytes: u64,
    /// Album folder modification time
    pub modified: DateTime<Utc>,
    /// Cover art as a `data:` URL, if embedded in the first track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art: Option<String>,
}

impl AlbumPayload {
    fn from_album(album: &Album) -> Self {
        Self {
            artist: album.artist.clone(),
            album: album.album.clone(),
            path: album.path.clone(),
            track_count: album.track_count(),
            total_size_bytes: album.total_size_bytes,
            modified: album.modified,
            cover_art: album.cover_art.as_ref().map(cover_data_url),
        }
    }
}

fn cover_data_url(cover: &CoverArt) -> String {
    format!("data:{};base64,{}", cover.mime_type, STANDARD.encode(&cover.data))
}

/// One UI-facing session: configuration, volume state, and the shared
/// cancellation flag for the transfer in flight.
///
/// A single transfer is assumed in flight at a time; callers serialize
/// transfer requests.
pub struct Session {
    config: Config,
    volumes: VolumeManager,
    cancel: Arc<AtomicBool>,
}

impl Session {
    /// Create a session using the platform volume manager
    pub fn new(config: Config) -> Self {
        Self::with_volume_manager(config, VolumeManager::new())
    }

    /// Create a session with an explicit volume manager (tests, embedding)
    pub fn with_volume_manager(config: Config, volumes: VolumeManager) -> Self {
        Self {
            config,
            volumes,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Scan the configured library root and return the album catalog
    pub fn scan(&self) -> Response<Vec<AlbumPayload>> {
        let root = match self.config.library_root.as_ref() {
            Some(root) => root.clone(),
            None => return Response::err(Error::NotConfigured.to_string()),
        };

        match LibraryScanner::new(root).scan_parallel() {
            Ok(report) => {
                for skipped in &report.skipped {
                    tracing::warn!("Scan skipped {}: {}", skipped.path.display(), skipped.reason);
                }
                if report.albums.is_empty() {
                    return Response::err(
                        "No albums found. Make sure your folder structure is: \
                         Music > Artist > Album > MP3 files",
                    );
                }
                Response::ok(report.albums.iter().map(AlbumPayload::from_album).collect())
            }
            Err(e) => Response::err(e.to_string()),
        }
    }

    /// List mounted removable volumes
    pub fn list_volumes(&self) -> Response<Vec<Volume>> {
        match self.volumes.list_volumes() {
            Ok(volumes) => Response::ok(volumes),
            Err(e) => Response::err(e.to_string()),
        }
    }

    /// Set or clear the selected destination volume
    pub fn select_destination(&mut self, path: Option<PathBuf>) -> Response<()> {
        match self.volumes.set_selected(path) {
            Ok(()) => Response::acknowledged(),
            Err(e) => Response::err(e.to_string()),
        }
    }

    /// Read the selected destination; always succeeds
    pub fn selected_destination(&self) -> Response<Option<PathBuf>> {
        Response::ok(self.volumes.selected().map(Path::to_path_buf))
    }

    /// Request cancellation of the in-flight transfer; always acknowledged
    pub fn request_cancel(&self) -> Response<()> {
        self.cancel.store(true, Ordering::SeqCst);
        Response::acknowledged()
    }

    /// Run a transfer of `albums` to the selected volume, falling back to
    /// the folder picker when none is selected.
    ///
    /// Streams progress through `on_progress`, then resolves to a
    /// [`TransferResult`]; every error is folded into a `Failed` outcome.
    pub fn transfer(
        &self,
        albums: &[Album],
        mode: TransferMode,
        label: Option<String>,
        on_progress: Option<ProgressCallback>,
        picker: &dyn FolderPicker,
        confirmer: &dyn EraseConfirmer,
    ) -> TransferResult {
        let destination = match self.volumes.selected() {
            Some(path) => path.to_path_buf(),
            None => match picker.pick_folder() {
                Some(path) => path,
                None => return TransferResult::failed(Error::NoDestination.to_string()),
            },
        };

        let mut engine = TransferEngine::new().with_cancellation(Arc::clone(&self.cancel));
        if let Some(callback) = on_progress {
            engine = engine.with_progress_callback(callback);
        }

        let request = TransferRequest {
            albums: albums.to_vec(),
            destination,
            mode,
            label,
        };

        match engine.transfer(&request, &self.volumes, confirmer) {
            Ok(result) => result,
            Err(e) => TransferResult::failed(e.to_string()),
        }
    }
}
