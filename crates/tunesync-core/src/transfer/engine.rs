//! The transfer engine: sequential copy loop with progress and cancellation

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::library::Album;
use crate::transfer::{
    ProgressCallback, TransferMode, TransferProgress, TransferResult,
};
use crate::volume::{EraseConfirmer, VolumeManager};

/// Everything one transfer call needs
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Albums in transfer order
    pub albums: Vec<Album>,
    /// Destination root directory
    pub destination: std::path::PathBuf,
    /// Append to or erase the destination first
    pub mode: TransferMode,
    /// New volume label applied after an erase
    pub label: Option<String>,
}

/// Destination state after preparation
enum Prepared {
    /// Copying may begin; carries any non-fatal preparation warning
    Ready { warning: Option<String> },
    /// The user declined the erase; nothing was touched
    Aborted,
}

/// Outcome of the copy loop itself
enum CopyOutcome {
    Completed,
    Cancelled,
}

/// Copies albums track by track, in order, emitting progress events and
/// honoring a shared cancellation flag.
///
/// Copies are strictly sequential: one track at a time, albums in selection
/// order, tracks in album order. That trades throughput for deterministic
/// progress and two well-defined cancellation checkpoints (before each
/// album, before each track).
pub struct TransferEngine {
    progress_callback: Option<ProgressCallback>,
    cancel: Arc<AtomicBool>,
}

impl TransferEngine {
    /// Create a new engine with a fresh cancellation token
    pub fn new() -> Self {
        Self {
            progress_callback: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the progress callback
    ///
    /// The callback runs on the copy loop's thread and must be cheap; slow
    /// consumers should hand events off to a channel.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Share an externally owned cancellation token
    pub fn with_cancellation(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = token;
        self
    }

    /// Handle to the cancellation token; set it to stop the transfer at the
    /// next checkpoint
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run a transfer to completion, cancellation, or failure.
    ///
    /// Precondition violations (no albums, no destination) are errors;
    /// everything after that point is reported through [`TransferResult`].
    pub fn transfer(
        &self,
        request: &TransferRequest,
        volumes: &VolumeManager,
        confirmer: &dyn EraseConfirmer,
    ) -> Result<TransferResult> {
        if request.albums.is_empty() {
            return Err(Error::EmptySelection);
        }
        if request.destination.as_os_str().is_empty() {
            return Err(Error::NoDestination);
        }

        // A stale cancel request from an earlier transfer must not abort
        // this one.
        self.cancel.store(false, Ordering::SeqCst);

        let warning = match self.prepare_destination(request, volumes, confirmer) {
            Ok(Prepared::Ready { warning }) => warning,
            Ok(Prepared::Aborted) => return Ok(TransferResult::cancelled("erase cancelled")),
            Err(e) => return Ok(TransferResult::failed(e.to_string())),
        };

        let total: usize = request.albums.iter().map(|a| a.tracks.len()).sum();
        tracing::info!(
            "Transferring {} albums ({} tracks) to {}",
            request.albums.len(),
            total,
            request.destination.display()
        );

        match self.copy_albums(request, total) {
            Ok(CopyOutcome::Completed) => Ok(TransferResult::success(warning)),
            Ok(CopyOutcome::Cancelled) => {
                tracing::info!("Transfer cancelled by user");
                Ok(TransferResult::cancelled("transfer cancelled"))
            }
            Err(e) => {
                tracing::error!("Transfer failed: {}", e);
                Ok(TransferResult::failed(e.to_string()))
            }
        }
    }

    /// Drive the destination through the preparation steps for the mode
    fn prepare_destination(
        &self,
        request: &TransferRequest,
        volumes: &VolumeManager,
        confirmer: &dyn EraseConfirmer,
    ) -> Result<Prepared> {
        match request.mode {
            TransferMode::Append => Ok(Prepared::Ready { warning: None }),
            TransferMode::Erase => {
                if !confirmer.confirm_erase(&request.destination) {
                    tracing::info!("Erase declined for {}", request.destination.display());
                    return Ok(Prepared::Aborted);
                }
                let report = volumes.erase(&request.destination, request.label.as_deref())?;
                tracing::info!(
                    "Erased {} entries from {} ({} failed)",
                    report.removed,
                    request.destination.display(),
                    report.failed.len()
                );
                Ok(Prepared::Ready {
                    warning: report.warning,
                })
            }
        }
    }

    /// The sequential copy loop
    fn copy_albums(&self, request: &TransferRequest, total: usize) -> Result<CopyOutcome> {
        let mut copied = 0usize;
        let mut last_percent: i32 = -1;

        for album in &request.albums {
            if self.cancellation_requested() {
                return Ok(CopyOutcome::Cancelled);
            }

            let album_dir = request.destination.join(&album.album);
            fs::create_dir_all(&album_dir)?;
            tracing::debug!("Copying {} to {}", album.display_name(), album_dir.display());

            for track in &album.tracks {
                if self.cancellation_requested() {
                    return Ok(CopyOutcome::Cancelled);
                }

                fs::copy(album.path.join(track), album_dir.join(track))?;
                copied += 1;

                let percent = if total == 0 {
                    100
                } else {
                    ((copied as f64 / total as f64) * 100.0).round() as u8
                };

                // Track event: one per copied track, unconditionally.
                self.emit(TransferProgress {
                    percent_complete: percent,
                    track_file_name: Some(track.clone()),
                    track_index: copied,
                    total_tracks: total,
                    album_name: Some(album.album.clone()),
                });

                // Percent event: only when the rounded value changes, so a
                // large library does not flood the listener.
                if i32::from(percent) != last_percent {
                    last_percent = i32::from(percent);
                    self.emit(TransferProgress {
                        percent_complete: percent,
                        track_file_name: None,
                        track_index: copied,
                        total_tracks: total,
                        album_name: None,
                    });
                }
            }
        }

        // Final event: exactly 100, no track in flight.
        self.emit(TransferProgress {
            percent_complete: 100,
            track_file_name: None,
            track_index: total,
            total_tracks: total,
            album_name: None,
        });

        Ok(CopyOutcome::Completed)
    }

    /// Check the shared flag, resetting it when a cancellation is honored so
    /// it cannot leak into a later transfer
    fn cancellation_requested(&self) -> bool {
        if self.cancel.load(Ordering::SeqCst) {
            self.cancel.store(false, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    fn emit(&self, progress: TransferProgress) {
        if let Some(ref callback) = self.progress_callback {
            callback(progress);
        }
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}
