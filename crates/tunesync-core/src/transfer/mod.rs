//! Ordered, cancellable album transfer to a destination volume

mod engine;

pub use engine::{TransferEngine, TransferRequest};

use serde::{Deserialize, Serialize};

/// How the destination is prepared before copying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransferMode {
    /// Write into the destination without touching existing contents
    #[default]
    Append,
    /// Delete all destination contents (with confirmation) before writing
    Erase,
}

/// One progress event emitted during a transfer
///
/// Events with a track name identify the file just copied; events without
/// one carry a fresh percent value. The last event of a successful transfer
/// always has `percent_complete == 100` and no track name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferProgress {
    /// Overall completion, 0..=100
    pub percent_complete: u8,
    /// File name of the track just copied, if this is a track event
    pub track_file_name: Option<String>,
    /// Global 1-based index of the last copied track
    pub track_index: usize,
    /// Total tracks across all albums in the transfer
    pub total_tracks: usize,
    /// Album the track belongs to, if this is a track event
    pub album_name: Option<String>,
}

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(TransferProgress) + Send + Sync>;

/// Terminal state of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferOutcome {
    /// Every track was copied
    Success,
    /// Stopped by the user; already-copied files stay in place
    Cancelled,
    /// Aborted by an I/O failure; already-copied files stay in place
    Failed,
}

/// Result of a transfer call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResult {
    /// Terminal state
    pub outcome: TransferOutcome,
    /// Failure or cancellation detail
    pub message: Option<String>,
    /// Non-fatal warning (e.g. the post-erase rename failed)
    pub warning: Option<String>,
}

impl TransferResult {
    /// A successful transfer, optionally carrying a warning
    pub fn success(warning: Option<String>) -> Self {
        Self {
            outcome: TransferOutcome::Success,
            message: None,
            warning,
        }
    }

    /// A user-cancelled transfer
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self {
            outcome: TransferOutcome::Cancelled,
            message: Some(message.into()),
            warning: None,
        }
    }

    /// A failed transfer
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            outcome: TransferOutcome::Failed,
            message: Some(message.into()),
            warning: None,
        }
    }

    /// Whether the transfer completed fully
    pub fn is_success(&self) -> bool {
        self.outcome == TransferOutcome::Success
    }

    /// Whether the transfer was stopped by the user
    pub fn is_cancelled(&self) -> bool {
        self.outcome == TransferOutcome::Cancelled
    }
}
