//! # tunesync-core
//!
//! Core library for transferring albums from a local music library onto a
//! removable drive.
//!
//! This crate provides the foundational functionality for:
//! - Scanning an `Artist/Album/*.mp3` library into an album catalog
//! - Extracting embedded cover art from track tags
//! - Enumerating removable volumes and managing the selected destination,
//!   including destructive erase with optional relabeling
//! - Executing an ordered, cancellable, progress-reporting bulk copy
//!
//! ## Modules
//!
//! - [`config`] - The persisted library-root setting
//! - [`error`] - Error types and Result alias
//! - [`library`] - Album catalog and the library scanner
//! - [`media`] - Cover-art extraction from music file tags
//! - [`selection`] - The user's ordered album selection
//! - [`session`] - UI-facing facade with structured responses
//! - [`transfer`] - The transfer engine, progress events, and results
//! - [`volume`] - Removable volume listing, selection, and erase
//!
//! ## Example
//!
//! ```no_run
//! use tunesync_core::LibraryScanner;
//!
//! let report = LibraryScanner::new("/home/user/Music")
//!     .scan()
//!     .expect("Failed to scan");
//! println!("Found {} albums", report.albums.len());
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod library;
pub mod media;
pub mod selection;
pub mod session;
pub mod transfer;
pub mod utils;
pub mod volume;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Configuration
pub use config::Config;

// Library scanning
pub use library::{
    sort_albums, Album, CoverArt, LibraryScanner, ScanProgress, ScanReport, SkippedDir, SortKey,
};

// Selection state
pub use selection::Selection;

// Session facade
pub use session::{AlbumPayload, Response, Session};

// Transfer engine
pub use transfer::{
    ProgressCallback, TransferEngine, TransferMode, TransferOutcome, TransferProgress,
    TransferRequest, TransferResult,
};

// Volume management
pub use volume::{EraseConfirmer, EraseReport, FolderPicker, Volume, VolumeManager};
