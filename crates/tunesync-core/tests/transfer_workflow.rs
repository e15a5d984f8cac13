//! Integration tests for the scan -> select -> transfer workflow.
//!
//! These tests drive the session facade end-to-end over a mock library and
//! a mock removable-media root.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tunesync_core::{
    Album, Config, EraseConfirmer, FolderPicker, LibraryScanner, ProgressCallback, Session,
    TransferEngine, TransferMode, TransferOutcome, TransferProgress, TransferRequest,
    VolumeManager,
};

/// Test fixture that creates a mock music library and a mock media root
/// with one mounted volume.
struct TestFixture {
    _temp_dir: TempDir,
    library: PathBuf,
    media_root: PathBuf,
    volume: PathBuf,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();

        let library = base.join("Music");
        let media_root = base.join("media");
        let volume = media_root.join("USB_DRIVE");

        fs::create_dir_all(&library).expect("Failed to create library dir");
        fs::create_dir_all(&volume).expect("Failed to create volume dir");

        Self {
            _temp_dir: temp_dir,
            library,
            media_root,
            volume,
        }
    }

    /// Creates an album folder with the given track files.
    fn create_album(&self, artist: &str, album: &str, tracks: &[&str]) {
        let dir = self.library.join(artist).join(album);
        fs::create_dir_all(&dir).expect("Failed to create album dir");
        for track in tracks {
            fs::write(dir.join(track), format!("{}/{}/{}", artist, album, track))
                .expect("Failed to write track");
        }
    }

    fn session(&self) -> Session {
        let config = Config {
            library_root: Some(self.library.clone()),
        };
        Session::with_volume_manager(config, VolumeManager::with_media_root(&self.media_root))
    }

    fn scan_albums(&self) -> Vec<Album> {
        LibraryScanner::new(&self.library)
            .scan()
            .expect("scan failed")
            .albums
    }
}

struct NoPicker;

impl FolderPicker for NoPicker {
    fn pick_folder(&self) -> Option<PathBuf> {
        None
    }
}

struct Confirm(bool);

impl EraseConfirmer for Confirm {
    fn confirm_erase(&self, _drive: &Path) -> bool {
        self.0
    }
}

fn collecting_callback() -> (ProgressCallback, Arc<Mutex<Vec<TransferProgress>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |progress| {
        sink.lock().unwrap().push(progress);
    });
    (callback, events)
}

#[test]
fn full_append_workflow_copies_selection_in_order() {
    let fixture = TestFixture::new();
    fixture.create_album("Kraftwerk", "Autobahn", &["01.mp3", "02.mp3", "03.mp3"]);
    fixture.create_album("Neu", "Neu 75", &["a.mp3", "b.mp3"]);
    fixture.create_album("Can", "Sleeve Notes", &["readme.txt"]); // excluded

    let mut session = fixture.session();

    // Scan through the facade
    let scan = session.scan();
    assert!(scan.success);
    assert_eq!(scan.payload.unwrap().len(), 2);

    // Select the mounted volume
    let volumes = session.list_volumes();
    assert!(volumes.success);
    let listed = volumes.payload.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "USB_DRIVE");
    assert!(session.select_destination(Some(listed[0].path.clone())).success);

    // Transfer both albums
    let albums = fixture.scan_albums();
    let (callback, events) = collecting_callback();
    let result = session.transfer(
        &albums,
        TransferMode::Append,
        None,
        Some(callback),
        &NoPicker,
        &Confirm(true),
    );

    assert!(result.is_success());

    let events = events.lock().unwrap();
    let track_events: Vec<_> = events.iter().filter(|e| e.track_file_name.is_some()).collect();
    assert_eq!(track_events.len(), 5);
    assert_eq!(events.last().unwrap().percent_complete, 100);
    assert!(events.last().unwrap().track_file_name.is_none());

    for name in ["01.mp3", "02.mp3", "03.mp3"] {
        let copied = fixture.volume.join("Autobahn").join(name);
        assert!(copied.is_file(), "missing {}", copied.display());
    }
    assert!(fixture.volume.join("Neu 75").join("a.mp3").is_file());
    // The zero-track album never produced a destination folder
    assert!(!fixture.volume.join("Sleeve Notes").exists());
}

#[test]
fn erase_workflow_replaces_volume_contents() {
    let fixture = TestFixture::new();
    fixture.create_album("Artist", "Fresh", &["1.mp3"]);
    fs::write(fixture.volume.join("leftover.mp3"), b"old").unwrap();
    fs::create_dir_all(fixture.volume.join("Old Album")).unwrap();

    let mut session = fixture.session();
    assert!(session.select_destination(Some(fixture.volume.clone())).success);

    let albums = fixture.scan_albums();
    let result = session.transfer(
        &albums,
        TransferMode::Erase,
        None,
        None,
        &NoPicker,
        &Confirm(true),
    );

    assert!(result.is_success());
    assert!(!fixture.volume.join("leftover.mp3").exists());
    assert!(!fixture.volume.join("Old Album").exists());
    assert!(fixture.volume.join("Fresh").join("1.mp3").is_file());
}

#[test]
fn declined_erase_leaves_volume_byte_for_byte_unchanged() {
    let fixture = TestFixture::new();
    fixture.create_album("Artist", "Unwanted", &["1.mp3"]);
    fs::write(fixture.volume.join("keep.mp3"), b"precious bytes").unwrap();

    let mut session = fixture.session();
    assert!(session.select_destination(Some(fixture.volume.clone())).success);

    let albums = fixture.scan_albums();
    let result = session.transfer(
        &albums,
        TransferMode::Erase,
        None,
        None,
        &NoPicker,
        &Confirm(false),
    );

    assert_eq!(result.outcome, TransferOutcome::Cancelled);
    assert_eq!(result.message.as_deref(), Some("erase cancelled"));
    assert_eq!(
        fs::read(fixture.volume.join("keep.mp3")).unwrap(),
        b"precious bytes"
    );
    assert!(!fixture.volume.join("Unwanted").exists());
}

#[test]
fn cancel_request_stops_transfer_between_albums() {
    let fixture = TestFixture::new();
    fixture.create_album("A", "First", &["1.mp3", "2.mp3", "3.mp3"]);
    fixture.create_album("B", "Second", &["1.mp3", "2.mp3"]);

    let mut session = fixture.session();
    assert!(session.select_destination(Some(fixture.volume.clone())).success);

    let albums = fixture.scan_albums();

    // The cancel request arrives while album one's last track is copying,
    // exactly as a concurrent UI click would.
    let session = Arc::new(session);
    let canceller = Arc::clone(&session);
    let callback: ProgressCallback = Box::new(move |progress: TransferProgress| {
        if progress.track_index == 3 && progress.track_file_name.is_some() {
            assert!(canceller.request_cancel().success);
        }
    });

    let result = session.transfer(
        &albums,
        TransferMode::Append,
        None,
        Some(callback),
        &NoPicker,
        &Confirm(true),
    );

    assert_eq!(result.outcome, TransferOutcome::Cancelled);
    assert_eq!(fs::read_dir(fixture.volume.join("First")).unwrap().count(), 3);
    assert!(!fixture.volume.join("Second").exists());
}

#[test]
fn append_twice_leaves_single_copy_of_each_file() {
    let fixture = TestFixture::new();
    fixture.create_album("Artist", "Twice", &["1.mp3", "2.mp3"]);

    let albums = fixture.scan_albums();
    let engine = TransferEngine::new();
    let volumes = VolumeManager::with_media_root(&fixture.media_root);
    let request = TransferRequest {
        albums,
        destination: fixture.volume.clone(),
        mode: TransferMode::Append,
        label: None,
    };

    for _ in 0..2 {
        let result = engine.transfer(&request, &volumes, &Confirm(true)).unwrap();
        assert!(result.is_success());
    }

    assert_eq!(fs::read_dir(fixture.volume.join("Twice")).unwrap().count(), 2);
}

#[test]
fn stale_cancel_before_transfer_does_not_leak_in() {
    let fixture = TestFixture::new();
    fixture.create_album("Artist", "Solo", &["1.mp3"]);

    let mut session = fixture.session();
    assert!(session.select_destination(Some(fixture.volume.clone())).success);

    // Cancel with nothing in flight, then transfer.
    assert!(session.request_cancel().success);

    let albums = fixture.scan_albums();
    let result = session.transfer(
        &albums,
        TransferMode::Append,
        None,
        None,
        &NoPicker,
        &Confirm(true),
    );

    assert!(result.is_success());
    assert!(fixture.volume.join("Solo").join("1.mp3").is_file());
}

#[test]
fn engine_resets_stale_token_at_transfer_start() {
    let fixture = TestFixture::new();
    fixture.create_album("Artist", "Looped", &["1.mp3", "2.mp3"]);

    let albums = fixture.scan_albums();
    let engine = TransferEngine::new();
    let token = engine.cancellation_token();
    token.store(true, Ordering::SeqCst);

    // The token was set before the transfer started, so the engine clears
    // it during its own reset and the transfer completes.
    let volumes = VolumeManager::with_media_root(&fixture.media_root);
    let request = TransferRequest {
        albums,
        destination: fixture.volume.clone(),
        mode: TransferMode::Append,
        label: None,
    };
    let result = engine.transfer(&request, &volumes, &Confirm(true)).unwrap();

    assert!(result.is_success());
    assert!(!token.load(Ordering::SeqCst));
}
