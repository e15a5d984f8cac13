//! Removable volume enumeration, destination selection, and erase

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A mounted removable volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume display name (the mount directory name)
    pub name: String,
    /// Mount path
    pub path: PathBuf,
}

/// Destructive-action confirmation collaborator (a native dialog, a TUI
/// prompt, ...). Affirmation must be the non-default choice.
pub trait EraseConfirmer {
    /// Ask the user to confirm erasing everything on `drive`
    fn confirm_erase(&self, drive: &Path) -> bool;
}

/// Directory-chooser collaborator, used as the destination fallback when no
/// removable volume is selected. `None` means the user cancelled.
pub trait FolderPicker {
    /// Ask the user to pick a destination directory
    fn pick_folder(&self) -> Option<PathBuf>;
}

/// Result of erasing a volume
///
/// Erase is best-effort across top-level entries: individual failures are
/// recorded and skipped. A failed post-erase rename only produces `warning`.
#[derive(Debug, Default)]
pub struct EraseReport {
    /// Number of top-level entries removed
    pub removed: usize,
    /// Entries that could not be removed, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// Non-fatal warning (e.g. the volume rename failed)
    pub warning: Option<String>,
}

/// Manages the removable-media root, volume listing, and the selected
/// destination for the current process.
///
/// The selected destination lives here as an explicit field rather than in
/// process-global state, scoped to whatever session owns the manager.
pub struct VolumeManager {
    media_root: Option<PathBuf>,
    selected: Option<PathBuf>,
}

impl VolumeManager {
    /// Create a manager rooted at the platform's removable-media location
    pub fn new() -> Self {
        Self {
            media_root: detect_media_root(),
            selected: None,
        }
    }

    /// Create a manager with an explicit media root (tests, embedding)
    pub fn with_media_root(root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: Some(root.into()),
            selected: None,
        }
    }

    fn media_root(&self) -> Result<&Path> {
        self.media_root.as_deref().ok_or(Error::UnsupportedPlatform)
    }

    /// List mounted volumes: directories directly under the media root.
    /// Entries that cannot be stat'd are silently skipped.
    pub fn list_volumes(&self) -> Result<Vec<Volume>> {
        let root = self.media_root()?;

        let mut volumes: Vec<Volume> = fs::read_dir(root)?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| Volume {
                name: e.file_name().to_string_lossy().to_string(),
                path: e.path(),
            })
            .collect();
        volumes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(volumes)
    }

    /// Set or clear the selected destination.
    ///
    /// Clearing always succeeds. Setting validates the path lies under the
    /// media root and leaves the previous selection untouched on failure.
    pub fn set_selected(&mut self, path: Option<PathBuf>) -> Result<()> {
        match path {
            None => {
                self.selected = None;
                Ok(())
            }
            Some(p) => {
                let validated = self.validate_drive_path(&p)?;
                self.selected = Some(validated);
                Ok(())
            }
        }
    }

    /// Currently selected destination, if any
    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Normalize a path and check it lies strictly under the media root
    fn validate_drive_path(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidDrivePath("drive path is empty".to_string()));
        }

        let root = self.media_root()?;
        let normalized = normalize(path);
        if normalized.starts_with(root) && normalized != root {
            Ok(normalized)
        } else {
            Err(Error::InvalidDrivePath(format!(
                "{} is not under {}",
                normalized.display(),
                root.display()
            )))
        }
    }

    /// Delete every top-level entry on the volume, then optionally relabel it.
    ///
    /// Fails fast if `path` is not a valid drive path; after that, per-entry
    /// failures are logged and skipped. A rename failure does not invalidate
    /// the erase and is reported only through [`EraseReport::warning`].
    pub fn erase(&self, path: &Path, label: Option<&str>) -> Result<EraseReport> {
        let target = self.validate_drive_path(path)?;
        tracing::info!("Erasing all contents of {}", target.display());

        let mut report = EraseReport::default();
        for entry in fs::read_dir(&target)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Unreadable entry under {}: {}", target.display(), e);
                    continue;
                }
            };
            let entry_path = entry.path();
            let removal = entry.file_type().and_then(|file_type| {
                if file_type.is_dir() {
                    fs::remove_dir_all(&entry_path)
                } else {
                    fs::remove_file(&entry_path)
                }
            });
            match removal {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    tracing::warn!("Could not remove {}: {}", entry_path.display(), e);
                    report.failed.push((entry_path, e.to_string()));
                }
            }
        }

        if let Some(label) = label {
            if let Err(e) = rename_volume(&target, label) {
                tracing::warn!("Could not rename {} to \"{}\": {}", target.display(), label, e);
                report.warning = Some(format!(
                    "Volume erased, but renaming to \"{}\" failed: {}",
                    label, e
                ));
            }
        }

        Ok(report)
    }
}

impl Default for VolumeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Lexically normalize a path: fold `.` and resolve `..` upward
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Where mounted removable volumes appear on this platform
fn detect_media_root() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let volumes = PathBuf::from("/Volumes");
        if volumes.is_dir() {
            return Some(volumes);
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(user) = std::env::var("USER") {
            for base in ["/run/media", "/media"] {
                let candidate = Path::new(base).join(&user);
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
        let media = PathBuf::from("/media");
        if media.is_dir() {
            return Some(media);
        }
    }

    None
}

/// Rename a mounted volume after an erase
#[cfg(target_os = "macos")]
fn rename_volume(path: &Path, label: &str) -> std::io::Result<()> {
    let status = std::process::Command::new("diskutil")
        .arg("rename")
        .arg(path)
        .arg(label)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("diskutil exited with {}", status),
        ))
    }
}

#[cfg(not(target_os = "macos"))]
fn rename_volume(_path: &Path, _label: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "volume renaming is not supported on this platform",
    ))
}
