//! Headless command implementations

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tunesync_core::utils::format_bytes;
use tunesync_core::{
    sort_albums, Album, Config, EraseConfirmer, LibraryScanner, SortKey, TransferEngine,
    TransferMode, TransferOutcome, TransferProgress, TransferRequest, VolumeManager,
};

pub fn scan(sort: &str, json: bool) -> Result<()> {
    let report = LibraryScanner::new(configured_root()?)
        .without_covers()
        .scan_parallel()?;

    for skipped in &report.skipped {
        eprintln!("warning: skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    let mut albums = report.albums;
    sort_albums(&mut albums, parse_sort(sort)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&albums)?);
        return Ok(());
    }

    for album in &albums {
        println!(
            "{:<50} {:>3} tracks  {:>9}  {}",
            album.display_name(),
            album.track_count(),
            format_bytes(album.total_size_bytes),
            album.modified.format("%Y-%m-%d")
        );
    }
    println!("Found {} albums", albums.len());
    Ok(())
}

pub fn volumes(json: bool) -> Result<()> {
    let volumes = VolumeManager::new().list_volumes()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&volumes)?);
    } else if volumes.is_empty() {
        println!("No removable volumes mounted");
    } else {
        for volume in &volumes {
            println!("{:<24} {}", volume.name, volume.path.display());
        }
    }
    Ok(())
}

pub fn set_library(path: PathBuf) -> Result<()> {
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }

    let mut config = Config::load();
    config.library_root = Some(path.clone());
    config.save().context("failed to save config")?;

    println!("Library root set to {}", path.display());
    Ok(())
}

pub fn transfer(
    names: &[String],
    drive: Option<PathBuf>,
    erase: bool,
    label: Option<String>,
    yes: bool,
) -> Result<()> {
    let report = LibraryScanner::new(configured_root()?)
        .without_covers()
        .scan_parallel()?;
    let albums = select_albums(report.albums, names)?;
    if albums.is_empty() {
        bail!("the library contains no albums");
    }

    let mut manager = VolumeManager::new();
    let destination = match drive {
        Some(path) => path,
        None => sole_volume(&manager)?,
    };
    manager.set_selected(Some(destination.clone()))?;
    tracing::debug!("Resolved destination to {}", destination.display());

    let total_bytes: u64 = albums.iter().map(|a| a.total_size_bytes).sum();
    println!(
        "Transferring {} albums ({}) to {}",
        albums.len(),
        format_bytes(total_bytes),
        destination.display()
    );

    let engine = TransferEngine::new().with_progress_callback(Box::new(print_progress));
    let request = TransferRequest {
        albums,
        destination,
        mode: if erase { TransferMode::Erase } else { TransferMode::Append },
        label,
    };

    let result = engine.transfer(&request, &manager, &StdinConfirmer { assume_yes: yes })?;
    println!();
    if let Some(warning) = &result.warning {
        eprintln!("warning: {}", warning);
    }

    match result.outcome {
        TransferOutcome::Success => {
            println!("Transfer complete");
            Ok(())
        }
        TransferOutcome::Cancelled => {
            println!("{}", result.message.as_deref().unwrap_or("Transfer cancelled"));
            Ok(())
        }
        TransferOutcome::Failed => {
            bail!("transfer failed: {}", result.message.as_deref().unwrap_or("unknown error"))
        }
    }
}

fn configured_root() -> Result<PathBuf> {
    Config::load().library_root.ok_or_else(|| {
        anyhow!("music library folder is not configured (run `tunesync set-library <path>`)")
    })
}

fn parse_sort(sort: &str) -> Result<SortKey> {
    match sort {
        "modified" => Ok(SortKey::Modified),
        "artist" => Ok(SortKey::Artist),
        "album" => Ok(SortKey::Album),
        other => bail!("unknown sort key: {} (expected modified, artist, or album)", other),
    }
}

fn sole_volume(manager: &VolumeManager) -> Result<PathBuf> {
    let volumes = manager.list_volumes()?;
    match volumes.as_slice() {
        [only] => Ok(only.path.clone()),
        [] => bail!("no removable volumes mounted; pass --drive <path>"),
        many => {
            let names: Vec<_> = many.iter().map(|v| v.name.as_str()).collect();
            bail!("multiple volumes mounted ({}); pass --drive <path>", names.join(", "))
        }
    }
}

fn select_albums(albums: Vec<Album>, names: &[String]) -> Result<Vec<Album>> {
    if names.is_empty() {
        return Ok(albums);
    }

    let mut selected: Vec<Album> = Vec::new();
    for name in names {
        let matched = albums
            .iter()
            .find(|a| a.album == *name || format!("{}/{}", a.artist, a.album) == *name)
            .cloned()
            .ok_or_else(|| anyhow!("album not found in library: {}", name))?;
        if !selected.iter().any(|s| s.path == matched.path) {
            selected.push(matched);
        }
    }
    Ok(selected)
}

fn print_progress(progress: TransferProgress) {
    if let Some(track) = progress.track_file_name.as_deref() {
        print!(
            "\r[{:>3}%] {}/{} {}",
            progress.percent_complete, progress.track_index, progress.total_tracks, track
        );
        let _ = io::stdout().flush();
    }
}

/// Interactive erase confirmation; declining is the default answer
struct StdinConfirmer {
    assume_yes: bool,
}

impl EraseConfirmer for StdinConfirmer {
    fn confirm_erase(&self, drive: &Path) -> bool {
        if self.assume_yes {
            return true;
        }

        print!(
            "Erase ALL contents of {}? This cannot be undone. [y/N] ",
            drive.display()
        );
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn album(artist: &str, name: &str) -> Album {
        Album {
            artist: artist.to_string(),
            album: name.to_string(),
            path: PathBuf::from(format!("/music/{}/{}", artist, name)),
            tracks: vec!["01.mp3".to_string()],
            total_size_bytes: 0,
            modified: Utc::now(),
            cover_art: None,
        }
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("modified").unwrap(), SortKey::Modified);
        assert_eq!(parse_sort("artist").unwrap(), SortKey::Artist);
        assert_eq!(parse_sort("album").unwrap(), SortKey::Album);
        assert!(parse_sort("size").is_err());
    }

    #[test]
    fn test_select_albums_by_name_and_qualified_name() {
        let catalog = vec![album("A", "One"), album("B", "Two")];

        let picked = select_albums(catalog.clone(), &["Two".to_string()]).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].album, "Two");

        let picked = select_albums(catalog.clone(), &["A/One".to_string()]).unwrap();
        assert_eq!(picked[0].album, "One");

        assert!(select_albums(catalog, &["Missing".to_string()]).is_err());
    }

    #[test]
    fn test_select_albums_preserves_argument_order_and_dedupes() {
        let catalog = vec![album("A", "One"), album("B", "Two")];

        let picked = select_albums(
            catalog,
            &["Two".to_string(), "One".to_string(), "Two".to_string()],
        )
        .unwrap();

        let order: Vec<_> = picked.iter().map(|a| a.album.as_str()).collect();
        assert_eq!(order, ["Two", "One"]);
    }

    #[test]
    fn test_select_albums_empty_selection_takes_all() {
        let catalog = vec![album("A", "One"), album("B", "Two")];
        let picked = select_albums(catalog, &[]).unwrap();
        assert_eq!(picked.len(), 2);
    }
}
