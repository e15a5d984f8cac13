//! Persisted application settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for tunesync
///
/// A single persisted setting: the root of the music library
/// (`Artist/Album/*.mp3`). Everything else is per-process state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root folder of the music library
    pub library_root: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tunesync").join("config.json"))
    }

    /// Load config from disk, falling back to defaults if not found
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save config to disk
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            std::fs::write(&path, content)?;
        }
        Ok(())
    }
}
