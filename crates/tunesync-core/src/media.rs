//! Cover art extraction from music file tags

use std::path::Path;

use lofty::{Probe, TaggedFileExt};

use crate::library::CoverArt;

/// Extract the embedded cover image from a music file, if there is one.
///
/// Only the first picture of the primary (else first) tag is used. Any parse
/// failure yields `None`; a broken file must never abort a library scan.
pub fn extract_cover(path: &Path) -> Option<CoverArt> {
    match try_extract(path) {
        Ok(cover) => cover,
        Err(e) => {
            tracing::debug!("No cover art from {}: {}", path.display(), e);
            None
        }
    }
}

fn try_extract(path: &Path) -> Result<Option<CoverArt>, lofty::error::LoftyError> {
    let tagged_file = Probe::open(path)?.read()?;
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    let Some(tag) = tag else {
        return Ok(None);
    };
    let Some(picture) = tag.pictures().first() else {
        return Ok(None);
    };

    let mime_type = picture
        .mime_type()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "image/jpeg".to_string());

    Ok(Some(CoverArt {
        mime_type,
        data: picture.data().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_none() {
        assert!(extract_cover(Path::new("/nonexistent/track.mp3")).is_none());
    }

    #[test]
    fn test_garbage_file_yields_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("noise.mp3");
        fs::write(&path, b"this is not an mpeg stream at all").unwrap();

        assert!(extract_cover(&path).is_none());
    }

    #[test]
    fn test_empty_file_yields_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.mp3");
        fs::write(&path, b"").unwrap();

        assert!(extract_cover(&path).is_none());
    }
}
