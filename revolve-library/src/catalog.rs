//! Track catalog - the import collaborator
//!
//! Builds [`Track`] values from a music folder. The core only ever consumes
//! the resulting shape; file-format details stay in the loader.

use std::path::{Path, PathBuf};

use crate::loader::{probe_metadata, sidecar_art};

/// File extensions accepted by the importer
pub const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "flac", "wav", "ogg", "aac"];

/// An importable track
///
/// Immutable once created. `path` must point at a decodable audio file;
/// if it does not, playback degrades to a no-op rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub path: PathBuf,
    pub album_art: Option<PathBuf>,
}

impl Track {
    /// Build a track from a file path, probing tags and sidecar art
    ///
    /// Metadata failures fall back to the filename; this never blocks
    /// import.
    pub fn from_path(path: PathBuf) -> Self {
        let metadata = probe_metadata(&path);
        let album_art = sidecar_art(&path);
        Self {
            title: metadata.title,
            artist: metadata.artist,
            path,
            album_art,
        }
    }
}

/// Import every decodable audio file from a directory (non-recursive)
///
/// Unreadable directories yield an empty catalog; the failure is logged
/// and the next import attempt starts fresh.
pub fn import_dir(dir: &Path) -> Vec<Track> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "import folder unreadable");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| is_audio_file(p))
        .collect();
    paths.sort();

    paths.into_iter().map(Track::from_path).collect()
}

fn is_audio_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                AUDIO_EXTENSIONS.iter().any(|a| *a == ext)
            })
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_extension_filter() {
        assert!(!is_audio_file(Path::new("/music/readme.txt")));
        assert!(!is_audio_file(Path::new("/music/noext")));
        // Existence is checked too, so a plausible name still fails here.
        assert!(!is_audio_file(Path::new("/music/missing.mp3")));
    }

    #[test]
    fn test_import_missing_dir_is_empty() {
        let tracks = import_dir(Path::new("/no/such/folder"));
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_track_from_unreadable_path_uses_filename() {
        let track = Track::from_path(PathBuf::from("/missing/late night drive.mp3"));
        assert_eq!(track.title, "late night drive");
        assert_eq!(track.artist, "Unknown Artist");
        assert!(track.album_art.is_none());
    }
}
