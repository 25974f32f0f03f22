//! Persisted record types and their transient companions.
//!
//! Everything the store holds round-trips through serde_json; fields that
//! only exist for the lifetime of a session (content handles) are skipped
//! during serialization and come back as `None` after a reload.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque session-only reference to a song's playable byte content.
///
/// Handles are cheap to clone and never persisted; a record reloaded from
/// the store has no usable handle.
#[derive(Clone)]
pub struct ContentHandle(Arc<Vec<u8>>);

impl ContentHandle {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentHandle")
            .field("len", &self.0.len())
            .finish()
    }
}

/// One file-like item delivered by the folder-selection collaborator.
#[derive(Debug, Clone)]
pub struct FileItem {
    /// Original filename including extension.
    pub file_name: String,
    /// Path relative to the selected directory, '/'-separated.
    pub relative_path: String,
    /// MIME-style type hint, may be empty.
    pub media_type: String,
    pub content: ContentHandle,
}

/// A single indexed audio track's metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    /// Display title, filename with the last extension segment stripped.
    pub name: String,
    pub file_name: String,
    pub path: String,
    pub artist: String,
    pub album: String,
    /// Seconds. 0 at ingestion; populated at runtime from engine time
    /// updates and never persisted back.
    pub duration: f64,
    /// Back-reference to the owning folder. Advisory only, the store does
    /// not enforce it.
    pub folder_id: String,
    #[serde(skip)]
    pub content: Option<ContentHandle>,
}

/// One indexing batch's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderSource {
    pub id: String,
    pub name: String,
}

/// A user-named ordered set of song references.
///
/// `song_ids` order is the playlist track order. Entries are not validated
/// against existing songs; dangling ids are filtered out at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub song_ids: Vec<String>,
    /// Epoch milliseconds, immutable.
    pub created_at: u64,
}
