//! Library index builder.
//!
//! Consumes one batch of file-like items from the folder-selection
//! collaborator, filters it down to audio entries, synthesizes placeholder
//! metadata records, and commits them to the store: folder first, then the
//! songs as one progressive batch.
//!
//! Re-running an index over the same physical folder mints fresh ids for the
//! folder and every song; there is no deduplication against previously
//! indexed content.

use log::debug;
use uuid::Uuid;

use crate::db_manager::DbManager;
use crate::error::StoreError;
use crate::records::{FileItem, FolderSource, Song};

pub const SUPPORTED_AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "m4a", "flac"];

/// Display name used when the batch carries no usable path information.
pub const FALLBACK_FOLDER_NAME: &str = "Local Library";

/// Placeholder metadata; no tag extraction happens at ingestion.
pub const PLACEHOLDER_ARTIST: &str = "Unknown Artist";
pub const PLACEHOLDER_ALBUM: &str = "Local Album";

/// One indexing batch ready to be committed to the store.
#[derive(Debug, Clone)]
pub struct IndexedBatch {
    pub folder: FolderSource,
    pub songs: Vec<Song>,
}

fn extension(file_name: &str) -> Option<&str> {
    let dot = file_name.rfind('.')?;
    let ext = &file_name[dot + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Accepts an item iff its type hint is in the audio category or its
/// filename extension is on the allow-list, case-insensitively.
pub fn is_supported_audio_item(item: &FileItem) -> bool {
    if item.media_type.starts_with("audio/") {
        return true;
    }
    extension(&item.file_name)
        .map(|ext| {
            SUPPORTED_AUDIO_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Strips the last extension segment from a filename, if it has one.
pub fn strip_last_extension(file_name: &str) -> &str {
    match extension(file_name) {
        Some(ext) if !ext.contains('/') => &file_name[..file_name.len() - ext.len() - 1],
        _ => file_name,
    }
}

/// Folder display name: the top-level segment of the first item's relative
/// path, or the fallback literal when it carries none.
fn folder_display_name(first_item: &FileItem) -> String {
    match first_item.relative_path.split('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => FALLBACK_FOLDER_NAME.to_string(),
    }
}

/// Builds a folder record plus one song record per accepted item.
///
/// An empty batch is refused outright (no folder is created). A non-empty
/// batch in which every item is rejected still produces the folder record,
/// with zero songs. Rejected items are dropped silently at the API level.
pub fn build_batch(items: &[FileItem]) -> Option<IndexedBatch> {
    let first_item = items.first()?;

    let folder = FolderSource {
        id: Uuid::new_v4().to_string(),
        name: folder_display_name(first_item),
    };

    let mut songs = Vec::new();
    for item in items {
        if !is_supported_audio_item(item) {
            debug!("Skipping non-audio item: {}", item.file_name);
            continue;
        }
        songs.push(Song {
            id: Uuid::new_v4().to_string(),
            name: strip_last_extension(&item.file_name).to_string(),
            file_name: item.file_name.clone(),
            path: item.relative_path.clone(),
            artist: PLACEHOLDER_ARTIST.to_string(),
            album: PLACEHOLDER_ALBUM.to_string(),
            duration: 0.0,
            folder_id: folder.id.clone(),
            content: Some(item.content.clone()),
        });
    }

    Some(IndexedBatch { folder, songs })
}

/// Persists the folder record, then the song batch.
pub fn commit_batch(db_manager: &DbManager, batch: &IndexedBatch) -> Result<(), StoreError> {
    db_manager.save_folder(&batch.folder)?;
    db_manager.save_songs(&batch.songs)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ContentHandle;

    fn item(file_name: &str, relative_path: &str, media_type: &str) -> FileItem {
        FileItem {
            file_name: file_name.to_string(),
            relative_path: relative_path.to_string(),
            media_type: media_type.to_string(),
            content: ContentHandle::new(vec![0u8; 4]),
        }
    }

    #[test]
    fn filters_to_audio_entries_only() {
        let batch = build_batch(&[
            item("a.mp3", "Music/a.mp3", ""),
            item("b.txt", "Music/b.txt", "text/plain"),
            item("c.FLAC", "Music/c.FLAC", ""),
        ])
        .expect("non-empty batch should build");

        assert_eq!(batch.songs.len(), 2);
        assert_eq!(batch.songs[0].name, "a");
        assert_eq!(batch.songs[1].name, "c");
        assert_eq!(batch.songs[1].file_name, "c.FLAC");
    }

    #[test]
    fn audio_type_hint_accepts_unknown_extension() {
        let batch = build_batch(&[item("weird.xyz", "Music/weird.xyz", "audio/x-custom")])
            .expect("non-empty batch should build");
        assert_eq!(batch.songs.len(), 1);
        assert_eq!(batch.songs[0].name, "weird");
    }

    #[test]
    fn empty_batch_is_refused() {
        assert!(build_batch(&[]).is_none());
    }

    #[test]
    fn all_rejected_batch_still_creates_the_folder() {
        let batch = build_batch(&[item("notes.txt", "Docs/notes.txt", "text/plain")])
            .expect("non-empty batch should build");
        assert_eq!(batch.folder.name, "Docs");
        assert!(batch.songs.is_empty());
    }

    #[test]
    fn folder_name_comes_from_top_path_segment_with_fallback() {
        let named = build_batch(&[item("a.mp3", "My Tunes/sub/a.mp3", "")])
            .expect("batch should build");
        assert_eq!(named.folder.name, "My Tunes");

        let fallback = build_batch(&[item("a.mp3", "", "")]).expect("batch should build");
        assert_eq!(fallback.folder.name, FALLBACK_FOLDER_NAME);
    }

    #[test]
    fn songs_carry_placeholder_metadata_and_folder_back_reference() {
        let batch = build_batch(&[item("track.m4a", "Music/track.m4a", "")])
            .expect("batch should build");
        let song = &batch.songs[0];
        assert_eq!(song.artist, PLACEHOLDER_ARTIST);
        assert_eq!(song.album, PLACEHOLDER_ALBUM);
        assert_eq!(song.duration, 0.0);
        assert_eq!(song.folder_id, batch.folder.id);
        assert_eq!(song.path, "Music/track.m4a");
        assert!(song.content.is_some());
    }

    #[test]
    fn extension_stripping_keeps_inner_dots() {
        assert_eq!(strip_last_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_last_extension("noext"), "noext");
        assert_eq!(strip_last_extension("trailing."), "trailing.");
    }

    #[test]
    fn reindexing_mints_fresh_identifiers() {
        let items = [item("a.mp3", "Music/a.mp3", "")];
        let first = build_batch(&items).expect("batch should build");
        let second = build_batch(&items).expect("batch should build");

        assert_ne!(first.folder.id, second.folder.id);
        assert_ne!(first.songs[0].id, second.songs[0].id);
    }

    #[test]
    fn commit_persists_folder_then_songs() {
        let db = DbManager::new_in_memory().expect("failed to create in-memory db");
        let batch = build_batch(&[
            item("a.mp3", "Music/a.mp3", ""),
            item("b.wav", "Music/b.wav", ""),
        ])
        .expect("batch should build");

        commit_batch(&db, &batch).expect("commit failed");

        assert_eq!(db.get_folders().expect("folders read failed").len(), 1);
        assert_eq!(db.get_all_songs().expect("songs read failed").len(), 2);
    }
}
