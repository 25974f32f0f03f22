//! Playlist construction and membership mutation.
//!
//! Mutations here are pure; callers persist the full updated record and
//! reload. Deleting a playlist never touches song records.

use uuid::Uuid;

use crate::records::Playlist;

/// Builds a new empty playlist, refusing empty or whitespace-only names.
pub fn new_playlist(name: &str, created_at: u64) -> Option<Playlist> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(Playlist {
        id: Uuid::new_v4().to_string(),
        name: trimmed.to_string(),
        song_ids: Vec::new(),
        created_at,
    })
}

/// Appends a song id to the playlist unless it is already a member.
///
/// Returns whether the playlist changed, so callers can skip the persist on
/// a no-op.
pub fn add_member(playlist: &mut Playlist, song_id: &str) -> bool {
    if playlist.song_ids.iter().any(|id| id == song_id) {
        return false;
    }
    playlist.song_ids.push(song_id.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_name_is_refused() {
        assert!(new_playlist("  ", 0).is_none());
        assert!(new_playlist("", 0).is_none());
        assert!(new_playlist("\t\n", 0).is_none());
    }

    #[test]
    fn name_is_stored_trimmed() {
        let playlist = new_playlist("  Morning Mix  ", 1_700_000_000_000)
            .expect("non-empty name should be accepted");
        assert_eq!(playlist.name, "Morning Mix");
        assert!(playlist.song_ids.is_empty());
        assert_eq!(playlist.created_at, 1_700_000_000_000);
    }

    #[test]
    fn add_member_is_idempotent() {
        let mut playlist = new_playlist("Mix", 0).expect("playlist should build");

        assert!(add_member(&mut playlist, "song-1"));
        assert!(!add_member(&mut playlist, "song-1"));
        assert_eq!(playlist.song_ids, vec!["song-1".to_string()]);
    }

    #[test]
    fn add_member_preserves_insertion_order() {
        let mut playlist = new_playlist("Mix", 0).expect("playlist should build");
        add_member(&mut playlist, "b");
        add_member(&mut playlist, "a");
        add_member(&mut playlist, "c");
        assert_eq!(playlist.song_ids, vec!["b", "a", "c"]);
    }
}
