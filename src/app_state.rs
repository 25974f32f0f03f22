//! Explicit application-state container.
//!
//! One serializable struct replaces scattered view-layer fields: the current
//! view, the loaded store snapshot, the search query, and playback state.
//! All transitions are pure mutations testable without a rendering surface;
//! the active display list is derived, never stored.

use serde::{Deserialize, Serialize};

use crate::records::{FolderSource, Playlist, Song};

pub const DEFAULT_VOLUME: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Library,
    Playlists,
    Folders,
    PlaylistDetail,
}

/// Transport and session playback fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_song_id: Option<String>,
    pub is_playing: bool,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub volume: f64,
    pub shuffle: bool,
    pub repeat: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_song_id: None,
            is_playing: false,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    pub view: View,
    pub selected_playlist_id: Option<String>,
    pub search_query: String,
    pub songs: Vec<Song>,
    pub playlists: Vec<Playlist>,
    pub folders: Vec<FolderSource>,
    pub playback: PlaybackState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Library,
            selected_playlist_id: None,
            search_query: String::new(),
            songs: Vec::new(),
            playlists: Vec::new(),
            folders: Vec::new(),
            playback: PlaybackState::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the top-level view, dropping any playlist selection.
    pub fn set_view(&mut self, view: View) {
        self.view = view;
        if view != View::PlaylistDetail {
            self.selected_playlist_id = None;
        }
    }

    pub fn open_playlist(&mut self, playlist_id: &str) {
        self.view = View::PlaylistDetail;
        self.selected_playlist_id = Some(playlist_id.to_string());
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    /// Replaces the loaded snapshot with fresh store truth.
    pub fn apply_snapshot(
        &mut self,
        songs: Vec<Song>,
        folders: Vec<FolderSource>,
        playlists: Vec<Playlist>,
    ) {
        self.songs = songs;
        self.folders = folders;
        self.playlists = playlists;
    }

    pub fn song_by_id(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub fn selected_playlist(&self) -> Option<&Playlist> {
        let id = self.selected_playlist_id.as_deref()?;
        self.playlists.iter().find(|playlist| playlist.id == id)
    }

    /// Library songs matching the search query, case-insensitively on name
    /// or artist. An empty query matches everything.
    pub fn filtered_songs(&self) -> Vec<&Song> {
        let query = self.search_query.to_lowercase();
        self.songs
            .iter()
            .filter(|song| {
                song.name.to_lowercase().contains(&query)
                    || song.artist.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// The active display list: the selected playlist's members in stored
    /// order (dangling ids filtered out), or the filtered library.
    pub fn display_songs(&self) -> Vec<&Song> {
        if self.view == View::PlaylistDetail {
            if let Some(playlist) = self.selected_playlist() {
                return playlist
                    .song_ids
                    .iter()
                    .filter_map(|id| self.song_by_id(id))
                    .collect();
            }
        }
        self.filtered_songs()
    }

    pub fn set_current_song(&mut self, song_id: &str) {
        self.playback.current_song_id = Some(song_id.to_string());
        self.playback.is_playing = true;
        self.playback.position_seconds = 0.0;
        self.playback.duration_seconds = 0.0;
    }

    pub fn set_playing(&mut self, is_playing: bool) {
        self.playback.is_playing = is_playing;
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.playback.shuffle = !self.playback.shuffle;
        self.playback.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.playback.repeat = !self.playback.repeat;
        self.playback.repeat
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.playback.volume = volume.clamp(0.0, 1.0);
    }

    /// Applies an engine progress tick. Duration flows into the current
    /// song's in-memory record; it is never persisted back.
    pub fn apply_time_update(&mut self, position_seconds: f64, duration_seconds: f64) {
        self.playback.position_seconds = position_seconds;
        self.playback.duration_seconds = duration_seconds;
        if let Some(current_id) = self.playback.current_song_id.clone() {
            if let Some(song) = self.songs.iter_mut().find(|song| song.id == current_id) {
                song.duration = duration_seconds;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str, name: &str, artist: &str) -> Song {
        Song {
            id: id.to_string(),
            name: name.to_string(),
            file_name: format!("{}.mp3", name),
            path: format!("Music/{}.mp3", name),
            artist: artist.to_string(),
            album: "Local Album".to_string(),
            duration: 0.0,
            folder_id: "f1".to_string(),
            content: None,
        }
    }

    fn playlist(id: &str, song_ids: &[&str]) -> Playlist {
        Playlist {
            id: id.to_string(),
            name: id.to_string(),
            song_ids: song_ids.iter().map(|s| s.to_string()).collect(),
            created_at: 0,
        }
    }

    fn state_with_songs() -> AppState {
        let mut state = AppState::new();
        state.apply_snapshot(
            vec![
                song("s1", "Blue Sky", "Unknown Artist"),
                song("s2", "Red Moon", "Nightband"),
                song("s3", "Skyline", "Unknown Artist"),
            ],
            vec![],
            vec![playlist("p1", &["s3", "s1", "ghost"])],
        );
        state
    }

    #[test]
    fn defaults_match_session_start() {
        let state = AppState::new();
        assert_eq!(state.view, View::Library);
        assert_eq!(state.playback.volume, DEFAULT_VOLUME);
        assert!(!state.playback.shuffle);
        assert!(!state.playback.repeat);
        assert!(state.playback.current_song_id.is_none());
    }

    #[test]
    fn search_matches_name_or_artist_case_insensitively() {
        let mut state = state_with_songs();

        state.set_search_query("sky");
        let names: Vec<&str> = state.filtered_songs().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Sky", "Skyline"]);

        state.set_search_query("NIGHTBAND");
        let names: Vec<&str> = state.filtered_songs().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Red Moon"]);

        state.set_search_query("");
        assert_eq!(state.filtered_songs().len(), 3);
    }

    #[test]
    fn playlist_view_displays_members_in_stored_order() {
        let mut state = state_with_songs();
        state.open_playlist("p1");

        let ids: Vec<&str> = state.display_songs().iter().map(|s| s.id.as_str()).collect();
        // stored order, dangling "ghost" filtered out
        assert_eq!(ids, vec!["s3", "s1"]);
    }

    #[test]
    fn leaving_playlist_detail_clears_selection() {
        let mut state = state_with_songs();
        state.open_playlist("p1");
        assert_eq!(state.selected_playlist_id.as_deref(), Some("p1"));

        state.set_view(View::Library);
        assert!(state.selected_playlist_id.is_none());
        assert_eq!(state.display_songs().len(), 3);
    }

    #[test]
    fn time_update_flows_duration_into_current_song_only() {
        let mut state = state_with_songs();
        state.set_current_song("s2");
        state.apply_time_update(12.5, 180.0);

        assert_eq!(state.playback.position_seconds, 12.5);
        assert_eq!(state.song_by_id("s2").expect("song exists").duration, 180.0);
        assert_eq!(state.song_by_id("s1").expect("song exists").duration, 0.0);
    }

    #[test]
    fn volume_is_clamped() {
        let mut state = AppState::new();
        state.set_volume(1.7);
        assert_eq!(state.playback.volume, 1.0);
        state.set_volume(-0.2);
        assert_eq!(state.playback.volume, 0.0);
    }
}
