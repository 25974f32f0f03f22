//! Event-bus protocol shared by all runtime components.
//!
//! This module defines all message payloads exchanged between the library
//! manager, the UI shell, and the external playback engine.

use crate::app_state::{PlaybackState, View};
use crate::records::{ContentHandle, FileItem, FolderSource, Playlist, Song};

/// Top-level envelope for all bus traffic.
#[derive(Debug, Clone)]
pub enum Message {
    Library(LibraryMessage),
    Playlist(PlaylistMessage),
    Playback(PlaybackMessage),
    Engine(EngineMessage),
}

/// Full store snapshot broadcast after every successful mutation.
#[derive(Debug, Clone)]
pub struct LibrarySnapshot {
    pub songs: Vec<Song>,
    pub folders: Vec<FolderSource>,
    pub playlists: Vec<Playlist>,
}

/// Library-domain commands and notifications.
#[derive(Debug, Clone)]
pub enum LibraryMessage {
    /// One folder-selection batch to index. An empty batch is refused.
    IndexBatch(Vec<FileItem>),
    DeleteSong(String),
    /// Deletes the folder record, then every song referencing it. The two
    /// phases are separate store operations, not a transaction.
    DeleteFolder(String),
    SetView(View),
    SetSearchQuery(String),
    OpenPlaylist(String),
    /// Notification: fresh store truth after a reload.
    SnapshotChanged(LibrarySnapshot),
    /// Notification: a store mutation failed; state was left as loaded and
    /// the command may be retried.
    WriteFailed { context: String },
}

/// Playlist membership commands.
#[derive(Debug, Clone)]
pub enum PlaylistMessage {
    /// Creates an empty playlist. Whitespace-only names are refused with no
    /// state change.
    Create { name: String },
    Delete(String),
    /// Idempotent append; a song already in the playlist is a no-op.
    AddSong { playlist_id: String, song_id: String },
}

/// Transport commands and playback-state notifications.
#[derive(Debug, Clone)]
pub enum PlaybackMessage {
    PlaySong(String),
    TogglePlay,
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    Seek(f64),
    SetVolume(f64),
    /// Notification: playback state after any transport transition.
    StateChanged(PlaybackState),
}

/// Commands issued to the external playback engine.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    Load(ContentHandle),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
}

/// Engine-side traffic: commands going out, events coming back.
#[derive(Debug, Clone)]
pub enum EngineMessage {
    Command(EngineCommand),
    TimeUpdate { position_seconds: f64, duration_seconds: f64 },
    Ended,
    VolumeChanged(f64),
}
