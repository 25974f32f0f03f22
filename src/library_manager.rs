//! Library-domain orchestrator.
//!
//! This component owns the persistent store and the application state,
//! consumes commands from the event bus, and coordinates the external
//! playback engine. Every store mutation is awaited, then followed by a full
//! reload and a fresh snapshot broadcast; a failed mutation aborts only
//! itself and leaves the loaded state untouched.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::{Receiver, Sender};

use crate::app_state::AppState;
use crate::config::Config;
use crate::db_manager::DbManager;
use crate::error::StoreError;
use crate::indexer;
use crate::playlists;
use crate::protocol::{
    EngineCommand, EngineMessage, LibraryMessage, LibrarySnapshot, Message, PlaybackMessage,
    PlaylistMessage,
};
use crate::queue::QueueResolver;
use crate::records::FileItem;

/// Coordinates indexing, playlist membership, and playback sequencing.
pub struct LibraryManager {
    bus_consumer: Receiver<Message>,
    bus_producer: Sender<Message>,
    db_manager: DbManager,
    state: AppState,
    resolver: QueueResolver,
}

impl LibraryManager {
    pub fn new(
        bus_consumer: Receiver<Message>,
        bus_producer: Sender<Message>,
        db_manager: DbManager,
        config: &Config,
    ) -> Self {
        let mut state = AppState::new();
        state.set_volume(config.ui.volume);
        state.playback.shuffle = config.ui.shuffle;
        state.playback.repeat = config.ui.repeat;

        Self {
            bus_consumer,
            bus_producer,
            db_manager,
            state,
            resolver: QueueResolver::new(),
        }
    }

    /// Starts the blocking event loop for library and playback messages.
    pub fn run(&mut self) {
        if let Err(err) = self.reload_state() {
            error!("Failed to restore library from store: {}", err);
        } else {
            info!(
                "Restored library: {} songs, {} folders, {} playlists",
                self.state.songs.len(),
                self.state.folders.len(),
                self.state.playlists.len()
            );
        }
        self.broadcast_snapshot();
        self.send_engine_command(EngineCommand::SetVolume(self.state.playback.volume));
        self.broadcast_playback_state();

        loop {
            match self.bus_consumer.blocking_recv() {
                Ok(message) => self.handle_message(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("LibraryManager lagged behind the bus by {} messages", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::Library(LibraryMessage::IndexBatch(items)) => self.index_batch(items),
            Message::Library(LibraryMessage::DeleteSong(id)) => self.delete_song(&id),
            Message::Library(LibraryMessage::DeleteFolder(id)) => self.delete_folder(&id),
            Message::Library(LibraryMessage::SetView(view)) => self.state.set_view(view),
            Message::Library(LibraryMessage::SetSearchQuery(query)) => {
                self.state.set_search_query(&query)
            }
            Message::Library(LibraryMessage::OpenPlaylist(id)) => self.state.open_playlist(&id),
            Message::Playlist(PlaylistMessage::Create { name }) => self.create_playlist(&name),
            Message::Playlist(PlaylistMessage::Delete(id)) => self.delete_playlist(&id),
            Message::Playlist(PlaylistMessage::AddSong {
                playlist_id,
                song_id,
            }) => self.add_song_to_playlist(&playlist_id, &song_id),
            Message::Playback(PlaybackMessage::PlaySong(id)) => self.play_song(&id),
            Message::Playback(PlaybackMessage::TogglePlay) => self.toggle_play(),
            Message::Playback(PlaybackMessage::Next) => self.play_next(),
            Message::Playback(PlaybackMessage::Previous) => self.play_previous(),
            Message::Playback(PlaybackMessage::ToggleShuffle) => {
                let shuffle = self.state.toggle_shuffle();
                debug!("Shuffle: {}", shuffle);
                self.broadcast_playback_state();
            }
            Message::Playback(PlaybackMessage::ToggleRepeat) => {
                let repeat = self.state.toggle_repeat();
                debug!("Repeat: {}", repeat);
                self.broadcast_playback_state();
            }
            Message::Playback(PlaybackMessage::Seek(seconds)) => self.seek(seconds),
            Message::Playback(PlaybackMessage::SetVolume(volume)) => self.set_volume(volume),
            Message::Engine(EngineMessage::TimeUpdate {
                position_seconds,
                duration_seconds,
            }) => {
                self.state.apply_time_update(position_seconds, duration_seconds);
                self.broadcast_playback_state();
            }
            Message::Engine(EngineMessage::Ended) => self.handle_track_ended(),
            Message::Engine(EngineMessage::VolumeChanged(volume)) => {
                self.state.set_volume(volume);
                self.broadcast_playback_state();
            }
            // Own notifications and outbound engine commands.
            Message::Library(_)
            | Message::Playback(PlaybackMessage::StateChanged(_))
            | Message::Engine(EngineMessage::Command(_)) => {}
        }
    }

    /// Replaces loaded state with store truth. Content handles never
    /// round-trip through the store, so handles held by the current session
    /// are carried across onto the freshly loaded records.
    fn reload_state(&mut self) -> Result<(), StoreError> {
        let mut songs = self.db_manager.get_all_songs()?;
        let folders = self.db_manager.get_folders()?;
        let playlists = self.db_manager.get_playlists()?;

        for song in &mut songs {
            if let Some(loaded) = self.state.song_by_id(&song.id) {
                song.content = loaded.content.clone();
                song.duration = loaded.duration;
            }
        }

        self.state.apply_snapshot(songs, folders, playlists);
        Ok(())
    }

    fn broadcast_snapshot(&self) {
        let _ = self
            .bus_producer
            .send(Message::Library(LibraryMessage::SnapshotChanged(
                LibrarySnapshot {
                    songs: self.state.songs.clone(),
                    folders: self.state.folders.clone(),
                    playlists: self.state.playlists.clone(),
                },
            )));
    }

    fn broadcast_playback_state(&self) {
        let _ = self
            .bus_producer
            .send(Message::Playback(PlaybackMessage::StateChanged(
                self.state.playback.clone(),
            )));
    }

    fn send_engine_command(&self, command: EngineCommand) {
        let _ = self
            .bus_producer
            .send(Message::Engine(EngineMessage::Command(command)));
    }

    /// Mutation epilogue: reload and re-broadcast on success, surface a
    /// retryable failure otherwise. On failure the loaded state is left
    /// untouched; the UI either retries or refreshes from store truth.
    fn finish_mutation(&mut self, result: Result<(), StoreError>, context: &str) {
        match result {
            Ok(()) => {
                if let Err(err) = self.reload_state() {
                    error!("Reload after {} failed: {}", context, err);
                }
                self.broadcast_snapshot();
            }
            Err(err) => {
                error!("{} failed: {}", context, err);
                let _ = self
                    .bus_producer
                    .send(Message::Library(LibraryMessage::WriteFailed {
                        context: context.to_string(),
                    }));
            }
        }
    }

    fn index_batch(&mut self, items: Vec<FileItem>) {
        let Some(batch) = indexer::build_batch(&items) else {
            debug!("Ignoring empty index batch");
            return;
        };
        info!(
            "Indexing folder '{}': {} of {} items accepted",
            batch.folder.name,
            batch.songs.len(),
            items.len()
        );
        let result = indexer::commit_batch(&self.db_manager, &batch);
        if result.is_ok() {
            // The store never holds content handles; stage the batch songs
            // so the reload carries their session handles over.
            self.state.songs.extend(batch.songs.iter().cloned());
        }
        self.finish_mutation(result, "index batch");
    }

    fn delete_song(&mut self, id: &str) {
        let result = self.db_manager.delete_song(id);
        self.finish_mutation(result, "delete song");
    }

    /// Two-phase cascade: the folder record first, then each member song as
    /// its own delete. Not atomic; a failure leaves earlier deletes applied.
    fn delete_folder(&mut self, id: &str) {
        let member_ids: Vec<String> = self
            .state
            .songs
            .iter()
            .filter(|song| song.folder_id == id)
            .map(|song| song.id.clone())
            .collect();

        let result = self.db_manager.delete_folder(id).and_then(|()| {
            for song_id in &member_ids {
                self.db_manager.delete_song(song_id)?;
            }
            Ok(())
        });
        self.finish_mutation(result, "delete folder");
    }

    fn create_playlist(&mut self, name: &str) {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        let Some(playlist) = playlists::new_playlist(name, created_at) else {
            debug!("Refusing empty playlist name");
            return;
        };
        let result = self.db_manager.save_playlist(&playlist);
        self.finish_mutation(result, "create playlist");
    }

    fn delete_playlist(&mut self, id: &str) {
        let result = self.db_manager.delete_playlist(id);
        self.finish_mutation(result, "delete playlist");
    }

    fn add_song_to_playlist(&mut self, playlist_id: &str, song_id: &str) {
        let Some(playlist) = self
            .state
            .playlists
            .iter()
            .find(|playlist| playlist.id == playlist_id)
        else {
            warn!("AddSong to unknown playlist {}", playlist_id);
            return;
        };

        let mut updated = playlist.clone();
        if !playlists::add_member(&mut updated, song_id) {
            debug!("Song {} already in playlist {}", song_id, playlist_id);
            return;
        }
        let result = self.db_manager.save_playlist(&updated);
        self.finish_mutation(result, "add song to playlist");
    }

    fn play_song(&mut self, id: &str) {
        let Some(song) = self.state.song_by_id(id) else {
            warn!("PlaySong for unknown song {}", id);
            return;
        };
        // Per-item failure: a song reloaded in a later session has no usable
        // content handle. Logged, never fatal to the session.
        let Some(content) = song.content.clone() else {
            warn!("Content unavailable for song {} ({})", song.name, song.id);
            return;
        };

        self.send_engine_command(EngineCommand::Load(content));
        self.send_engine_command(EngineCommand::Play);
        self.state.set_current_song(id);
        self.broadcast_playback_state();
    }

    fn toggle_play(&mut self) {
        if self.state.playback.current_song_id.is_none() {
            return;
        }
        if self.state.playback.is_playing {
            self.send_engine_command(EngineCommand::Pause);
            self.state.set_playing(false);
        } else {
            self.send_engine_command(EngineCommand::Play);
            self.state.set_playing(true);
        }
        self.broadcast_playback_state();
    }

    fn resolve_next_song_id(&mut self) -> Option<String> {
        let shuffle = self.state.playback.shuffle;
        let current_id = self.state.playback.current_song_id.clone();
        let list = self.state.display_songs();
        self.resolver
            .next(&list, current_id.as_deref(), shuffle)
            .map(|index| list[index].id.clone())
    }

    fn play_next(&mut self) {
        if let Some(id) = self.resolve_next_song_id() {
            self.play_song(&id);
        }
    }

    fn play_previous(&mut self) {
        let current_id = self.state.playback.current_song_id.clone();
        let target = {
            let list = self.state.display_songs();
            self.resolver
                .previous(&list, current_id.as_deref())
                .map(|index| list[index].id.clone())
        };
        if let Some(id) = target {
            self.play_song(&id);
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.send_engine_command(EngineCommand::Seek(seconds));
        self.state.playback.position_seconds = seconds;
        self.broadcast_playback_state();
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.set_volume(volume);
        self.send_engine_command(EngineCommand::SetVolume(self.state.playback.volume));
        self.broadcast_playback_state();
    }

    /// Natural end of track. Repeat restarts the current track in place;
    /// otherwise playback advances over the active display list. A stray
    /// duplicate `Ended` is safe: with no current song this is a no-op.
    fn handle_track_ended(&mut self) {
        if self.state.playback.current_song_id.is_none() {
            return;
        }
        if self.state.playback.repeat {
            self.send_engine_command(EngineCommand::Seek(0.0));
            self.send_engine_command(EngineCommand::Play);
            self.state.playback.position_seconds = 0.0;
            self.state.set_playing(true);
            self.broadcast_playback_state();
        } else {
            self.play_next();
        }
    }
}
