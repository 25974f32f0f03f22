//! Local-first music library core.
//!
//! Indexes audio files delivered by a host folder picker, persists song,
//! folder, and playlist records in a local versioned store, and sequences an
//! external playback engine over a broadcast event bus. Rendering, file
//! selection, and audio decoding live in the host application; this crate
//! owns the metadata store, the playlist membership model, and the playback
//! queue derivation.

pub mod app_state;
pub mod config;
pub mod config_persistence;
pub mod db_manager;
pub mod error;
pub mod indexer;
pub mod library_manager;
pub mod playlists;
pub mod protocol;
pub mod queue;
pub mod records;

pub use app_state::{AppState, PlaybackState, View};
pub use db_manager::DbManager;
pub use error::StoreError;
pub use library_manager::LibraryManager;
pub use protocol::Message;
pub use records::{ContentHandle, FileItem, FolderSource, Playlist, Song};

/// Console logger setup for host applications and examples.
pub fn init_logging() {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Debug);
    clog.init();
}
