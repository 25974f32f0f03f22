//! Persistent metadata store.
//!
//! Three independent record collections (songs, folders, playlists), each a
//! table of `(id, record)` rows where `record` is the serde_json encoding of
//! the full record. There is no field-level update and no cross-collection
//! transaction; saves are whole-record upserts and batch saves commit each
//! record independently.

use log::warn;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::records::{FolderSource, Playlist, Song};

const SCHEMA_VERSION: i64 = 1;

const SONGS_TABLE: &str = "songs";
const FOLDERS_TABLE: &str = "folders";
const PLAYLISTS_TABLE: &str = "playlists";

pub struct DbManager {
    conn: Connection,
}

impl DbManager {
    /// Opens the store under the platform data directory, creating the
    /// database and schema on first use.
    pub fn new() -> Result<Self, StoreError> {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("lumina");

        if !data_dir.exists() {
            if let Err(err) = std::fs::create_dir_all(&data_dir) {
                warn!(
                    "Could not create data directory {}: {}",
                    data_dir.display(),
                    err
                );
            }
        }

        let db_path = data_dir.join("library.db");
        let conn = Connection::open(db_path).map_err(StoreError::Unavailable)?;

        let db_manager = Self { conn };
        db_manager.initialize_schema()?;
        Ok(db_manager)
    }

    /// In-memory store for tests.
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Unavailable)?;
        let db_manager = Self { conn };
        db_manager.initialize_schema()?;
        Ok(db_manager)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        for table in [SONGS_TABLE, FOLDERS_TABLE, PLAYLISTS_TABLE] {
            self.conn
                .execute(
                    &format!(
                        "CREATE TABLE IF NOT EXISTS {} (
                            id TEXT PRIMARY KEY,
                            record TEXT NOT NULL
                        )",
                        table
                    ),
                    [],
                )
                .map_err(StoreError::Unavailable)?;
        }

        self.conn
            .pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(StoreError::Unavailable)?;
        Ok(())
    }

    fn put_record<T: Serialize>(&self, table: &str, id: &str, record: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(record).map_err(StoreError::Encode)?;
        self.conn
            .execute(
                &format!("INSERT OR REPLACE INTO {} (id, record) VALUES (?1, ?2)", table),
                params![id, encoded],
            )
            .map_err(StoreError::Write)?;
        Ok(())
    }

    /// Reads every record in a collection, in no guaranteed order.
    ///
    /// The store enforces no schema; rows that no longer decode against the
    /// expected shape are skipped with a warning rather than failing the
    /// whole read.
    fn get_all_records<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, record FROM {}", table))
            .map_err(StoreError::Read)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(StoreError::Read)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, encoded) = row.map_err(StoreError::Read)?;
            match serde_json::from_str::<T>(&encoded) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!("Skipping undecodable {} record {}: {}", table, id, err);
                }
            }
        }
        Ok(records)
    }

    fn delete_record(&self, table: &str, id: &str) -> Result<(), StoreError> {
        // Absent ids are a silent no-op.
        self.conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", table), params![id])
            .map_err(StoreError::Write)?;
        Ok(())
    }

    pub fn save_song(&self, song: &Song) -> Result<(), StoreError> {
        self.put_record(SONGS_TABLE, &song.id, song)
    }

    /// Saves a batch of songs. Each record commits independently; a failure
    /// partway leaves the earlier records committed.
    pub fn save_songs(&self, songs: &[Song]) -> Result<(), StoreError> {
        for song in songs {
            self.save_song(song)?;
        }
        Ok(())
    }

    pub fn get_all_songs(&self) -> Result<Vec<Song>, StoreError> {
        self.get_all_records(SONGS_TABLE)
    }

    pub fn delete_song(&self, id: &str) -> Result<(), StoreError> {
        self.delete_record(SONGS_TABLE, id)
    }

    pub fn save_folder(&self, folder: &FolderSource) -> Result<(), StoreError> {
        self.put_record(FOLDERS_TABLE, &folder.id, folder)
    }

    pub fn get_folders(&self) -> Result<Vec<FolderSource>, StoreError> {
        self.get_all_records(FOLDERS_TABLE)
    }

    pub fn delete_folder(&self, id: &str) -> Result<(), StoreError> {
        self.delete_record(FOLDERS_TABLE, id)
    }

    pub fn save_playlist(&self, playlist: &Playlist) -> Result<(), StoreError> {
        self.put_record(PLAYLISTS_TABLE, &playlist.id, playlist)
    }

    pub fn get_playlists(&self) -> Result<Vec<Playlist>, StoreError> {
        self.get_all_records(PLAYLISTS_TABLE)
    }

    pub fn delete_playlist(&self, id: &str) -> Result<(), StoreError> {
        self.delete_record(PLAYLISTS_TABLE, id)
    }
}
