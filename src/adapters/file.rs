//! Local File Fallback Adapter
//!
//! Implements the `RoomStore` port over a single JSON blob holding the
//! full multi-floor room list - the store the board degrades to when the
//! remote table is unreachable. Every save is a read-modify-write of the
//! whole blob: this floor's entries are replaced in place, other floors'
//! entries are left untouched.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::row::RoomRow;
use crate::domain::model::Room;
use crate::domain::ports::RoomStore;
use crate::error::Result;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the local fallback store.
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Path of the JSON blob
    pub path: PathBuf,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/lib/roomboard/rooms.json"),
        }
    }
}

// =============================================================================
// Adapter
// =============================================================================

/// Single-blob local room store.
pub struct FileRoomStore {
    config: FileStoreConfig,
    // The blob is read-modify-written as a whole; the mutex keeps
    // concurrent floor writers from losing each other's floors.
    lock: Mutex<()>,
}

impl FileRoomStore {
    /// Create a new file store over the given blob path.
    pub fn new(config: FileStoreConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.config.path
    }

    /// Read the whole blob. A missing file is an empty list; an unreadable
    /// or corrupt blob is treated as empty rather than surfaced, since the
    /// fallback tier must never fail a load.
    async fn read_blob(&self) -> Vec<RoomRow> {
        let bytes = match tokio::fs::read(&self.config.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.config.path.display(), error = %e, "Fallback blob unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(path = %self.config.path.display(), error = %e, "Fallback blob corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Persist the whole blob atomically (temp file + rename).
    async fn write_blob(&self, rows: &[RoomRow]) -> Result<()> {
        if let Some(parent) = self.config.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.config.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(rows)?).await?;
        tokio::fs::rename(&tmp, &self.config.path).await?;
        Ok(())
    }
}

impl std::fmt::Debug for FileRoomStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRoomStore")
            .field("path", &self.config.path)
            .finish()
    }
}

#[async_trait]
impl RoomStore for FileRoomStore {
    fn name(&self) -> &'static str {
        "local-file"
    }

    #[instrument(skip(self))]
    async fn load(&self, floor: u32) -> Result<Vec<Room>> {
        let _guard = self.lock.lock().await;

        let rows = self.read_blob().await;
        let rooms: Vec<Room> = rows
            .into_iter()
            .filter(|row| row.floor == floor)
            .map(RoomRow::into_room)
            .collect();

        debug!(floor, rooms = rooms.len(), "Loaded rooms from fallback blob");
        Ok(rooms)
    }

    #[instrument(skip(self, rooms), fields(rooms = rooms.len()))]
    async fn save(&self, floor: u32, rooms: &[Room]) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut rows = self.read_blob().await;
        rows.retain(|row| row.floor != floor);
        rows.extend(rooms.iter().map(RoomRow::from_room));

        self.write_blob(&rows).await?;
        debug!(floor, total = rows.len(), "Persisted fallback blob");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ModifiedBy, RoomStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static BLOB_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn blob_store() -> FileRoomStore {
        let path = std::env::temp_dir().join(format!(
            "roomboard-file-store-{}-{}.json",
            std::process::id(),
            BLOB_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        FileRoomStore::new(FileStoreConfig { path })
    }

    fn captured(floor: u32, position: u32) -> Room {
        let mut room = Room::available(floor, position, floor * 100 + position);
        room.status = RoomStatus::Occupied;
        room.guest_name = Some("Ana".to_string());
        room.guest_phone = Some("3000000000".to_string());
        room.modified_by = Some(ModifiedBy::Rocio);
        room
    }

    #[tokio::test]
    async fn test_missing_blob_is_empty_floor() {
        let store = blob_store();
        assert!(store.load(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let store = blob_store();
        let rooms = vec![captured(1, 1), captured(1, 2)];

        store.save(1, &rooms).await.unwrap();
        assert_eq!(store.load(1).await.unwrap(), rooms);

        let _ = tokio::fs::remove_file(store.path()).await;
    }

    #[tokio::test]
    async fn test_other_floors_survive_a_save() {
        let store = blob_store();
        store.save(1, &[captured(1, 1)]).await.unwrap();
        store.save(2, &[captured(2, 4)]).await.unwrap();

        // Replace floor 1 entirely; floor 2 must be untouched
        store.save(1, &[captured(1, 9)]).await.unwrap();

        let floor1 = store.load(1).await.unwrap();
        assert_eq!(floor1.len(), 1);
        assert_eq!(floor1[0].number, 109);
        assert_eq!(store.load(2).await.unwrap(), vec![captured(2, 4)]);

        let _ = tokio::fs::remove_file(store.path()).await;
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_treated_as_empty() {
        let store = blob_store();
        tokio::fs::write(store.path(), b"{not json")
            .await
            .unwrap();

        assert!(store.load(1).await.unwrap().is_empty());

        // And a save recovers the blob
        store.save(1, &[captured(1, 1)]).await.unwrap();
        assert_eq!(store.load(1).await.unwrap().len(), 1);

        let _ = tokio::fs::remove_file(store.path()).await;
    }

    #[tokio::test]
    async fn test_legacy_statuses_normalized_on_load() {
        let store = blob_store();
        let blob = serde_json::json!([
            {"room_number": 101, "floor": 1, "status": "available",
             "guest_name": null, "guest_phone": null, "modified_by": null},
            {"room_number": 102, "floor": 1, "status": "occupied",
             "guest_name": "Luis", "guest_phone": "3011112222", "modified_by": "Fredy"},
            {"room_number": 103, "floor": 1, "status": "under-repair",
             "guest_name": null, "guest_phone": null, "modified_by": null}
        ]);
        tokio::fs::write(store.path(), serde_json::to_vec(&blob).unwrap())
            .await
            .unwrap();

        let rooms = store.load(1).await.unwrap();
        assert_eq!(rooms[0].status, RoomStatus::Available);
        assert_eq!(rooms[1].status, RoomStatus::Occupied);
        assert_eq!(rooms[2].status, RoomStatus::Available);

        let _ = tokio::fs::remove_file(store.path()).await;
    }
}
