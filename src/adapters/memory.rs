//! In-Memory and Failing Room Stores
//!
//! Test-support backends: `MemoryRoomStore` mimics the remote table's
//! upsert semantics in memory, `FailingRoomStore` simulates a store that
//! is always unreachable. Both are used by the crate's own tests and are
//! exported for downstream integration testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::row::RoomRow;
use crate::domain::model::Room;
use crate::domain::ports::RoomStore;
use crate::error::{Error, Result};

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory room store with `(floor, number)` upsert semantics.
#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rows: RwLock<BTreeMap<(u32, u32), RoomRow>>,
}

impl MemoryRoomStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows across all floors.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Seed a raw row, bypassing the domain model. Lets tests stage
    /// legacy or partial data the way an old deployment would have left it.
    pub fn seed(&self, row: RoomRow) {
        self.rows.write().insert((row.floor, row.room_number), row);
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, floor: u32) -> Result<Vec<Room>> {
        let rows = self.rows.read();
        Ok(rows
            .range((floor, 0)..=(floor, u32::MAX))
            .map(|(_, row)| row.clone().into_room())
            .collect())
    }

    async fn save(&self, floor: u32, rooms: &[Room]) -> Result<()> {
        let mut rows = self.rows.write();
        for room in rooms {
            rows.insert((floor, room.number), RoomRow::from_room(room));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

// =============================================================================
// Failing Store
// =============================================================================

/// Room store that fails every operation, standing in for an unreachable
/// remote.
#[derive(Debug, Default)]
pub struct FailingRoomStore;

impl FailingRoomStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoomStore for FailingRoomStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn load(&self, _floor: u32) -> Result<Vec<Room>> {
        Err(Error::RemoteQuery("Store is unreachable".to_string()))
    }

    async fn save(&self, _floor: u32, _rooms: &[Room]) -> Result<()> {
        Err(Error::RemoteQuery("Store is unreachable".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Err(Error::RemoteQuery("Store is unreachable".to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
