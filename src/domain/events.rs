//! Board Events
//!
//! Immutable records of significant board occurrences, published to the
//! logging sink as operational diagnostics. Guest fields deliberately stay
//! out of events; they belong to the stored record only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Room;

/// A significant occurrence on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardEvent {
    /// A floor finished its first load and is ready for mutations.
    FloorActivated {
        floor: u32,
        room_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A room was captured as occupied or rented.
    RoomCaptured {
        floor: u32,
        room_id: String,
        number: u32,
        status: String,
        modified_by: String,
        timestamp: DateTime<Utc>,
    },

    /// A room was released back to available.
    RoomReleased {
        floor: u32,
        room_id: String,
        number: u32,
        timestamp: DateTime<Utc>,
    },

    /// A floor snapshot was persisted.
    FloorSaved {
        floor: u32,
        room_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A floor snapshot could not be persisted to any tier.
    FloorSaveFailed {
        floor: u32,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl BoardEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            BoardEvent::FloorActivated { timestamp, .. } => *timestamp,
            BoardEvent::RoomCaptured { timestamp, .. } => *timestamp,
            BoardEvent::RoomReleased { timestamp, .. } => *timestamp,
            BoardEvent::FloorSaved { timestamp, .. } => *timestamp,
            BoardEvent::FloorSaveFailed { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            BoardEvent::FloorActivated { .. } => "FloorActivated",
            BoardEvent::RoomCaptured { .. } => "RoomCaptured",
            BoardEvent::RoomReleased { .. } => "RoomReleased",
            BoardEvent::FloorSaved { .. } => "FloorSaved",
            BoardEvent::FloorSaveFailed { .. } => "FloorSaveFailed",
        }
    }

    /// Get the floor the event belongs to.
    pub fn floor(&self) -> u32 {
        match self {
            BoardEvent::FloorActivated { floor, .. } => *floor,
            BoardEvent::RoomCaptured { floor, .. } => *floor,
            BoardEvent::RoomReleased { floor, .. } => *floor,
            BoardEvent::FloorSaved { floor, .. } => *floor,
            BoardEvent::FloorSaveFailed { floor, .. } => *floor,
        }
    }
}

// =============================================================================
// Event Builders
// =============================================================================

impl BoardEvent {
    /// Create a FloorActivated event.
    pub fn floor_activated(floor: u32, room_count: usize) -> Self {
        BoardEvent::FloorActivated {
            floor,
            room_count,
            timestamp: Utc::now(),
        }
    }

    /// Create a RoomCaptured event from the mutated room.
    pub fn room_captured(room: &Room) -> Self {
        BoardEvent::RoomCaptured {
            floor: room.floor,
            room_id: room.id.to_string(),
            number: room.number,
            status: room.status.to_string(),
            modified_by: room
                .modified_by
                .map(|m| m.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Create a RoomReleased event from the mutated room.
    pub fn room_released(room: &Room) -> Self {
        BoardEvent::RoomReleased {
            floor: room.floor,
            room_id: room.id.to_string(),
            number: room.number,
            timestamp: Utc::now(),
        }
    }

    /// Create a FloorSaved event.
    pub fn floor_saved(floor: u32, room_count: usize) -> Self {
        BoardEvent::FloorSaved {
            floor,
            room_count,
            timestamp: Utc::now(),
        }
    }

    /// Create a FloorSaveFailed event.
    pub fn floor_save_failed(floor: u32, reason: impl Into<String>) -> Self {
        BoardEvent::FloorSaveFailed {
            floor,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ModifiedBy, RoomStatus};

    #[test]
    fn test_event_serialization() {
        let event = BoardEvent::floor_activated(2, 10);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("FloorActivated"));

        let deserialized: BoardEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.event_type(), "FloorActivated");
        assert_eq!(deserialized.floor(), 2);
    }

    #[test]
    fn test_captured_event_carries_no_guest_data() {
        let mut room = Room::available(1, 1, 101);
        room.status = RoomStatus::Occupied;
        room.guest_name = Some("Juan Pérez".to_string());
        room.guest_phone = Some("3001234567".to_string());
        room.modified_by = Some(ModifiedBy::Administrador);

        let event = BoardEvent::room_captured(&room);
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("ocupada"));
        assert!(json.contains("Administrador"));
        assert!(!json.contains("Juan"));
        assert!(!json.contains("3001234567"));
    }

    #[test]
    fn test_timestamp() {
        let before = Utc::now();
        let event = BoardEvent::floor_saved(1, 10);
        let after = Utc::now();

        assert!(event.timestamp() >= before);
        assert!(event.timestamp() <= after);
    }
}
