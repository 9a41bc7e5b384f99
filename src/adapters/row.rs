//! Room Row - Persistence Wire Shape
//!
//! The denormalized row both persistence tiers speak: the remote table's
//! columns, and the element type of the local fallback blob. Statuses are
//! stored as raw strings and normalized on the way back in, because
//! persisted data may predate the current vocabulary.

use serde::{Deserialize, Serialize};

use crate::domain::model::{ModifiedBy, Room, RoomId, RoomStatus};

/// One persisted room row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRow {
    pub room_number: u32,
    pub floor: u32,
    pub status: String,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub modified_by: Option<String>,
}

impl RoomRow {
    /// Build the wire row for a room.
    pub fn from_room(room: &Room) -> Self {
        Self {
            room_number: room.number,
            floor: room.floor,
            status: room.status.as_str().to_string(),
            guest_name: room.guest_name.clone(),
            guest_phone: room.guest_phone.clone(),
            modified_by: room.modified_by.map(|m| m.as_str().to_string()),
        }
    }

    /// Rebuild the domain record, normalizing the stored status and
    /// dropping unknown staff identities.
    ///
    /// The identifier is re-derived from floor and grid position; rows do
    /// not persist it.
    pub fn into_room(self) -> Room {
        let position = self.room_number.saturating_sub(self.floor * 100);
        Room {
            id: RoomId::derive(self.floor, position),
            number: self.room_number,
            floor: self.floor,
            status: RoomStatus::normalize(&self.status),
            guest_name: self.guest_name,
            guest_phone: self.guest_phone,
            modified_by: self.modified_by.as_deref().and_then(ModifiedBy::parse),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_round_trip() {
        let mut room = Room::available(2, 1, 201);
        room.status = RoomStatus::Rented;
        room.guest_name = Some("Marta".to_string());
        room.guest_phone = Some("3109876543".to_string());
        room.modified_by = Some(ModifiedBy::Fredy);

        let row = RoomRow::from_room(&room);
        assert_eq!(row.status, "arrendada");
        assert_eq!(row.modified_by.as_deref(), Some("Fredy"));

        assert_eq!(row.into_room(), room);
    }

    #[test]
    fn test_legacy_status_is_normalized_on_read() {
        let row = RoomRow {
            room_number: 103,
            floor: 1,
            status: "occupied".to_string(),
            guest_name: None,
            guest_phone: None,
            modified_by: None,
        };

        assert_eq!(row.into_room().status, RoomStatus::Occupied);
    }

    #[test]
    fn test_unknown_staff_identity_is_dropped() {
        let row = RoomRow {
            room_number: 105,
            floor: 1,
            status: "ocupada".to_string(),
            guest_name: Some("Luis".to_string()),
            guest_phone: Some("3012223344".to_string()),
            modified_by: Some("ghost".to_string()),
        };

        assert_eq!(row.into_room().modified_by, None);
    }

    #[test]
    fn test_identifier_rederived_from_position() {
        let row = RoomRow {
            room_number: 207,
            floor: 2,
            status: "disponible".to_string(),
            guest_name: None,
            guest_phone: None,
            modified_by: None,
        };

        assert_eq!(row.into_room().id, RoomId::derive(2, 7));
    }
}
