//! Room Entity Model
//!
//! The data contract every other component builds on: room identity, the
//! closed status and staff vocabularies, and status normalization for
//! values read back from persistence.

use serde::{Deserialize, Serialize};

// =============================================================================
// Status Vocabulary
// =============================================================================

/// Room status - a closed three-value vocabulary.
///
/// Wire names are the Spanish vocabulary the deployed room table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomStatus {
    /// Room is free and bookable
    #[serde(rename = "disponible")]
    Available,
    /// Room has a guest for a short stay
    #[serde(rename = "ocupada")]
    Occupied,
    /// Room is rented long-term
    #[serde(rename = "arrendada")]
    Rented,
}

impl RoomStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "disponible",
            RoomStatus::Occupied => "ocupada",
            RoomStatus::Rented => "arrendada",
        }
    }

    /// Coerce an arbitrary stored value into a valid status.
    ///
    /// Current wire values map to themselves. The two legacy English values
    /// the store wrote before the vocabulary change map across. Everything
    /// else falls back to `Available`: a value we cannot recognize must not
    /// leave a bookable room blocked.
    pub fn normalize(raw: &str) -> RoomStatus {
        match raw {
            "disponible" => RoomStatus::Available,
            "ocupada" => RoomStatus::Occupied,
            "arrendada" => RoomStatus::Rented,
            // Pre-migration vocabulary
            "available" => RoomStatus::Available,
            "occupied" => RoomStatus::Occupied,
            _ => RoomStatus::Available,
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Staff Vocabulary
// =============================================================================

/// Staff identity recorded when a room moves to a non-available status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifiedBy {
    Fredy,
    Rocio,
    Administrador,
}

impl ModifiedBy {
    /// Wire name of the staff identity.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifiedBy::Fredy => "Fredy",
            ModifiedBy::Rocio => "Rocio",
            ModifiedBy::Administrador => "Administrador",
        }
    }

    /// Parse a stored value; unknown identities are dropped rather than
    /// invented.
    pub fn parse(raw: &str) -> Option<ModifiedBy> {
        match raw {
            "Fredy" => Some(ModifiedBy::Fredy),
            "Rocio" => Some(ModifiedBy::Rocio),
            "Administrador" => Some(ModifiedBy::Administrador),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModifiedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Room Identity
// =============================================================================

/// Room identifier (value object).
///
/// Derived from floor and 1-based grid position, not from the room number,
/// so identity survives a renumbering of the floor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Derive the identifier for a grid position on a floor.
    pub fn derive(floor: u32, position: u32) -> Self {
        Self(format!("room-{floor}-{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// Room
// =============================================================================

/// One unit of hotel inventory.
///
/// Guest fields are populated only while the room is not available;
/// releasing a room clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub number: u32,
    pub floor: u32,
    pub status: RoomStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<ModifiedBy>,
}

impl Room {
    /// A fresh available room at the given grid position.
    pub fn available(floor: u32, position: u32, number: u32) -> Self {
        Self {
            id: RoomId::derive(floor, position),
            number,
            floor,
            status: RoomStatus::Available,
            guest_name: None,
            guest_phone: None,
            modified_by: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}

// =============================================================================
// Tests
// =============================================================================
