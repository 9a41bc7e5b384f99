//! Floor Plan Configuration
//!
//! Externalizes the deployment constants - floor count, rooms per floor,
//! and the numbering scheme - so a different property layout is a config
//! change, not a code change. The plan is also the canonical default-room
//! generator used for reconciliation.

use crate::domain::model::Room;
use crate::error::{Error, Result};

/// Floor plan for the property.
///
/// Floors are numbered `1..=floors`; every floor carries the same fixed
/// room count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorPlan {
    /// Number of floors
    pub floors: u32,
    /// Fixed room count per floor
    pub rooms_per_floor: u32,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self {
            floors: 3,
            rooms_per_floor: 10,
        }
    }
}

impl FloorPlan {
    /// Create a validated plan.
    pub fn new(floors: u32, rooms_per_floor: u32) -> Result<Self> {
        if floors == 0 {
            return Err(Error::Config("floor count must be positive".to_string()));
        }
        if rooms_per_floor == 0 {
            return Err(Error::Config(
                "rooms per floor must be positive".to_string(),
            ));
        }
        Ok(Self {
            floors,
            rooms_per_floor,
        })
    }

    /// Whether the plan covers the given floor.
    pub fn contains_floor(&self, floor: u32) -> bool {
        (1..=self.floors).contains(&floor)
    }

    /// Room number for a 1-based grid position.
    pub fn room_number(&self, floor: u32, position: u32) -> u32 {
        floor * 100 + position
    }

    /// Canonical room numbers for a floor.
    pub fn canonical_numbers(&self, floor: u32) -> impl Iterator<Item = u32> + '_ {
        (1..=self.rooms_per_floor).map(move |position| self.room_number(floor, position))
    }

    /// The canonical default set for a floor: every room available, no
    /// guest data, identifiers derived from the grid position.
    ///
    /// Deterministic - same plan and floor always produce the same rooms.
    pub fn default_rooms(&self, floor: u32) -> Vec<Room> {
        (1..=self.rooms_per_floor)
            .map(|position| Room::available(floor, position, self.room_number(floor, position)))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
