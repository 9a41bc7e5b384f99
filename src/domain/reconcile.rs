//! Floor Reconciliation
//!
//! Fills the gap between whatever a persistence tier returned and the
//! canonical default set, so a floor always renders its full grid - no
//! missing rooms after a partial store, no duplicates.

use std::collections::HashSet;

use crate::config::FloorPlan;
use crate::domain::model::Room;

/// Merge loaded rooms with the canonical default set for a floor.
///
/// Loaded rooms are preserved unchanged and in order; a fresh default room
/// is appended for every canonical number the load missed. Rooms outside
/// the canonical range are passed through untouched - never pruned, never
/// regenerated.
pub fn reconcile(plan: &FloorPlan, floor: u32, loaded: Vec<Room>) -> Vec<Room> {
    let present: HashSet<u32> = loaded.iter().map(|room| room.number).collect();

    let mut rooms = loaded;
    for room in plan.default_rooms(floor) {
        if !present.contains(&room.number) {
            rooms.push(room);
        }
    }
    rooms
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ModifiedBy, RoomStatus};

    fn occupied(floor: u32, position: u32, number: u32) -> Room {
        let mut room = Room::available(floor, position, number);
        room.status = RoomStatus::Occupied;
        room.guest_name = Some("Ana".to_string());
        room.guest_phone = Some("3000000000".to_string());
        room.modified_by = Some(ModifiedBy::Rocio);
        room
    }

    #[test]
    fn test_empty_load_yields_full_default_set() {
        let plan = FloorPlan::default();

        for floor in 1..=plan.floors {
            let rooms = reconcile(&plan, floor, Vec::new());
            assert_eq!(rooms, plan.default_rooms(floor));
        }
    }

    #[test]
    fn test_partial_load_is_filled_at_the_end() {
        let plan = FloorPlan::default();
        let loaded: Vec<Room> = (1..=5)
            .map(|position| occupied(1, position, 100 + position))
            .collect();

        let rooms = reconcile(&plan, 1, loaded.clone());

        assert_eq!(rooms.len(), 10);
        // Loaded entries first, unchanged and in order
        assert_eq!(&rooms[..5], &loaded[..]);
        // Gaps appended as defaults
        let appended: Vec<u32> = rooms[5..].iter().map(|r| r.number).collect();
        assert_eq!(appended, vec![106, 107, 108, 109, 110]);
        assert!(rooms[5..].iter().all(Room::is_available));
    }

    #[test]
    fn test_full_load_is_untouched() {
        let plan = FloorPlan::default();
        let loaded: Vec<Room> = (1..=10)
            .map(|position| occupied(2, position, 200 + position))
            .collect();

        let rooms = reconcile(&plan, 2, loaded.clone());
        assert_eq!(rooms, loaded);
    }

    #[test]
    fn test_stray_room_passes_through() {
        let plan = FloorPlan::default();
        // Room 199 is outside the canonical 101..110 range
        let stray = occupied(1, 99, 199);

        let rooms = reconcile(&plan, 1, vec![stray.clone()]);

        assert_eq!(rooms.len(), 11);
        assert_eq!(rooms[0], stray);
        let numbers: HashSet<u32> = rooms.iter().map(|r| r.number).collect();
        for canonical in plan.canonical_numbers(1) {
            assert!(numbers.contains(&canonical));
        }
    }
}
