//! Property-Based Tests for Normalization and Reconciliation
//!
//! Uses proptest to verify the board's two pure pieces across a wide range
//! of inputs.
//!
//! # Test Properties
//!
//! 1. **Normalization idempotence**: normalize(normalize(x)) = normalize(x)
//! 2. **Normalization totality**: every input lands in the vocabulary
//! 3. **Reconciliation coverage**: result always covers the canonical set
//! 4. **Reconciliation stability**: loaded entries survive unchanged

#![cfg(test)]

use proptest::prelude::*;
use std::collections::HashSet;

use crate::config::FloorPlan;
use crate::domain::model::{Room, RoomStatus};
use crate::domain::reconcile::reconcile;

// =============================================================================
// Property Strategies
// =============================================================================

/// Strategy for generating small but varied floor plans.
fn plan_strategy() -> impl Strategy<Value = FloorPlan> {
    (1u32..=5, 1u32..=20).prop_map(|(floors, rooms_per_floor)| FloorPlan {
        floors,
        rooms_per_floor,
    })
}

/// Strategy for generating arbitrary raw status strings, weighted toward
/// values that look like real vocabulary.
fn raw_status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("disponible".to_string()),
        Just("ocupada".to_string()),
        Just("arrendada".to_string()),
        Just("available".to_string()),
        Just("occupied".to_string()),
        ".{0,12}",
    ]
}

/// Strategy for picking a subset of a floor's canonical positions.
fn subset_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 20)
}

// =============================================================================
// Normalization Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: normalization is idempotent.
    #[test]
    fn prop_normalize_idempotent(raw in raw_status_strategy()) {
        let once = RoomStatus::normalize(&raw);
        let twice = RoomStatus::normalize(once.as_str());
        prop_assert_eq!(once, twice);
    }

    /// Property: anything outside the known vocabularies maps to Available.
    #[test]
    fn prop_normalize_unknown_is_available(raw in ".{0,12}") {
        let known = [
            "disponible", "ocupada", "arrendada", "available", "occupied",
        ];
        prop_assume!(!known.contains(&raw.as_str()));
        prop_assert_eq!(RoomStatus::normalize(&raw), RoomStatus::Available);
    }
}

// =============================================================================
// Reconciliation Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: reconciling an empty load yields exactly the default set.
    #[test]
    fn prop_reconcile_empty_is_default_set(plan in plan_strategy(), floor in 1u32..=5) {
        prop_assume!(plan.contains_floor(floor));
        let rooms = reconcile(&plan, floor, Vec::new());
        prop_assert_eq!(rooms, plan.default_rooms(floor));
    }

    /// Property: any canonical subset reconciles to full coverage with the
    /// loaded entries preserved unchanged and in order.
    #[test]
    fn prop_reconcile_covers_canonical_set(
        plan in plan_strategy(),
        floor in 1u32..=5,
        keep in subset_strategy(),
    ) {
        prop_assume!(plan.contains_floor(floor));

        let loaded: Vec<Room> = plan
            .default_rooms(floor)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| keep[*i % keep.len()])
            .map(|(_, mut room)| {
                room.status = RoomStatus::Occupied;
                room
            })
            .collect();

        let rooms = reconcile(&plan, floor, loaded.clone());

        // Exactly the canonical count, no duplicates
        prop_assert_eq!(rooms.len() as u32, plan.rooms_per_floor);
        let numbers: HashSet<u32> = rooms.iter().map(|r| r.number).collect();
        prop_assert_eq!(numbers.len(), rooms.len());
        for canonical in plan.canonical_numbers(floor) {
            prop_assert!(numbers.contains(&canonical));
        }

        // Loaded prefix unchanged
        prop_assert_eq!(&rooms[..loaded.len()], &loaded[..]);
    }
}
