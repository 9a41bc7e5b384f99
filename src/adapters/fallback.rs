//! Tiered Room Store - Remote Primary, Local Fallback
//!
//! Decorator composing two `RoomStore` backends. Every operation tries
//! the primary once; on any fault the fallback serves the operation and
//! the fault is logged and counted instead of propagating. The caller
//! only sees an error when both tiers fail.
//!
//! No retry or backoff: one primary attempt, one fallback attempt.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{instrument, warn};

use crate::domain::model::Room;
use crate::domain::ports::RoomStore;
use crate::error::Result;
use crate::metrics;

/// Two-tier room store.
pub struct FallbackRoomStore {
    primary: Arc<dyn RoomStore>,
    fallback: Arc<dyn RoomStore>,
}

impl FallbackRoomStore {
    /// Compose a primary backend with a fallback backend.
    pub fn new(primary: Arc<dyn RoomStore>, fallback: Arc<dyn RoomStore>) -> Self {
        Self { primary, fallback }
    }
}

impl std::fmt::Debug for FallbackRoomStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackRoomStore")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

#[async_trait]
impl RoomStore for FallbackRoomStore {
    fn name(&self) -> &'static str {
        "tiered"
    }

    #[instrument(skip(self))]
    async fn load(&self, floor: u32) -> Result<Vec<Room>> {
        match self.primary.load(floor).await {
            Ok(rooms) => Ok(rooms),
            Err(e) => {
                warn!(
                    floor,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "Primary load failed, engaging fallback"
                );
                metrics::FALLBACK_ENGAGED.with_label_values(&["load"]).inc();
                self.fallback.load(floor).await
            }
        }
    }

    #[instrument(skip(self, rooms), fields(rooms = rooms.len()))]
    async fn save(&self, floor: u32, rooms: &[Room]) -> Result<()> {
        match self.primary.save(floor, rooms).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    floor,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "Primary save failed, engaging fallback"
                );
                metrics::FALLBACK_ENGAGED.with_label_values(&["save"]).inc();
                self.fallback.save(floor, rooms).await
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        match self.primary.health_check().await {
            Ok(healthy) => Ok(healthy),
            Err(_) => self.fallback.health_check().await,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{FailingRoomStore, MemoryRoomStore};
    use crate::domain::model::RoomStatus;

    fn rooms_for(floor: u32) -> Vec<Room> {
        let mut room = Room::available(floor, 1, floor * 100 + 1);
        room.status = RoomStatus::Rented;
        room.guest_name = Some("Clara".to_string());
        room.guest_phone = Some("3020001111".to_string());
        vec![room]
    }

    #[tokio::test]
    async fn test_primary_serves_when_healthy() {
        let primary = Arc::new(MemoryRoomStore::new());
        let fallback = Arc::new(MemoryRoomStore::new());
        let store = FallbackRoomStore::new(primary.clone(), fallback.clone());

        store.save(1, &rooms_for(1)).await.unwrap();

        assert_eq!(primary.len(), 1);
        assert_eq!(fallback.len(), 0);
        assert_eq!(store.load(1).await.unwrap(), rooms_for(1));
    }

    #[tokio::test]
    async fn test_fallback_round_trip_when_primary_is_down() {
        let store = FallbackRoomStore::new(
            Arc::new(FailingRoomStore::new()),
            Arc::new(MemoryRoomStore::new()),
        );

        let rooms = rooms_for(2);
        store.save(2, &rooms).await.unwrap();
        assert_eq!(store.load(2).await.unwrap(), rooms);
    }

    #[tokio::test]
    async fn test_both_tiers_failing_surfaces_the_error() {
        let store = FallbackRoomStore::new(
            Arc::new(FailingRoomStore::new()),
            Arc::new(FailingRoomStore::new()),
        );

        assert!(store.load(1).await.is_err());
        assert!(store.save(1, &rooms_for(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_health_check_prefers_primary_then_falls_back() {
        let healthy = FallbackRoomStore::new(
            Arc::new(MemoryRoomStore::new()),
            Arc::new(FailingRoomStore::new()),
        );
        assert!(healthy.health_check().await.unwrap());

        let degraded = FallbackRoomStore::new(
            Arc::new(FailingRoomStore::new()),
            Arc::new(MemoryRoomStore::new()),
        );
        assert!(degraded.health_check().await.unwrap());
    }
}
