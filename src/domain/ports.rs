//! Domain Ports (Port/Adapter Pattern)
//!
//! Trait abstractions the board depends on. Infrastructure adapters
//! implement these to provide concrete backends.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Board (Domain)                   │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │             Ports (Traits)                     │  │
//! │  │     RoomStore      │      EventPublisher       │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                 Adapters (Impls)                     │
//! │  RestRoomStore │ FileRoomStore │ FallbackRoomStore   │
//! │  MemoryRoomStore │ LoggingEventPublisher             │
//! └──────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::domain::events::BoardEvent;
use crate::domain::model::Room;
use crate::error::Result;

// =============================================================================
// Room Store Port
// =============================================================================

/// Port for loading and saving a floor's rooms.
///
/// Implementations normalize statuses on read, so nothing outside the
/// three-value vocabulary ever reaches the board or the reconciler. A load
/// may return fewer rooms than the floor plan requires; reconciliation is
/// the caller's job.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Load all rooms persisted for a floor.
    async fn load(&self, floor: u32) -> Result<Vec<Room>>;

    /// Persist a floor's rooms, upserting by `(floor, number)`.
    ///
    /// Best-effort and not transactional across the batch; a partial
    /// failure leaves the rows that did go out in place.
    async fn save(&self, floor: u32, rooms: &[Room]) -> Result<()>;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> Result<bool>;
}

// =============================================================================
// Event Publisher Port
// =============================================================================

/// Port for publishing board events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a board event.
    async fn publish(&self, event: BoardEvent) -> Result<()>;

    /// Publish multiple events.
    async fn publish_all(&self, events: Vec<BoardEvent>) -> Result<()> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
