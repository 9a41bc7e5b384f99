//! Floor Board - In-Memory State Controller
//!
//! The per-floor authoritative working set the UI renders and mutates.
//! A floor activates by loading through the store, reconciling against the
//! floor plan, and marking itself ready; only then are reads and mutations
//! accepted. Mutations apply synchronously in memory and queue a snapshot
//! for a per-floor background writer task, so the caller never waits on
//! persistence.
//!
//! Consistency model: last-writer-wins at the store via the
//! `(floor, number)` upsert key. There is no cross-device coordination;
//! with a single property and a handful of staff this is an accepted gap,
//! not an oversight.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::FloorPlan;
use crate::domain::events::BoardEvent;
use crate::domain::model::{ModifiedBy, Room, RoomId, RoomStatus};
use crate::domain::ports::{EventPublisher, RoomStore};
use crate::domain::reconcile::reconcile;
use crate::error::{Error, Result};
use crate::metrics;

// =============================================================================
// Capture Form
// =============================================================================

/// Capture form for moving a room to occupied or rented.
#[derive(Debug, Clone, Deserialize)]
pub struct GuestCapture {
    pub guest_name: String,
    pub guest_phone: String,
    pub status: RoomStatus,
    pub modified_by: ModifiedBy,
}

impl GuestCapture {
    /// Field-level validation mirroring the capture form: non-empty name
    /// and phone, and a non-available target status.
    pub fn validate(&self) -> Result<()> {
        if self.guest_name.trim().is_empty() {
            return Err(Error::Validation {
                field: "guest_name",
                reason: "guest name must not be empty".to_string(),
            });
        }
        if self.guest_phone.trim().is_empty() {
            return Err(Error::Validation {
                field: "guest_phone",
                reason: "guest phone must not be empty".to_string(),
            });
        }
        if self.status == RoomStatus::Available {
            return Err(Error::Validation {
                field: "status",
                reason: "capture must target occupied or rented".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Occupancy
// =============================================================================

/// Occupancy counters shown in the floor header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub available: usize,
    pub occupied: usize,
    pub rented: usize,
}

/// Per-floor summary for the home view.
#[derive(Debug, Clone, Serialize)]
pub struct FloorSummary {
    pub floor: u32,
    #[serde(flatten)]
    pub occupancy: Occupancy,
}

// =============================================================================
// Floor Board
// =============================================================================

struct FloorState {
    rooms: Vec<Room>,
    ready: bool,
}

struct FloorWriter {
    tx: mpsc::UnboundedSender<Vec<Room>>,
    handle: JoinHandle<()>,
}

/// Per-floor authoritative working set.
pub struct FloorBoard {
    floor: u32,
    plan: FloorPlan,
    store: Arc<dyn RoomStore>,
    events: Arc<dyn EventPublisher>,
    state: RwLock<FloorState>,
    writer: RwLock<Option<FloorWriter>>,
    // Serializes activation so concurrent first accesses load only once
    activation: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for FloorBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorBoard")
            .field("floor", &self.floor)
            .finish_non_exhaustive()
    }
}

impl FloorBoard {
    /// Create an inactive board for a floor. Nothing is loaded until
    /// [`FloorBoard::activate`] runs.
    pub fn new(
        floor: u32,
        plan: FloorPlan,
        store: Arc<dyn RoomStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            floor,
            plan,
            store,
            events,
            state: RwLock::new(FloorState {
                rooms: Vec::new(),
                ready: false,
            }),
            writer: RwLock::new(None),
            activation: tokio::sync::Mutex::new(()),
        }
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().ready
    }

    /// Load, reconcile, and mark the floor ready. Idempotent.
    ///
    /// Mutations are rejected until this completes: a save must never fire
    /// before the first load, or defaults would overwrite real data.
    #[instrument(skip(self), fields(floor = self.floor))]
    pub async fn activate(&self) -> Result<()> {
        let _guard = self.activation.lock().await;
        if self.state.read().ready {
            return Ok(());
        }

        let loaded = self.store.load(self.floor).await?;
        let rooms = reconcile(&self.plan, self.floor, loaded);
        info!(
            floor = self.floor,
            rooms = rooms.len(),
            store = self.store.name(),
            "Floor activated"
        );
        self.publish(BoardEvent::floor_activated(self.floor, rooms.len()))
            .await;

        {
            let mut state = self.state.write();
            state.rooms = rooms;
            state.ready = true;
        }
        self.spawn_writer();
        Ok(())
    }

    /// Snapshot of the working set.
    pub fn rooms(&self) -> Result<Vec<Room>> {
        let state = self.state.read();
        if !state.ready {
            return Err(Error::NotReady { floor: self.floor });
        }
        Ok(state.rooms.clone())
    }

    /// Occupancy counters over the working set.
    pub fn occupancy(&self) -> Result<Occupancy> {
        let rooms = self.rooms()?;
        Ok(Occupancy {
            available: rooms
                .iter()
                .filter(|r| r.status == RoomStatus::Available)
                .count(),
            occupied: rooms
                .iter()
                .filter(|r| r.status == RoomStatus::Occupied)
                .count(),
            rented: rooms
                .iter()
                .filter(|r| r.status == RoomStatus::Rented)
                .count(),
        })
    }

    /// Capture a room as occupied or rented with guest details.
    ///
    /// Replaces exactly the matching room's status and guest fields; every
    /// other room is untouched. The updated room is returned immediately;
    /// persistence runs in the background.
    #[instrument(skip(self, form), fields(floor = self.floor, room = %room_id))]
    pub async fn capture(&self, room_id: &RoomId, form: GuestCapture) -> Result<Room> {
        form.validate()?;

        let updated = {
            let mut state = self.state.write();
            if !state.ready {
                return Err(Error::NotReady { floor: self.floor });
            }
            let room = state
                .rooms
                .iter_mut()
                .find(|r| &r.id == room_id)
                .ok_or_else(|| Error::RoomNotFound {
                    floor: self.floor,
                    room_id: room_id.to_string(),
                })?;

            room.status = form.status;
            room.guest_name = Some(form.guest_name.trim().to_string());
            room.guest_phone = Some(form.guest_phone.trim().to_string());
            room.modified_by = Some(form.modified_by);
            room.clone()
        };

        metrics::ROOM_CAPTURES.inc();
        self.publish(BoardEvent::room_captured(&updated)).await;
        self.queue_save();
        Ok(updated)
    }

    /// Release a room back to available. One action, no confirmation.
    ///
    /// Guest fields are cleared on revert; stale guest data must not
    /// outlive the stay.
    #[instrument(skip(self), fields(floor = self.floor, room = %room_id))]
    pub async fn release(&self, room_id: &RoomId) -> Result<Room> {
        let updated = {
            let mut state = self.state.write();
            if !state.ready {
                return Err(Error::NotReady { floor: self.floor });
            }
            let room = state
                .rooms
                .iter_mut()
                .find(|r| &r.id == room_id)
                .ok_or_else(|| Error::RoomNotFound {
                    floor: self.floor,
                    room_id: room_id.to_string(),
                })?;

            room.status = RoomStatus::Available;
            room.guest_name = None;
            room.guest_phone = None;
            room.modified_by = None;
            room.clone()
        };

        metrics::ROOM_RELEASES.inc();
        self.publish(BoardEvent::room_released(&updated)).await;
        self.queue_save();
        Ok(updated)
    }

    /// Drain queued saves and stop the writer task.
    pub async fn close(&self) {
        let writer = self.writer.write().take();
        if let Some(FloorWriter { tx, handle }) = writer {
            drop(tx);
            if let Err(e) = handle.await {
                warn!(floor = self.floor, error = %e, "Floor writer task failed");
            }
        }
    }

    /// Queue the current working set for background persistence.
    fn queue_save(&self) {
        let snapshot = self.state.read().rooms.clone();
        let writer = self.writer.read();
        match writer.as_ref() {
            Some(w) => {
                // Send only fails when the writer already shut down
                if w.tx.send(snapshot).is_err() {
                    warn!(floor = self.floor, "Writer is closed, snapshot not persisted");
                }
            }
            None => warn!(floor = self.floor, "No writer for floor, snapshot not persisted"),
        }
    }

    fn spawn_writer(&self) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<Room>>();
        let store = Arc::clone(&self.store);
        let events = Arc::clone(&self.events);
        let floor = self.floor;

        let handle = tokio::spawn(async move {
            while let Some(snapshot) = rx.recv().await {
                match store.save(floor, &snapshot).await {
                    Ok(()) => {
                        debug!(floor, rooms = snapshot.len(), "Floor snapshot persisted");
                        if let Err(e) = events
                            .publish(BoardEvent::floor_saved(floor, snapshot.len()))
                            .await
                        {
                            debug!(floor, error = %e, "Event publish failed");
                        }
                    }
                    Err(e) => {
                        metrics::FLOOR_SAVE_FAILURES.inc();
                        warn!(floor, error = %e, "Floor snapshot could not be persisted to any tier");
                        if let Err(e) = events
                            .publish(BoardEvent::floor_save_failed(floor, e.to_string()))
                            .await
                        {
                            debug!(floor, error = %e, "Event publish failed");
                        }
                    }
                }
            }
        });

        *self.writer.write() = Some(FloorWriter { tx, handle });
    }

    /// Event publishing is diagnostics; a failing publisher must not fail
    /// a mutation.
    async fn publish(&self, event: BoardEvent) {
        if let Err(e) = self.events.publish(event).await {
            debug!(floor = self.floor, error = %e, "Event publish failed");
        }
    }
}

// =============================================================================
// Board Registry
// =============================================================================

/// Lazily-activated registry of floor boards, one per configured floor.
pub struct Board {
    plan: FloorPlan,
    store: Arc<dyn RoomStore>,
    events: Arc<dyn EventPublisher>,
    floors: DashMap<u32, Arc<FloorBoard>>,
}

impl Board {
    /// Create a board over the given plan and store.
    pub fn new(
        plan: FloorPlan,
        store: Arc<dyn RoomStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            plan,
            store,
            events,
            floors: DashMap::new(),
        }
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    /// Get the floor's board, activating it on first access.
    pub async fn floor(&self, floor: u32) -> Result<Arc<FloorBoard>> {
        if !self.plan.contains_floor(floor) {
            return Err(Error::UnknownFloor { floor });
        }

        let board = self
            .floors
            .entry(floor)
            .or_insert_with(|| {
                Arc::new(FloorBoard::new(
                    floor,
                    self.plan.clone(),
                    Arc::clone(&self.store),
                    Arc::clone(&self.events),
                ))
            })
            .clone();

        board.activate().await?;
        Ok(board)
    }

    /// Occupancy summaries for every floor, for the home view.
    pub async fn summaries(&self) -> Result<Vec<FloorSummary>> {
        let mut summaries = Vec::with_capacity(self.plan.floors as usize);
        for floor in 1..=self.plan.floors {
            let board = self.floor(floor).await?;
            summaries.push(FloorSummary {
                floor,
                occupancy: board.occupancy()?,
            });
        }
        Ok(summaries)
    }

    /// Drain every active floor's writer.
    pub async fn close(&self) {
        let boards: Vec<Arc<FloorBoard>> =
            self.floors.iter().map(|entry| entry.value().clone()).collect();
        for board in boards {
            board.close().await;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventCollector, MemoryRoomStore, RoomRow};
    use assert_matches::assert_matches;

    fn test_board(store: Arc<MemoryRoomStore>) -> (Board, Arc<InMemoryEventCollector>) {
        let events = Arc::new(InMemoryEventCollector::new());
        let board = Board::new(
            FloorPlan::default(),
            store,
            Arc::clone(&events) as Arc<dyn EventPublisher>,
        );
        (board, events)
    }

    fn capture_form() -> GuestCapture {
        GuestCapture {
            guest_name: "Juan Pérez".to_string(),
            guest_phone: "3001234567".to_string(),
            status: RoomStatus::Occupied,
            modified_by: ModifiedBy::Administrador,
        }
    }

    #[tokio::test]
    async fn test_activation_yields_full_default_floor() {
        let (board, events) = test_board(Arc::new(MemoryRoomStore::new()));

        let floor = board.floor(2).await.unwrap();
        let rooms = floor.rooms().unwrap();

        assert_eq!(rooms.len(), 10);
        assert_eq!(rooms[0].number, 201);
        assert_eq!(rooms[9].number, 210);
        assert!(rooms.iter().all(Room::is_available));
        assert_eq!(events.events_of_type("FloorActivated").len(), 1);
    }

    #[tokio::test]
    async fn test_activation_is_idempotent() {
        let (board, events) = test_board(Arc::new(MemoryRoomStore::new()));

        let first = board.floor(1).await.unwrap();
        first
            .capture(&RoomId::derive(1, 1), capture_form())
            .await
            .unwrap();

        // Second access must not reload over the mutation
        let second = board.floor(1).await.unwrap();
        assert_eq!(
            second.rooms().unwrap()[0].status,
            RoomStatus::Occupied
        );
        assert_eq!(events.events_of_type("FloorActivated").len(), 1);
    }

    #[tokio::test]
    async fn test_capture_then_release_scenario() {
        let (board, _) = test_board(Arc::new(MemoryRoomStore::new()));
        let floor = board.floor(2).await.unwrap();
        let room_id = RoomId::derive(2, 1);

        let captured = floor.capture(&room_id, capture_form()).await.unwrap();
        assert_eq!(captured.number, 201);
        assert_eq!(captured.status, RoomStatus::Occupied);
        assert_eq!(captured.guest_name.as_deref(), Some("Juan Pérez"));
        assert_eq!(captured.guest_phone.as_deref(), Some("3001234567"));
        assert_eq!(captured.modified_by, Some(ModifiedBy::Administrador));

        // Every other room untouched
        let rooms = floor.rooms().unwrap();
        assert_eq!(rooms.iter().filter(|r| !r.is_available()).count(), 1);

        // Releasing clears guest fields
        let released = floor.release(&room_id).await.unwrap();
        assert_eq!(released.status, RoomStatus::Available);
        assert_eq!(released.guest_name, None);
        assert_eq!(released.guest_phone, None);
        assert_eq!(released.modified_by, None);
    }

    #[tokio::test]
    async fn test_empty_phone_is_rejected_and_room_unchanged() {
        let (board, _) = test_board(Arc::new(MemoryRoomStore::new()));
        let floor = board.floor(1).await.unwrap();
        let room_id = RoomId::derive(1, 1);

        let form = GuestCapture {
            guest_phone: "   ".to_string(),
            ..capture_form()
        };
        let result = floor.capture(&room_id, form).await;

        assert_matches!(
            result,
            Err(Error::Validation {
                field: "guest_phone",
                ..
            })
        );
        assert!(floor.rooms().unwrap().iter().all(Room::is_available));
    }

    #[tokio::test]
    async fn test_capture_to_available_is_rejected() {
        let (board, _) = test_board(Arc::new(MemoryRoomStore::new()));
        let floor = board.floor(1).await.unwrap();

        let form = GuestCapture {
            status: RoomStatus::Available,
            ..capture_form()
        };
        let result = floor.capture(&RoomId::derive(1, 1), form).await;

        assert_matches!(result, Err(Error::Validation { field: "status", .. }));
    }

    #[tokio::test]
    async fn test_mutations_rejected_before_activation() {
        let store: Arc<dyn RoomStore> = Arc::new(MemoryRoomStore::new());
        let events: Arc<dyn EventPublisher> = Arc::new(InMemoryEventCollector::new());
        let floor = FloorBoard::new(1, FloorPlan::default(), store, events);

        assert_matches!(
            floor.capture(&RoomId::derive(1, 1), capture_form()).await,
            Err(Error::NotReady { floor: 1 })
        );
        assert_matches!(
            floor.release(&RoomId::derive(1, 1)).await,
            Err(Error::NotReady { floor: 1 })
        );
        assert_matches!(floor.rooms(), Err(Error::NotReady { floor: 1 }));
    }

    #[tokio::test]
    async fn test_unknown_room_and_floor() {
        let (board, _) = test_board(Arc::new(MemoryRoomStore::new()));

        assert_matches!(
            board.floor(4).await,
            Err(Error::UnknownFloor { floor: 4 })
        );

        let floor = board.floor(1).await.unwrap();
        assert_matches!(
            floor.release(&RoomId::from("room-1-99")).await,
            Err(Error::RoomNotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_partial_store_reconciles_on_activation() {
        let store = Arc::new(MemoryRoomStore::new());
        for number in 101..=105 {
            store.seed(RoomRow {
                room_number: number,
                floor: 1,
                status: "ocupada".to_string(),
                guest_name: Some("Ana".to_string()),
                guest_phone: Some("3000000000".to_string()),
                modified_by: Some("Rocio".to_string()),
            });
        }

        let (board, _) = test_board(store);
        let floor = board.floor(1).await.unwrap();
        let rooms = floor.rooms().unwrap();

        assert_eq!(rooms.len(), 10);
        assert!(rooms[..5].iter().all(|r| r.status == RoomStatus::Occupied));
        assert!(rooms[5..].iter().all(Room::is_available));
        assert_eq!(rooms[5].number, 106);
    }

    #[tokio::test]
    async fn test_mutations_are_persisted_through_the_writer() {
        let store = Arc::new(MemoryRoomStore::new());
        let (board, events) = test_board(Arc::clone(&store));

        let floor = board.floor(3).await.unwrap();
        floor
            .capture(&RoomId::derive(3, 2), capture_form())
            .await
            .unwrap();
        board.close().await;

        let persisted = store.load(3).await.unwrap();
        assert_eq!(persisted.len(), 10);
        let room = persisted.iter().find(|r| r.number == 302).unwrap();
        assert_eq!(room.status, RoomStatus::Occupied);
        assert_eq!(room.guest_name.as_deref(), Some("Juan Pérez"));
        assert_eq!(events.events_of_type("FloorSaved").len(), 1);
    }

    #[tokio::test]
    async fn test_occupancy_counters() {
        let (board, _) = test_board(Arc::new(MemoryRoomStore::new()));
        let floor = board.floor(1).await.unwrap();

        floor
            .capture(&RoomId::derive(1, 1), capture_form())
            .await
            .unwrap();
        floor
            .capture(
                &RoomId::derive(1, 2),
                GuestCapture {
                    status: RoomStatus::Rented,
                    ..capture_form()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            floor.occupancy().unwrap(),
            Occupancy {
                available: 8,
                occupied: 1,
                rented: 1
            }
        );

        let summaries = board.summaries().await.unwrap();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].occupancy.available, 8);
        assert_eq!(summaries[1].occupancy.available, 10);
    }
}
