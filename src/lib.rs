//! RoomBoard - Hotel Room Status Board
//!
//! A small service that keeps the per-floor room board of a single
//! property: which rooms are free, who is in the others, and which staff
//! member made the last change. State persists to a remote room table
//! through a remote-primary/local-fallback gateway, so the board keeps
//! working - in a degraded, locally-persisted mode - with no connectivity.
//!
//! # Architecture
//!
//! ```text
//! HTTP surface → Board (per-floor working set) → FallbackRoomStore
//!                                                  ├── RestRoomStore (remote table)
//!                                                  └── FileRoomStore (local blob)
//! ```
//!
//! A floor activates by loading through the store and reconciling against
//! the floor plan, so the grid is always complete; mutations apply
//! optimistically in memory and persist in the background through a
//! per-floor writer task.
//!
//! # Modules
//!
//! - [`adapters`] - Store and publisher backends implementing the domain ports
//! - [`board`] - Per-floor working set, capture/release mutations, registry
//! - [`config`] - Floor plan and numbering scheme
//! - [`domain`] - Room model, normalization, reconciliation, ports, events
//! - [`error`] - Error types
//! - [`metrics`] - Prometheus counters

pub mod adapters;
pub mod board;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use adapters::{
    FallbackRoomStore, FileRoomStore, FileStoreConfig, MemoryRoomStore, RemoteStoreConfig,
    RestRoomStore,
};
pub use board::{Board, FloorBoard, FloorSummary, GuestCapture, Occupancy};
pub use config::FloorPlan;
pub use domain::{ModifiedBy, Room, RoomId, RoomStatus};
pub use error::{Error, Result};
