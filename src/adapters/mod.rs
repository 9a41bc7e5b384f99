//! Infrastructure Adapters
//!
//! Adapter implementations for the domain ports, following the
//! Port/Adapter (Hexagonal) architecture pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Board (Domain)                   │
//! │          RoomStore  │  EventPublisher  (ports)       │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                Adapters (This Module)                │
//! │  FallbackRoomStore                                   │
//! │    ├── RestRoomStore   (remote table, primary)       │
//! │    └── FileRoomStore   (local blob, fallback)        │
//! │  MemoryRoomStore │ FailingRoomStore │ publishers     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use roomboard::adapters::{FallbackRoomStore, FileRoomStore, RestRoomStore};
//!
//! let remote = RestRoomStore::new(remote_config)?;
//! let local = FileRoomStore::new(file_config);
//! let store = FallbackRoomStore::new(Arc::new(remote), Arc::new(local));
//! ```

mod event_publisher;
mod fallback;
mod file;
mod memory;
mod rest;
mod row;

pub use event_publisher::{InMemoryEventCollector, LoggingEventPublisher};
pub use fallback::FallbackRoomStore;
pub use file::{FileRoomStore, FileStoreConfig};
pub use memory::{FailingRoomStore, MemoryRoomStore};
pub use rest::{RestRoomStore, RemoteStoreConfig};
pub use row::RoomRow;
