//! Error types for the room board service

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the room board service
#[derive(Error, Debug)]
pub enum Error {
    /// Remote store connection error
    #[error("Remote store connection error: {0}")]
    RemoteConnection(#[source] reqwest::Error),

    /// Remote store query error
    #[error("Remote store query error: {0}")]
    RemoteQuery(String),

    /// Remote store response parse error
    #[error("Failed to parse remote store response: {0}")]
    RemoteResponseParse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Form validation error
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Floor outside the configured plan
    #[error("Unknown floor: {floor}")]
    UnknownFloor { floor: u32 },

    /// Room not present on the floor
    #[error("Room not found on floor {floor}: {room_id}")]
    RoomNotFound { floor: u32, room_id: String },

    /// Mutation or read attempted before the first load completed
    #[error("Floor {floor} is not ready yet")]
    NotReady { floor: u32 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
