//! Remote Room Table Adapter
//!
//! Implements the `RoomStore` port against a PostgREST-style table
//! resource: reads filtered by floor, writes as per-row upserts keyed on
//! the composite `(floor, room_number)`.
//!
//! Failure semantics follow the tiered-persistence contract: a transport
//! failure (unreachable host, timeout) or an error on the read path
//! surfaces as an error for the fallback decorator to catch. A rejected
//! row inside a write batch does not abort the batch; it is logged and
//! counted, and the remaining rows still go out. Partial batches are not
//! rolled back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::row::RoomRow;
use crate::domain::model::Room;
use crate::domain::ports::RoomStore;
use crate::error::{Error, Result};
use crate::metrics;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the remote room table.
#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    /// Base URL of the REST gateway
    pub base_url: String,

    /// API key, sent both as `apikey` header and bearer token
    pub api_key: String,

    /// Table name under `/rest/v1/`
    pub table: String,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: String::new(),
            table: "rooms".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

// =============================================================================
// Adapter
// =============================================================================

/// Remote-table room store.
pub struct RestRoomStore {
    config: RemoteStoreConfig,
    client: Client,
}

impl RestRoomStore {
    /// Create a new remote store adapter.
    pub fn new(config: RemoteStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }
}

impl std::fmt::Debug for RestRoomStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestRoomStore")
            .field("base_url", &self.config.base_url)
            .field("table", &self.config.table)
            .finish()
    }
}

#[async_trait]
impl RoomStore for RestRoomStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    #[instrument(skip(self))]
    async fn load(&self, floor: u32) -> Result<Vec<Room>> {
        let floor_filter = format!("eq.{}", floor);
        let response = self
            .request(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("floor", floor_filter.as_str())])
            .send()
            .await
            .map_err(Error::RemoteConnection)?;

        if !response.status().is_success() {
            return Err(Error::RemoteQuery(format!(
                "Load for floor {} returned {}",
                floor,
                response.status()
            )));
        }

        let rows: Vec<RoomRow> = response
            .json()
            .await
            .map_err(|e| Error::RemoteResponseParse(e.to_string()))?;

        debug!(floor, rows = rows.len(), "Loaded rooms from remote table");
        Ok(rows.into_iter().map(RoomRow::into_room).collect())
    }

    #[instrument(skip(self, rooms), fields(rooms = rooms.len()))]
    async fn save(&self, floor: u32, rooms: &[Room]) -> Result<()> {
        let mut rejected = 0usize;

        for room in rooms {
            let row = RoomRow::from_room(room);
            let response = self
                .request(self.client.post(self.table_url()))
                .query(&[("on_conflict", "floor,room_number")])
                .header("Prefer", "resolution=merge-duplicates")
                .json(&row)
                .send()
                .await
                .map_err(Error::RemoteConnection)?;

            if !response.status().is_success() {
                warn!(
                    floor,
                    number = room.number,
                    status = %response.status(),
                    "Room upsert rejected by remote table"
                );
                metrics::REMOTE_ROW_FAILURES.inc();
                rejected += 1;
            }
        }

        if rejected > 0 {
            warn!(
                floor,
                rejected,
                total = rooms.len(),
                "Partial batch save: some rooms were not persisted remotely"
            );
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .request(self.client.get(self.table_url()))
            .query(&[("select", "room_number"), ("limit", "1")])
            .send()
            .await
            .map_err(Error::RemoteConnection)?;

        if response.status().is_success() {
            Ok(true)
        } else {
            Err(Error::RemoteQuery(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
