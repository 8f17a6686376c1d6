//! Station directory store

use crate::client::Db;
use crate::error::StoreError;
use async_trait::async_trait;

/// One station directory row
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub code: String,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Read access to the station directory
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Look up stations by name substring or exact code, both
    /// case-insensitive.
    async fn find_stations(&self, term: &str, limit: u32) -> Result<Vec<Station>, StoreError>;
}

/// [`StationStore`] backed by MySQL
#[derive(Clone)]
pub struct MySqlStationStore {
    db: Db,
}

impl MySqlStationStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StationStore for MySqlStationStore {
    async fn find_stations(&self, term: &str, limit: u32) -> Result<Vec<Station>, StoreError> {
        let needle = term.trim().to_lowercase();
        let rows: Vec<(String, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT station_code, station_name, city, state
             FROM stations
             WHERE LOWER(station_name) LIKE ? OR LOWER(station_code) = ?
             ORDER BY station_name
             LIMIT ?",
        )
        .bind(format!("%{needle}%"))
        .bind(&needle)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(code, name, city, state)| Station {
                code,
                name,
                city,
                state,
            })
            .collect())
    }
}
