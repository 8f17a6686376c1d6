//! Train details and fare stores

use crate::client::Db;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveTime;

/// One row of the train directory
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    pub train_number: u64,
    pub from_location: String,
    pub to_location: String,
    pub departure: Option<NaiveTime>,
    pub status: String,
}

/// Fare for one travel class of a train
#[derive(Debug, Clone, PartialEq)]
pub struct FareEntry {
    pub class: String,
    pub fare: f64,
}

/// Read access to the train directory and fare chart
#[async_trait]
pub trait TrainStore: Send + Sync {
    /// Look up a single train by number.
    async fn train(&self, train_number: u64) -> Result<Option<TrainSummary>, StoreError>;

    /// Trains running between two locations, matched case-insensitively
    /// on substrings of the endpoint names, ordered by departure time.
    async fn find_trains(
        &self,
        from: &str,
        to: &str,
        limit: u32,
    ) -> Result<Vec<TrainSummary>, StoreError>;

    /// Trains departing from a location, ordered by departure time.
    async fn trains_from(&self, from: &str, limit: u32) -> Result<Vec<TrainSummary>, StoreError>;

    /// All trains in the directory, ordered by train number.
    async fn all_trains(&self, limit: u32) -> Result<Vec<TrainSummary>, StoreError>;

    /// Fare chart for a train, one entry per travel class.
    async fn fares(&self, train_number: u64) -> Result<Vec<FareEntry>, StoreError>;

    /// Whether the train exists at all. Distinguishes "unknown train"
    /// from "train with no fare chart".
    async fn train_exists(&self, train_number: u64) -> Result<bool, StoreError>;
}

/// [`TrainStore`] backed by MySQL
#[derive(Clone)]
pub struct MySqlTrainStore {
    db: Db,
}

impl MySqlTrainStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

type TrainRow = (u64, String, String, Option<NaiveTime>, String);

fn row_to_summary(row: TrainRow) -> TrainSummary {
    TrainSummary {
        train_number: row.0,
        from_location: row.1,
        to_location: row.2,
        departure: row.3,
        status: row.4,
    }
}

/// Substring pattern for a case-insensitive LIKE match
fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim().to_lowercase())
}

#[async_trait]
impl TrainStore for MySqlTrainStore {
    async fn train(&self, train_number: u64) -> Result<Option<TrainSummary>, StoreError> {
        let row: Option<TrainRow> = sqlx::query_as(
            "SELECT train_number, from_location, to_location, timings, status
             FROM train_details WHERE train_number = ?",
        )
        .bind(train_number)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(row_to_summary))
    }

    async fn find_trains(
        &self,
        from: &str,
        to: &str,
        limit: u32,
    ) -> Result<Vec<TrainSummary>, StoreError> {
        let rows: Vec<TrainRow> = sqlx::query_as(
            "SELECT train_number, from_location, to_location, timings, status
             FROM train_details
             WHERE LOWER(from_location) LIKE ? AND LOWER(to_location) LIKE ?
             ORDER BY timings
             LIMIT ?",
        )
        .bind(like_pattern(from))
        .bind(like_pattern(to))
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn trains_from(&self, from: &str, limit: u32) -> Result<Vec<TrainSummary>, StoreError> {
        let rows: Vec<TrainRow> = sqlx::query_as(
            "SELECT train_number, from_location, to_location, timings, status
             FROM train_details
             WHERE LOWER(from_location) LIKE ?
             ORDER BY timings
             LIMIT ?",
        )
        .bind(like_pattern(from))
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn all_trains(&self, limit: u32) -> Result<Vec<TrainSummary>, StoreError> {
        let rows: Vec<TrainRow> = sqlx::query_as(
            "SELECT train_number, from_location, to_location, timings, status
             FROM train_details
             ORDER BY train_number
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn fares(&self, train_number: u64) -> Result<Vec<FareEntry>, StoreError> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            "SELECT class, fare FROM train_fare WHERE train_number = ? ORDER BY fare",
        )
        .bind(train_number)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(class, fare)| FareEntry { class, fare })
            .collect())
    }

    async fn train_exists(&self, train_number: u64) -> Result<bool, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM train_details WHERE train_number = ?")
                .bind(train_number)
                .fetch_one(self.db.pool())
                .await?;

        Ok(count > 0)
    }
}
