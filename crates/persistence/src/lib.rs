//! MySQL persistence layer for the rail assistant
//!
//! Provides the stores behind the conversational action handlers:
//! - Train details and fares
//! - Reservations, booking history, and the cancellation transaction
//! - Station directory
//!
//! Each store is a trait with a MySQL implementation; an in-memory
//! implementation backs tests and database-less development.

pub mod bookings;
pub mod client;
pub mod error;
pub mod memory;
pub mod schema;
pub mod stations;
pub mod trains;

pub use bookings::{
    BookingRecord, BookingStore, CancelOutcome, MySqlBookingStore, PnrDetails, UserDetails,
};
pub use client::Db;
pub use error::StoreError;
pub use memory::InMemoryRailStore;
pub use stations::{MySqlStationStore, Station, StationStore};
pub use trains::{FareEntry, MySqlTrainStore, TrainStore, TrainSummary};

use rail_assist_config::DatabaseConfig;

/// Combined persistence layer with all stores
pub struct PersistenceLayer {
    pub trains: MySqlTrainStore,
    pub bookings: MySqlBookingStore,
    pub stations: MySqlStationStore,
}

/// Connect to MySQL, ensure the schema exists, and build all stores.
pub async fn init(config: &DatabaseConfig) -> Result<PersistenceLayer, StoreError> {
    let db = Db::connect(config).await?;
    schema::ensure_schema(db.pool()).await?;

    Ok(PersistenceLayer {
        trains: MySqlTrainStore::new(db.clone()),
        bookings: MySqlBookingStore::new(db.clone()),
        stations: MySqlStationStore::new(db),
    })
}
