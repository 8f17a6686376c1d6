//! One module per conversational action

pub mod admin;
pub mod booking_history;
pub mod cancel_ticket;
pub mod find_trains;
pub mod pnr_status;
pub mod station_info;
pub mod train_fare;
pub mod train_status;

pub use admin::{ListTrains, ListUsers, TrainsBySource};
pub use booking_history::BookingHistory;
pub use cancel_ticket::CancelTicket;
pub use find_trains::FindTrains;
pub use pnr_status::PnrStatus;
pub use station_info::StationInfo;
pub use train_fare::TrainFare;
pub use train_status::GetTrainStatus;

use crate::registry::{ActionRegistry, RegistryConfig};
use rail_assist_persistence::{BookingStore, StationStore, TrainStore};
use std::sync::Arc;

/// Slot names shared with the dialogue layer.
pub mod slots {
    pub const TRAIN_NUMBER: &str = "train_number";
    pub const PNR_NUMBER: &str = "pnr_number";
    pub const PNR_NUMBER_TO_CANCEL: &str = "pnr_number_to_cancel";
    pub const FROM_LOCATION: &str = "from_location";
    pub const TO_LOCATION: &str = "to_location";
    pub const TRAVEL_CLASS: &str = "travel_class";
    pub const USER_ID: &str = "user_id";
    pub const STATION_IDENTIFIER: &str = "station_identifier";
}

/// Build a registry with every standard handler wired to the stores.
pub fn standard_registry(
    trains: Arc<dyn TrainStore>,
    bookings: Arc<dyn BookingStore>,
    stations: Arc<dyn StationStore>,
    config: RegistryConfig,
) -> ActionRegistry {
    let mut registry = ActionRegistry::new(config);
    registry.register(Arc::new(GetTrainStatus::new(trains.clone())));
    registry.register(Arc::new(PnrStatus::new(bookings.clone())));
    registry.register(Arc::new(FindTrains::new(trains.clone())));
    registry.register(Arc::new(TrainFare::new(trains.clone())));
    registry.register(Arc::new(BookingHistory::new(bookings.clone())));
    registry.register(Arc::new(CancelTicket::new(bookings.clone())));
    registry.register(Arc::new(ListUsers::new(bookings)));
    registry.register(Arc::new(StationInfo::new(stations)));
    registry.register(Arc::new(ListTrains::new(trains.clone())));
    registry.register(Arc::new(TrainsBySource::new(trains)));
    registry
}
