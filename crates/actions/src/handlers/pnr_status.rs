//! PNR status lookup

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::format;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_core::Pnr;
use rail_assist_persistence::BookingStore;
use std::sync::Arc;

pub struct PnrStatus {
    bookings: Arc<dyn BookingStore>,
}

impl PnrStatus {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }
}

#[async_trait]
impl Action for PnrStatus {
    fn name(&self) -> &str {
        "pnr_status"
    }

    async fn run(&self, slots: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(raw) = slots.get(slots::PNR_NUMBER) else {
            return Ok(ActionResponse::message(
                "Please share the 10-digit PNR number on your ticket.",
            )
            .resetting(&[slots::PNR_NUMBER]));
        };

        let Ok(pnr) = Pnr::parse(raw) else {
            return Ok(ActionResponse::message(
                "A PNR is a 10-digit number. Please check it and share it again.",
            )
            .resetting(&[slots::PNR_NUMBER]));
        };

        let response = match self.bookings.pnr_details(pnr).await? {
            Some(details) => {
                let class = details.class.as_deref().unwrap_or("not assigned");
                let seat = details.seat.as_deref().unwrap_or("not assigned");
                ActionResponse::message(format!(
                    "PNR {}: train {} from {} to {} on {}, departing at {}. \
                     Class: {}. Seat: {}. Ticket status: {}. Train status: {}.",
                    details.pnr,
                    details.train_number,
                    details.from_location,
                    details.to_location,
                    format::journey_date(details.travel_date),
                    format::departure_time(details.departure),
                    class,
                    seat,
                    details.status,
                    details.train_status,
                ))
            }
            None => ActionResponse::message(format!(
                "I couldn't find a reservation under PNR {pnr}."
            )),
        };

        Ok(response.resetting(&[slots::PNR_NUMBER]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rail_assist_core::TicketStatus;
    use rail_assist_persistence::InMemoryRailStore;

    fn handler() -> PnrStatus {
        let store = InMemoryRailStore::new()
            .with_train(
                12951,
                "Mumbai Central",
                "New Delhi",
                NaiveTime::from_hms_opt(17, 0, 0),
                "On Time",
            )
            .with_reservation(
                Pnr::parse("4312876590").unwrap(),
                12951,
                NaiveDate::from_ymd_opt(2025, 6, 1),
                Some("3A"),
                Some("B2-41"),
                TicketStatus::Confirmed,
            );
        PnrStatus::new(Arc::new(store))
    }

    #[tokio::test]
    async fn reports_full_reservation_details() {
        let slots = SlotValues::new().set(slots::PNR_NUMBER, "4312876590");
        let response = handler().run(&slots).await.unwrap();
        let message = &response.messages[0];
        assert!(message.contains("PNR 4312876590"));
        assert!(message.contains("train 12951"));
        assert!(message.contains("01-Jun-2025"));
        assert!(message.contains("departing at 17:00"));
        assert!(message.contains("Class: 3A"));
        assert!(message.contains("Seat: B2-41"));
        assert!(message.contains("Ticket status: Confirmed"));
        assert!(message.contains("Train status: On Time"));
    }

    #[tokio::test]
    async fn malformed_pnr_never_reaches_the_store() {
        for bad in ["123", "12345abcde", "12345678901"] {
            let slots = SlotValues::new().set(slots::PNR_NUMBER, bad);
            let response = handler().run(&slots).await.unwrap();
            assert!(response.messages[0].contains("10-digit"), "input: {bad}");
        }
    }

    #[tokio::test]
    async fn unknown_pnr_gets_not_found_message() {
        let slots = SlotValues::new().set(slots::PNR_NUMBER, "9999999999");
        let response = handler().run(&slots).await.unwrap();
        assert!(response.messages[0].contains("couldn't find a reservation"));
    }
}
