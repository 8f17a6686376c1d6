//! Booking history for a registered user

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::format;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_core::UserId;
use rail_assist_persistence::BookingStore;
use std::sync::Arc;

const MAX_RESULTS: u32 = 5;

pub struct BookingHistory {
    bookings: Arc<dyn BookingStore>,
}

impl BookingHistory {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }
}

#[async_trait]
impl Action for BookingHistory {
    fn name(&self) -> &str {
        "booking_history"
    }

    async fn run(&self, slot_values: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(raw) = slot_values.get(slots::USER_ID) else {
            return Ok(
                ActionResponse::message("Please share your user ID to look up your bookings.")
                    .resetting(&[slots::USER_ID]),
            );
        };

        let Ok(user_id) = UserId::parse(raw) else {
            return Ok(ActionResponse::message(
                "A user ID is a number. Please check it and share it again.",
            )
            .resetting(&[slots::USER_ID]));
        };

        let Some(user) = self.bookings.user(user_id).await? else {
            return Ok(ActionResponse::message(format!(
                "I couldn't find an account with user ID {user_id}."
            ))
            .resetting(&[slots::USER_ID]));
        };

        let mut history = self
            .bookings
            .booking_history(user_id, MAX_RESULTS + 1)
            .await?;
        let elided = history.len() as u32 > MAX_RESULTS;
        history.truncate(MAX_RESULTS as usize);

        let response = if history.is_empty() {
            ActionResponse::message(format!("{}, you have no bookings yet.", user.name))
        } else {
            let mut response =
                ActionResponse::message(format!("Here are your recent bookings, {}:", user.name));
            for booking in &history {
                let seat = booking.seat.as_deref().unwrap_or("not assigned");
                response = response.push(format!(
                    "PNR {}: train {} from {} to {}, journey on {}, seat {} ({})",
                    booking.pnr,
                    booking.train_number,
                    booking.from_location,
                    booking.to_location,
                    format::journey_date(booking.journey_date),
                    seat,
                    booking.status,
                ));
            }
            if elided {
                response =
                    response.push(format!("Showing your latest {MAX_RESULTS} bookings."));
            }
            response
        };

        Ok(response.resetting(&[slots::USER_ID]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rail_assist_core::{Pnr, TicketStatus};
    use rail_assist_persistence::InMemoryRailStore;

    fn pnr(n: u64) -> Pnr {
        Pnr::parse(&format!("{n:010}")).unwrap()
    }

    fn seeded(history_len: u64) -> InMemoryRailStore {
        let mut store = InMemoryRailStore::new()
            .with_train(12951, "Mumbai Central", "New Delhi", None, "On Time")
            .with_user(UserId::parse("42").unwrap(), "Asha");
        for i in 0..history_len {
            store = store
                .with_reservation(
                    pnr(2_000_000_000 + i),
                    12951,
                    NaiveDate::from_ymd_opt(2025, 5, 1 + i as u32),
                    Some("SL"),
                    Some(&format!("S{}-10", i + 1)),
                    TicketStatus::Confirmed,
                )
                .with_booking(
                    UserId::parse("42").unwrap(),
                    pnr(2_000_000_000 + i),
                    NaiveDate::from_ymd_opt(2025, 4, 1 + i as u32),
                );
        }
        store
    }

    #[tokio::test]
    async fn greets_by_name_and_lists_bookings() {
        let handler = BookingHistory::new(Arc::new(seeded(2)));
        let slots = SlotValues::new().set(slots::USER_ID, "42");
        let response = handler.run(&slots).await.unwrap();
        assert!(response.messages[0].contains("Asha"));
        assert_eq!(response.messages.len(), 3);
        assert!(response.messages[1].contains("Mumbai Central"));
        // Latest journey first, with its journey date and seat.
        assert!(response.messages[1].contains("journey on 02-May-2025"));
        assert!(response.messages[1].contains("seat S2-10"));
    }

    #[tokio::test]
    async fn caps_history_at_five_with_a_note() {
        let handler = BookingHistory::new(Arc::new(seeded(8)));
        let slots = SlotValues::new().set(slots::USER_ID, "42");
        let response = handler.run(&slots).await.unwrap();
        // Header + 5 bookings + note.
        assert_eq!(response.messages.len(), 7);
        assert_eq!(
            response.messages.last().unwrap(),
            "Showing your latest 5 bookings."
        );
    }

    #[tokio::test]
    async fn unknown_user_gets_account_not_found() {
        let handler = BookingHistory::new(Arc::new(seeded(1)));
        let slots = SlotValues::new().set(slots::USER_ID, "77");
        let response = handler.run(&slots).await.unwrap();
        assert!(response.messages[0].contains("couldn't find an account"));
    }

    #[tokio::test]
    async fn user_with_no_bookings_is_told_so() {
        let handler = BookingHistory::new(Arc::new(seeded(0)));
        let slots = SlotValues::new().set(slots::USER_ID, "42");
        let response = handler.run(&slots).await.unwrap();
        assert_eq!(
            response.messages,
            vec!["Asha, you have no bookings yet.".to_string()]
        );
    }
}
