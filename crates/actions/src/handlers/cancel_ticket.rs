//! Ticket cancellation
//!
//! Validates the PNR locally before any store access, then delegates to
//! the store's locking cancel transaction and phrases each outcome.

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_core::Pnr;
use rail_assist_persistence::{BookingStore, CancelOutcome};
use std::sync::Arc;

pub struct CancelTicket {
    bookings: Arc<dyn BookingStore>,
}

impl CancelTicket {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }
}

#[async_trait]
impl Action for CancelTicket {
    fn name(&self) -> &str {
        "cancel_ticket"
    }

    async fn run(&self, slot_values: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(raw) = slot_values.get(slots::PNR_NUMBER_TO_CANCEL) else {
            return Ok(ActionResponse::message(
                "Please share the 10-digit PNR of the ticket you want to cancel.",
            )
            .resetting(&[slots::PNR_NUMBER_TO_CANCEL]));
        };

        // Malformed PNRs are rejected here; the store is never touched.
        let Ok(pnr) = Pnr::parse(raw) else {
            return Ok(ActionResponse::message(
                "That PNR doesn't look right. A PNR is exactly 10 digits.",
            )
            .resetting(&[slots::PNR_NUMBER_TO_CANCEL]));
        };

        let message = match self.bookings.cancel(pnr).await? {
            CancelOutcome::Cancelled => {
                format!("Your ticket with PNR {pnr} has been cancelled.")
            }
            CancelOutcome::AlreadyCancelled => {
                format!("The ticket with PNR {pnr} is already cancelled.")
            }
            CancelOutcome::NotFound => {
                format!("I couldn't find a reservation under PNR {pnr}.")
            }
            CancelOutcome::Busy => {
                "The reservation system is busy right now. Please try again in a moment."
                    .to_string()
            }
        };

        Ok(ActionResponse::message(message).resetting(&[slots::PNR_NUMBER_TO_CANCEL]))
    }
}
