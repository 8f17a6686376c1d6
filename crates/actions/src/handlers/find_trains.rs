//! Train search between two locations

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::format;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_persistence::{TrainStore, TrainSummary};
use std::sync::Arc;

const MAX_RESULTS: u32 = 10;

pub struct FindTrains {
    trains: Arc<dyn TrainStore>,
}

impl FindTrains {
    pub fn new(trains: Arc<dyn TrainStore>) -> Self {
        Self { trains }
    }
}

pub(crate) fn train_line(train: &TrainSummary) -> String {
    format!(
        "{}: {} to {}, departs {} ({})",
        train.train_number,
        train.from_location,
        train.to_location,
        format::departure_time(train.departure),
        train.status,
    )
}

#[async_trait]
impl Action for FindTrains {
    fn name(&self) -> &str {
        "find_trains"
    }

    async fn run(&self, slot_values: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(from) = slot_values.get(slots::FROM_LOCATION) else {
            return Ok(
                ActionResponse::message("Which station are you travelling from?")
                    .resetting(&[slots::FROM_LOCATION]),
            );
        };
        let Some(to) = slot_values.get(slots::TO_LOCATION) else {
            return Ok(ActionResponse::message("And where would you like to go?")
                .resetting(&[slots::TO_LOCATION]));
        };

        // Fetch one past the display limit to know whether to mention
        // that results were elided.
        let mut found = self.trains.find_trains(from, to, MAX_RESULTS + 1).await?;
        let elided = found.len() as u32 > MAX_RESULTS;
        found.truncate(MAX_RESULTS as usize);

        let response = if found.is_empty() {
            ActionResponse::message(format!(
                "I couldn't find any trains from {from} to {to}."
            ))
        } else {
            let mut response = ActionResponse::message(format!(
                "Here are the trains from {from} to {to}:"
            ));
            for train in &found {
                response = response.push(train_line(train));
            }
            if elided {
                response = response.push(format!("Showing the first {MAX_RESULTS} matches."));
            }
            response
        };

        Ok(response.resetting(&[slots::FROM_LOCATION, slots::TO_LOCATION]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rail_assist_persistence::InMemoryRailStore;

    fn store_with_trains(count: u64) -> InMemoryRailStore {
        let mut store = InMemoryRailStore::new();
        for i in 0..count {
            store = store.with_train(
                12000 + i,
                "Chennai Central",
                "Bengaluru City",
                NaiveTime::from_hms_opt(6 + (i % 12) as u32, 0, 0),
                "On Time",
            );
        }
        store
    }

    #[tokio::test]
    async fn lists_matching_trains() {
        let handler = FindTrains::new(Arc::new(store_with_trains(2)));
        let slots = SlotValues::new()
            .set(slots::FROM_LOCATION, "chennai")
            .set(slots::TO_LOCATION, "bengaluru");
        let response = handler.run(&slots).await.unwrap();
        // Header plus one line per train.
        assert_eq!(response.messages.len(), 3);
        assert!(response.messages[1].contains("Chennai Central to Bengaluru City"));
        assert_eq!(
            response.reset_slots,
            vec![
                slots::FROM_LOCATION.to_string(),
                slots::TO_LOCATION.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn caps_results_and_notes_the_elision() {
        let handler = FindTrains::new(Arc::new(store_with_trains(14)));
        let slots = SlotValues::new()
            .set(slots::FROM_LOCATION, "chennai")
            .set(slots::TO_LOCATION, "bengaluru");
        let response = handler.run(&slots).await.unwrap();
        // Header + 10 trains + elision note.
        assert_eq!(response.messages.len(), 12);
        assert_eq!(
            response.messages.last().unwrap(),
            "Showing the first 10 matches."
        );
    }

    #[tokio::test]
    async fn no_matches_yields_not_found() {
        let handler = FindTrains::new(Arc::new(store_with_trains(2)));
        let slots = SlotValues::new()
            .set(slots::FROM_LOCATION, "pune")
            .set(slots::TO_LOCATION, "goa");
        let response = handler.run(&slots).await.unwrap();
        assert!(response.messages[0].contains("couldn't find any trains"));
    }

    #[tokio::test]
    async fn prompts_for_each_missing_endpoint() {
        let handler = FindTrains::new(Arc::new(store_with_trains(1)));

        let response = handler.run(&SlotValues::new()).await.unwrap();
        assert!(response.messages[0].contains("travelling from"));

        let slots = SlotValues::new().set(slots::FROM_LOCATION, "chennai");
        let response = handler.run(&slots).await.unwrap();
        assert!(response.messages[0].contains("like to go"));
    }
}
