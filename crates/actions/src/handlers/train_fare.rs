//! Fare lookup by train and travel class

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::format;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_persistence::TrainStore;
use std::sync::Arc;

pub struct TrainFare {
    trains: Arc<dyn TrainStore>,
}

impl TrainFare {
    pub fn new(trains: Arc<dyn TrainStore>) -> Self {
        Self { trains }
    }
}

#[async_trait]
impl Action for TrainFare {
    fn name(&self) -> &str {
        "train_fare"
    }

    async fn run(&self, slot_values: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(raw_number) = slot_values.get(slots::TRAIN_NUMBER) else {
            return Ok(ActionResponse::message(
                "Which train would you like the fare for? Please share the train number.",
            )
            .resetting(&[slots::TRAIN_NUMBER, slots::TRAVEL_CLASS]));
        };
        let Some(class) = slot_values.get(slots::TRAVEL_CLASS) else {
            return Ok(ActionResponse::message(
                "Which travel class are you interested in, for example Sleeper or 3A?",
            )
            .resetting(&[slots::TRAVEL_CLASS]));
        };

        let Ok(train_number) = raw_number.parse::<u64>() else {
            return Ok(ActionResponse::message(format!(
                "'{raw_number}' doesn't look like a train number. Train numbers are digits only."
            ))
            .resetting(&[slots::TRAIN_NUMBER, slots::TRAVEL_CLASS]));
        };

        let fares = self.trains.fares(train_number).await?;
        let wanted = class.to_lowercase();
        let matching: Vec<_> = fares
            .iter()
            .filter(|f| f.class.to_lowercase().contains(&wanted))
            .collect();

        let response = if !matching.is_empty() {
            let mut response = ActionResponse::default();
            for entry in matching {
                response = response.push(format!(
                    "Train {train_number}, {} class: {}.",
                    entry.class,
                    format::fare(entry.fare)
                ));
            }
            response
        } else if !self.trains.train_exists(train_number).await? {
            ActionResponse::message(format!(
                "I couldn't find a train with number {train_number}."
            ))
        } else if fares.is_empty() {
            ActionResponse::message(format!(
                "No fare information is available for train {train_number}."
            ))
        } else {
            let available: Vec<&str> = fares.iter().map(|f| f.class.as_str()).collect();
            ActionResponse::message(format!(
                "Train {train_number} has no {class} class. Available classes: {}.",
                available.join(", ")
            ))
        };

        Ok(response.resetting(&[slots::TRAIN_NUMBER, slots::TRAVEL_CLASS]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_assist_persistence::InMemoryRailStore;

    fn handler() -> TrainFare {
        let store = InMemoryRailStore::new()
            .with_train(12951, "Mumbai Central", "New Delhi", None, "On Time")
            .with_fare(12951, "Sleeper", 755.0)
            .with_fare(12951, "3A", 1985.5);
        TrainFare::new(Arc::new(store))
    }

    fn fare_slots(number: &str, class: &str) -> SlotValues {
        SlotValues::new()
            .set(slots::TRAIN_NUMBER, number)
            .set(slots::TRAVEL_CLASS, class)
    }

    #[tokio::test]
    async fn reports_fare_for_matching_class() {
        let response = handler().run(&fare_slots("12951", "3a")).await.unwrap();
        assert_eq!(
            response.messages,
            vec!["Train 12951, 3A class: ₹1985.50.".to_string()]
        );
        assert_eq!(
            response.reset_slots,
            vec![
                slots::TRAIN_NUMBER.to_string(),
                slots::TRAVEL_CLASS.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn class_match_is_a_substring() {
        let response = handler().run(&fare_slots("12951", "sleep")).await.unwrap();
        assert_eq!(
            response.messages,
            vec!["Train 12951, Sleeper class: ₹755.00.".to_string()]
        );
    }

    #[tokio::test]
    async fn unknown_train_is_distinguished_from_unknown_class() {
        let response = handler().run(&fare_slots("99999", "3A")).await.unwrap();
        assert!(response.messages[0].contains("couldn't find a train"));

        let response = handler().run(&fare_slots("12951", "1A")).await.unwrap();
        assert!(response.messages[0].contains("no 1A class"));
        assert!(response.messages[0].contains("Sleeper"));
    }
}
