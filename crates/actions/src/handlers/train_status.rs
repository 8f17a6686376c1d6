//! Train status lookup

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::format;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_persistence::TrainStore;
use std::sync::Arc;

pub struct GetTrainStatus {
    trains: Arc<dyn TrainStore>,
}

impl GetTrainStatus {
    pub fn new(trains: Arc<dyn TrainStore>) -> Self {
        Self { trains }
    }
}

#[async_trait]
impl Action for GetTrainStatus {
    fn name(&self) -> &str {
        "get_train_status"
    }

    async fn run(&self, slots: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(raw) = slots.get(slots::TRAIN_NUMBER) else {
            return Ok(ActionResponse::message(
                "Please tell me the train number you'd like the status for.",
            )
            .resetting(&[slots::TRAIN_NUMBER]));
        };

        let Ok(train_number) = raw.parse::<u64>() else {
            return Ok(ActionResponse::message(format!(
                "'{raw}' doesn't look like a train number. Train numbers are digits only."
            ))
            .resetting(&[slots::TRAIN_NUMBER]));
        };

        let response = match self.trains.train(train_number).await? {
            Some(train) => ActionResponse::message(format!(
                "Train {} runs from {} to {}, scheduled to depart at {}. Current status: {}.",
                train.train_number,
                train.from_location,
                train.to_location,
                format::departure_time(train.departure),
                train.status,
            )),
            None => ActionResponse::message(format!(
                "I couldn't find a train with number {train_number}."
            )),
        };

        Ok(response.resetting(&[slots::TRAIN_NUMBER]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rail_assist_persistence::InMemoryRailStore;

    fn handler() -> GetTrainStatus {
        let store = InMemoryRailStore::new().with_train(
            12951,
            "Mumbai Central",
            "New Delhi",
            NaiveTime::from_hms_opt(17, 0, 0),
            "On Time",
        );
        GetTrainStatus::new(Arc::new(store))
    }

    #[tokio::test]
    async fn reports_status_for_known_train() {
        let slots = SlotValues::new().set(slots::TRAIN_NUMBER, "12951");
        let response = handler().run(&slots).await.unwrap();
        assert_eq!(
            response.messages,
            vec![
                "Train 12951 runs from Mumbai Central to New Delhi, scheduled to depart at 17:00. \
                 Current status: On Time."
                    .to_string()
            ]
        );
        assert_eq!(response.reset_slots, vec![slots::TRAIN_NUMBER.to_string()]);
    }

    #[tokio::test]
    async fn unknown_train_gets_not_found_message() {
        let slots = SlotValues::new().set(slots::TRAIN_NUMBER, "99999");
        let response = handler().run(&slots).await.unwrap();
        assert_eq!(
            response.messages,
            vec!["I couldn't find a train with number 99999.".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_slot_prompts_for_train_number() {
        let response = handler().run(&SlotValues::new()).await.unwrap();
        assert!(response.messages[0].contains("train number"));
        assert_eq!(response.reset_slots, vec![slots::TRAIN_NUMBER.to_string()]);
    }

    #[tokio::test]
    async fn non_numeric_input_is_rejected_locally() {
        let slots = SlotValues::new().set(slots::TRAIN_NUMBER, "rajdhani");
        let response = handler().run(&slots).await.unwrap();
        assert!(response.messages[0].contains("digits only"));
    }
}
