//! Station directory lookup

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_persistence::StationStore;
use std::sync::Arc;

const MAX_RESULTS: u32 = 5;

pub struct StationInfo {
    stations: Arc<dyn StationStore>,
}

impl StationInfo {
    pub fn new(stations: Arc<dyn StationStore>) -> Self {
        Self { stations }
    }
}

#[async_trait]
impl Action for StationInfo {
    fn name(&self) -> &str {
        "station_info"
    }

    async fn run(&self, slot_values: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(term) = slot_values.get(slots::STATION_IDENTIFIER) else {
            return Ok(ActionResponse::message(
                "Which station would you like to know about? A name or station code works.",
            )
            .resetting(&[slots::STATION_IDENTIFIER]));
        };

        let found = self.stations.find_stations(term, MAX_RESULTS).await?;

        let response = if found.is_empty() {
            ActionResponse::message(format!(
                "I couldn't find a station matching '{term}'."
            ))
        } else {
            let mut response = ActionResponse::default();
            for station in &found {
                let mut line = format!("{} ({})", station.name, station.code);
                if let Some(city) = &station.city {
                    line.push_str(&format!(", {city}"));
                }
                if let Some(state) = &station.state {
                    line.push_str(&format!(", {state}"));
                }
                response = response.push(line);
            }
            response
        };

        Ok(response.resetting(&[slots::STATION_IDENTIFIER]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_assist_persistence::InMemoryRailStore;

    fn handler() -> StationInfo {
        let store = InMemoryRailStore::new()
            .with_station("NDLS", "New Delhi", Some("Delhi"))
            .with_station("BCT", "Mumbai Central", Some("Mumbai"));
        StationInfo::new(Arc::new(store))
    }

    #[tokio::test]
    async fn matches_by_name_substring() {
        let slots = SlotValues::new().set(slots::STATION_IDENTIFIER, "delhi");
        let response = handler().run(&slots).await.unwrap();
        assert_eq!(response.messages, vec!["New Delhi (NDLS), Delhi".to_string()]);
    }

    #[tokio::test]
    async fn matches_by_exact_code() {
        let slots = SlotValues::new().set(slots::STATION_IDENTIFIER, "bct");
        let response = handler().run(&slots).await.unwrap();
        assert_eq!(
            response.messages,
            vec!["Mumbai Central (BCT), Mumbai".to_string()]
        );
    }

    #[tokio::test]
    async fn unknown_station_gets_not_found() {
        let slots = SlotValues::new().set(slots::STATION_IDENTIFIER, "atlantis");
        let response = handler().run(&slots).await.unwrap();
        assert!(response.messages[0].contains("couldn't find a station"));
    }
}
