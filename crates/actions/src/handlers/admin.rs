//! Admin listings: train directory, departures by source, registered users

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use crate::handlers::find_trains::train_line;
use crate::handlers::slots;
use async_trait::async_trait;
use rail_assist_persistence::{BookingStore, TrainStore};
use std::sync::Arc;

const MAX_RESULTS: u32 = 15;
const MAX_USERS: u32 = 10;

pub struct ListTrains {
    trains: Arc<dyn TrainStore>,
}

impl ListTrains {
    pub fn new(trains: Arc<dyn TrainStore>) -> Self {
        Self { trains }
    }
}

#[async_trait]
impl Action for ListTrains {
    fn name(&self) -> &str {
        "list_trains"
    }

    async fn run(&self, _slots: &SlotValues) -> Result<ActionResponse, ActionError> {
        let mut trains = self.trains.all_trains(MAX_RESULTS + 1).await?;
        let elided = trains.len() as u32 > MAX_RESULTS;
        trains.truncate(MAX_RESULTS as usize);

        if trains.is_empty() {
            return Ok(ActionResponse::message(
                "The train directory is currently empty.",
            ));
        }

        let mut response = ActionResponse::message("Trains in the directory:");
        for train in &trains {
            response = response.push(train_line(train));
        }
        if elided {
            response = response.push(format!("Showing the first {MAX_RESULTS} trains."));
        }
        Ok(response)
    }
}

pub struct TrainsBySource {
    trains: Arc<dyn TrainStore>,
}

impl TrainsBySource {
    pub fn new(trains: Arc<dyn TrainStore>) -> Self {
        Self { trains }
    }
}

#[async_trait]
impl Action for TrainsBySource {
    fn name(&self) -> &str {
        "trains_by_source"
    }

    async fn run(&self, slot_values: &SlotValues) -> Result<ActionResponse, ActionError> {
        let Some(from) = slot_values.get(slots::FROM_LOCATION) else {
            return Ok(
                ActionResponse::message("Which station's departures would you like to see?")
                    .resetting(&[slots::FROM_LOCATION]),
            );
        };

        let mut trains = self.trains.trains_from(from, MAX_RESULTS + 1).await?;
        let elided = trains.len() as u32 > MAX_RESULTS;
        trains.truncate(MAX_RESULTS as usize);

        let response = if trains.is_empty() {
            ActionResponse::message(format!("No trains depart from {from}."))
        } else {
            let mut response =
                ActionResponse::message(format!("Trains departing from {from}:"));
            for train in &trains {
                response = response.push(train_line(train));
            }
            if elided {
                response = response.push(format!("Showing the first {MAX_RESULTS} departures."));
            }
            response
        };

        Ok(response.resetting(&[slots::FROM_LOCATION]))
    }
}

pub struct ListUsers {
    bookings: Arc<dyn BookingStore>,
}

impl ListUsers {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }
}

/// Keep the first character and the domain: "asha@mail.com" -> "a***@mail.com".
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().unwrap();
            format!("{first}***@{domain}")
        }
        _ => "***".to_string(),
    }
}

/// Keep the last four digits: "9876543210" -> "******3210".
fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("******{tail}")
}

#[async_trait]
impl Action for ListUsers {
    fn name(&self) -> &str {
        "list_user_details"
    }

    async fn run(&self, _slots: &SlotValues) -> Result<ActionResponse, ActionError> {
        let mut users = self.bookings.users(MAX_USERS + 1).await?;
        let elided = users.len() as u32 > MAX_USERS;
        users.truncate(MAX_USERS as usize);

        if users.is_empty() {
            return Ok(ActionResponse::message("No users are registered."));
        }

        let mut response = ActionResponse::message("Registered users:");
        for user in &users {
            let email = user
                .email
                .as_deref()
                .map(mask_email)
                .unwrap_or_else(|| "no email".to_string());
            let phone = user
                .phone
                .as_deref()
                .map(mask_phone)
                .unwrap_or_else(|| "no phone".to_string());
            response = response.push(format!(
                "{}: {} ({email}, {phone})",
                user.user_id, user.name
            ));
        }
        if elided {
            response = response.push(format!("Showing the first {MAX_USERS} users."));
        }
        Ok(response)
    }
}
