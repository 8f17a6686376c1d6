//! User-facing value formatting shared by the handlers

use chrono::{NaiveDate, NaiveTime};

/// Journey dates read as "01-Jun-2025".
pub fn journey_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d-%b-%Y").to_string(),
        None => "not available".to_string(),
    }
}

/// Departure times read as "17:05".
pub fn departure_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%H:%M").to_string(),
        None => "not available".to_string(),
    }
}

/// Fares read as "₹1250.00".
pub fn fare(amount: f64) -> String {
    format!("₹{amount:.2}")
}
