//! Reservation and booking identifier types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a string is not a valid PNR
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("PNR must be a 10-digit number")]
pub struct PnrParseError;

/// Passenger Name Record — the ten-digit reservation identifier.
///
/// Construction goes through [`Pnr::parse`], which enforces the
/// `^[0-9]{10}$` shape, so a `Pnr` value is valid by construction and
/// handlers never re-validate downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pnr(u64);

impl Pnr {
    /// Parse an external input string into a PNR.
    ///
    /// Accepts exactly ten ASCII digits and nothing else; surrounding
    /// whitespace is the caller's problem, not silently forgiven here.
    pub fn parse(input: &str) -> Result<Self, PnrParseError> {
        if input.len() != 10 || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PnrParseError);
        }
        // Ten ASCII digits always fit in a u64.
        Ok(Self(input.parse().map_err(|_| PnrParseError)?))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Pnr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

/// Error returned when a string is not a valid user id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("User ID must be a number")]
pub struct UserIdParseError;

/// Numeric user identifier from `user_details`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, UserIdParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UserIdParseError);
        }
        Ok(Self(trimmed.parse().map_err(|_| UserIdParseError)?))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ticket status on a reservation row.
///
/// The store keeps free-form status strings; statuses other than the known
/// set round-trip through [`TicketStatus::Other`] unchanged. Comparisons
/// against `Cancelled` are case-insensitive, matching the cancellation
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Confirmed,
    Waitlisted,
    Rac,
    Cancelled,
    Other(String),
}

impl TicketStatus {
    pub fn from_db(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "waitlisted" | "waitlist" => Self::Waitlisted,
            "rac" => Self::Rac,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_db(&self) -> &str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Waitlisted => "Waitlisted",
            Self::Rac => "RAC",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db())
    }
}
