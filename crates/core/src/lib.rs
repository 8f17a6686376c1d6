//! Core types for the rail assistant
//!
//! This crate provides the foundational types used across all other crates:
//! - Reservation identifiers (PNR) and ticket status
//! - NLU output types (intent predictions, entities)

pub mod nlu;
pub mod types;

pub use nlu::{EntitySpan, IntentPrediction, ParsedMessage};
pub use types::{Pnr, PnrParseError, TicketStatus, UserId, UserIdParseError};
