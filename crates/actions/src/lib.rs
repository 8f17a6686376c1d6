//! Conversational action handlers
//!
//! One handler per custom action the dialogue layer can trigger:
//! - Lookups: train status, PNR status, train search, fares, stations
//! - Account: booking history, ticket cancellation
//! - Admin: full train listings, departures by source
//!
//! Handlers implement the [`Action`] trait and are dispatched through an
//! [`ActionRegistry`] which enforces a per-action timeout and maps
//! failures to a user-facing fallback message.

pub mod action;
pub mod error;
pub mod format;
pub mod handlers;
pub mod registry;

pub use action::{Action, ActionResponse, SlotValues};
pub use error::ActionError;
pub use registry::{ActionRegistry, RegistryConfig};
