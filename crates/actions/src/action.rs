//! Action trait and the request/response types around it

use crate::error::ActionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slot values extracted by the dialogue layer, keyed by slot name.
///
/// Values arrive as free-form strings; handlers own their validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotValues(HashMap<String, String>);

impl SlotValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }

    /// A slot's value, trimmed; empty or whitespace-only counts as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// What a handler sends back to the dialogue layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// User-facing messages, in order.
    pub messages: Vec<String>,
    /// Slots to clear so the next turn starts fresh.
    pub reset_slots: Vec<String>,
}

impl ActionResponse {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
            reset_slots: Vec::new(),
        }
    }

    pub fn push(mut self, text: impl Into<String>) -> Self {
        self.messages.push(text.into());
        self
    }

    pub fn resetting(mut self, slots: &[&str]) -> Self {
        self.reset_slots = slots.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A single custom action the dialogue layer can trigger
#[async_trait]
pub trait Action: Send + Sync {
    /// Stable action name the dialogue layer dispatches on.
    fn name(&self) -> &str;

    async fn run(&self, slots: &SlotValues) -> Result<ActionResponse, ActionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_slot_values_count_as_unset() {
        let slots = SlotValues::new()
            .set("train_number", "  12951 ")
            .set("pnr_number", "   ");
        assert_eq!(slots.get("train_number"), Some("12951"));
        assert_eq!(slots.get("pnr_number"), None);
        assert_eq!(slots.get("missing"), None);
    }
}
