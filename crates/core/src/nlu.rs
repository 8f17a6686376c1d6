//! NLU output types
//!
//! Mirrors the wire format of the dialogue engine's parse endpoint so the
//! evaluation clients can deserialize responses directly.

use serde::{Deserialize, Serialize};

/// A single intent with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPrediction {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

/// An extracted entity span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
    pub value: serde_json::Value,
    pub entity: String,
}

/// Parsed NLU output for one user message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedMessage {
    #[serde(default)]
    pub text: String,
    /// Top intent, when the model produced one
    #[serde(default)]
    pub intent: Option<IntentPrediction>,
    /// Full ranking, best first
    #[serde(default, rename = "intent_ranking")]
    pub ranking: Vec<IntentPrediction>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl ParsedMessage {
    /// Name of the top intent, falling back to the head of the ranking
    pub fn top_intent(&self) -> Option<&IntentPrediction> {
        self.intent.as_ref().or_else(|| self.ranking.first())
    }
}
