//! Offline evaluation of the assistant
//!
//! Two pipelines, each with its own binary:
//! - `intent-eval` — sends a labeled corpus through the NLU parse
//!   endpoint and reports accuracy, log-loss, macro ROC-AUC, a per-class
//!   report, and a confusion matrix.
//! - `response-eval` — sends user inputs through the dialogue endpoint
//!   and scores generated responses against references with ROUGE-1/2/L
//!   and an embedding-based F1.
//!
//! Model and embedding servers are reached over HTTP behind small
//! traits, so tests run against stubs.

pub mod corpus;
pub mod error;
pub mod intent_eval;
pub mod metrics;
pub mod model;
pub mod report;
pub mod response_eval;
pub mod rouge;
pub mod semantic;

pub use error::EvalError;
pub use model::{DialogueModel, HttpModelClient, ModelError, NluModel};
pub use semantic::{Embedder, HttpEmbedder};

use rail_assist_config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the evaluation binaries.
///
/// `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
