//! Action-layer errors

use rail_assist_persistence::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    /// The store failed underneath the handler. Dispatch maps this to
    /// the generic database-trouble message.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The handler overran its time budget.
    #[error("action '{name}' timed out after {secs}s")]
    Timeout { name: String, secs: u64 },

    /// No handler is registered under this name.
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}
