//! Action registry and dispatch
//!
//! Holds all registered handlers, enforces a per-action timeout, and
//! converts failures into the user-facing fallback message so the
//! dialogue layer always gets something it can say.

use crate::action::{Action, ActionResponse, SlotValues};
use crate::error::ActionError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Said when a handler fails or overruns its budget.
pub const DATABASE_TROUBLE_MESSAGE: &str =
    "Sorry, I'm having trouble reaching the railway database right now. Please try again in a while.";

/// Said when dispatch is asked for an unregistered action.
pub const UNKNOWN_ACTION_MESSAGE: &str = "Sorry, I can't help with that request.";

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub action_timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            action_timeout: Duration::from_secs(10),
        }
    }
}

/// Registry of all conversational actions
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
    config: RegistryConfig,
}

impl ActionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            actions: HashMap::new(),
            config,
        }
    }

    pub fn register(&mut self, action: Arc<dyn Action>) {
        let name = action.name().to_string();
        if self.actions.insert(name.clone(), action).is_some() {
            tracing::warn!(action = %name, "Replacing already-registered action");
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Run an action under the configured timeout.
    pub async fn run(
        &self,
        name: &str,
        slots: &SlotValues,
    ) -> Result<ActionResponse, ActionError> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;

        match tokio::time::timeout(self.config.action_timeout, action.run(slots)).await {
            Ok(result) => result,
            Err(_) => Err(ActionError::Timeout {
                name: name.to_string(),
                secs: self.config.action_timeout.as_secs(),
            }),
        }
    }

    /// Run an action and absorb failures into a fallback message.
    ///
    /// This is the dialogue-facing entry point: the caller always gets
    /// a response to utter, and failures are logged here.
    pub async fn dispatch(&self, name: &str, slots: &SlotValues) -> ActionResponse {
        match self.run(name, slots).await {
            Ok(response) => response,
            Err(ActionError::UnknownAction(name)) => {
                tracing::warn!(action = %name, "Dispatch for unknown action");
                ActionResponse::message(UNKNOWN_ACTION_MESSAGE)
            }
            Err(err) => {
                tracing::error!(action = %name, error = %err, "Action failed");
                ActionResponse::message(DATABASE_TROUBLE_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rail_assist_persistence::StoreError;

    struct Failing;

    #[async_trait]
    impl Action for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn run(&self, _slots: &SlotValues) -> Result<ActionResponse, ActionError> {
            Err(ActionError::Store(StoreError::Unavailable(
                "down for maintenance".to_string(),
            )))
        }
    }

    struct Slow;

    #[async_trait]
    impl Action for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn run(&self, _slots: &SlotValues) -> Result<ActionResponse, ActionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ActionResponse::message("done"))
        }
    }

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new(RegistryConfig {
            action_timeout: Duration::from_millis(50),
        });
        registry.register(Arc::new(Failing));
        registry.register(Arc::new(Slow));
        registry
    }

    #[tokio::test]
    async fn dispatch_absorbs_store_errors() {
        let response = registry().dispatch("failing", &SlotValues::new()).await;
        assert_eq!(response.messages, vec![DATABASE_TROUBLE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn dispatch_times_out_slow_actions() {
        let response = registry().dispatch("slow", &SlotValues::new()).await;
        assert_eq!(response.messages, vec![DATABASE_TROUBLE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn dispatch_handles_unknown_actions() {
        let response = registry().dispatch("nope", &SlotValues::new()).await;
        assert_eq!(response.messages, vec![UNKNOWN_ACTION_MESSAGE.to_string()]);
    }
}
