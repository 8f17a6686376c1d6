//! Dispatch actions from the command line against the live database.
//!
//! Reads one JSON request per line from stdin:
//!   {"action": "cancel_ticket", "slots": {"pnr_number_to_cancel": "4312876590"}}
//! and prints the handler's messages. Useful for poking handlers without
//! the dialogue layer in front.

use anyhow::Context;
use rail_assist_actions::handlers::standard_registry;
use rail_assist_actions::{RegistryConfig, SlotValues};
use rail_assist_config::load_settings;
use rail_assist_persistence as persistence;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
struct Request {
    action: String,
    #[serde(default)]
    slots: HashMap<String, String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("RAIL_ASSIST_ENV").ok();
    let settings = load_settings(env.as_deref()).context("loading settings")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.observability.log_level.clone()));
    if settings.observability.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let layer = persistence::init(&settings.database)
        .await
        .context("initializing persistence")?;
    let registry = standard_registry(
        Arc::new(layer.trains),
        Arc::new(layer.bookings),
        Arc::new(layer.stations),
        RegistryConfig::default(),
    );
    tracing::info!(actions = ?registry.names(), "Action runner ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                tracing::error!(error = %err, "Bad request line");
                continue;
            }
        };

        let mut slots = SlotValues::new();
        for (name, value) in &request.slots {
            slots = slots.set(name, value);
        }

        let response = registry.dispatch(&request.action, &slots).await;
        for message in &response.messages {
            println!("{message}");
        }
    }

    Ok(())
}
