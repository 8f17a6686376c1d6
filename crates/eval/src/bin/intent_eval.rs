//! Evaluate the NLU model's intent classification against a labeled
//! corpus and write the metric reports.

use anyhow::Context;
use rail_assist_config::load_settings;
use rail_assist_eval::model::ModelClientConfig;
use rail_assist_eval::{corpus, init_tracing, intent_eval, HttpModelClient};
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("RAIL_ASSIST_ENV").ok();
    let settings = load_settings(env.as_deref()).context("loading settings")?;
    init_tracing(&settings.observability);

    let model = HttpModelClient::new(ModelClientConfig {
        base_url: settings.eval.model_endpoint.clone(),
        request_timeout: Duration::from_secs(settings.eval.request_timeout_secs),
    })
    .context("building model client")?;

    let examples = corpus::load_intent_corpus(Path::new(&settings.eval.intent_corpus))
        .context("loading intent corpus")?;

    let metrics = intent_eval::run(&model, &examples).await;
    intent_eval::write_reports(&metrics, Path::new(&settings.eval.report_dir))
        .context("writing reports")?;

    Ok(())
}
