//! Evaluate the assistant's generated responses against references and
//! write the scored CSV.

use anyhow::Context;
use rail_assist_config::load_settings;
use rail_assist_eval::model::ModelClientConfig;
use rail_assist_eval::semantic::EmbedderConfig;
use rail_assist_eval::{corpus, init_tracing, response_eval, HttpEmbedder, HttpModelClient};
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("RAIL_ASSIST_ENV").ok();
    let settings = load_settings(env.as_deref()).context("loading settings")?;
    init_tracing(&settings.observability);

    let timeout = Duration::from_secs(settings.eval.request_timeout_secs);

    let model = HttpModelClient::new(ModelClientConfig {
        base_url: settings.eval.model_endpoint.clone(),
        request_timeout: timeout,
    })
    .context("building model client")?;

    let embedder = HttpEmbedder::new(EmbedderConfig {
        base_url: settings.eval.embedding_endpoint.clone(),
        model: settings.eval.embedding_model.clone(),
        request_timeout: timeout,
    })
    .context("building embedder")?;

    let examples = corpus::load_response_corpus(Path::new(&settings.eval.response_corpus))
        .context("loading response corpus")?;

    let metrics = response_eval::run(&model, &embedder, &examples)
        .await
        .context("scoring responses")?;
    response_eval::write_reports(&metrics, Path::new(&settings.eval.report_dir))
        .context("writing reports")?;

    Ok(())
}
