//! Response generation evaluation pipeline

use crate::corpus::ResponseExample;
use crate::error::EvalError;
use crate::model::DialogueModel;
use crate::report;
use crate::rouge::{self, RougeScores};
use crate::semantic::{self, Embedder};
use std::path::Path;

/// Recorded when the model utters nothing for an input.
pub const NO_RESPONSE_PLACEHOLDER: &str = "[NO_BOT_RESPONSE]";

/// Recorded when the model call itself fails.
pub const MODEL_ERROR_PLACEHOLDER: &str = "[MODEL_ERROR]";

/// One scored input/reference/generated triple
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResponse {
    pub input: String,
    pub reference: String,
    pub generated: String,
    pub rouge: RougeScores,
    pub semantic_f1: f64,
}

/// Corpus-level averages
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResponseAverages {
    pub rouge1: f64,
    pub rouge2: f64,
    pub rouge_l: f64,
    pub semantic_f1: f64,
}

#[derive(Debug, Clone)]
pub struct ResponseMetrics {
    pub scored: Vec<ScoredResponse>,
    pub averages: ResponseAverages,
}

fn is_placeholder(generated: &str) -> bool {
    generated == NO_RESPONSE_PLACEHOLDER || generated == MODEL_ERROR_PLACEHOLDER
}

/// Generate and score a response for every example.
///
/// Placeholder responses are kept in the output (so the CSV shows what
/// happened) but score as a blank hypothesis: zero across the board.
pub async fn run(
    model: &dyn DialogueModel,
    embedder: &dyn Embedder,
    examples: &[ResponseExample],
) -> Result<ResponseMetrics, EvalError> {
    let mut scored = Vec::with_capacity(examples.len());

    for (i, example) in examples.iter().enumerate() {
        let generated = match model.respond(&example.input).await {
            Ok(messages) if messages.is_empty() => {
                tracing::warn!(row = i + 1, "Model uttered nothing");
                NO_RESPONSE_PLACEHOLDER.to_string()
            }
            Ok(messages) => messages.join(" "),
            Err(err) => {
                tracing::warn!(row = i + 1, error = %err, "Model failed on corpus row");
                MODEL_ERROR_PLACEHOLDER.to_string()
            }
        };

        let (rouge_scores, semantic_f1) = if is_placeholder(&generated) {
            (RougeScores::default(), 0.0)
        } else {
            let rouge_scores = rouge::score(&generated, &example.reference);
            let semantic_f1 =
                semantic::semantic_f1(embedder, &generated, &example.reference).await?;
            (rouge_scores, semantic_f1)
        };

        scored.push(ScoredResponse {
            input: example.input.clone(),
            reference: example.reference.clone(),
            generated,
            rouge: rouge_scores,
            semantic_f1,
        });
    }

    let averages = average(&scored);
    Ok(ResponseMetrics { scored, averages })
}

fn average(scored: &[ScoredResponse]) -> ResponseAverages {
    if scored.is_empty() {
        return ResponseAverages::default();
    }
    let n = scored.len() as f64;
    ResponseAverages {
        rouge1: scored.iter().map(|s| s.rouge.rouge1).sum::<f64>() / n,
        rouge2: scored.iter().map(|s| s.rouge.rouge2).sum::<f64>() / n,
        rouge_l: scored.iter().map(|s| s.rouge.rouge_l).sum::<f64>() / n,
        semantic_f1: scored.iter().map(|s| s.semantic_f1).sum::<f64>() / n,
    }
}

/// Write the scored CSV and log the averages.
pub fn write_reports(metrics: &ResponseMetrics, report_dir: &Path) -> Result<(), EvalError> {
    std::fs::create_dir_all(report_dir)?;
    report::write_scored_responses(&report_dir.join("scored_responses.csv"), &metrics.scored)?;
    tracing::info!(
        examples = metrics.scored.len(),
        rouge1 = format!("{:.4}", metrics.averages.rouge1),
        rouge2 = format!("{:.4}", metrics.averages.rouge2),
        rouge_l = format!("{:.4}", metrics.averages.rouge_l),
        semantic_f1 = format!("{:.4}", metrics.averages.semantic_f1),
        "Response evaluation"
    );
    Ok(())
}
