//! Intent classification evaluation pipeline

use crate::corpus::IntentExample;
use crate::error::EvalError;
use crate::metrics::{self, ClassReport, ConfusionMatrix};
use crate::model::NluModel;
use crate::report;
use std::path::Path;

/// Label recorded when the model fails to answer for a row.
pub const MODEL_ERROR_LABEL: &str = "[MODEL_ERROR]";

/// One incorrectly classified example
#[derive(Debug, Clone, PartialEq)]
pub struct Misprediction {
    /// 1-based corpus row.
    pub row: usize,
    pub input: String,
    pub expected: String,
    pub predicted: String,
    pub confidence: f64,
}

/// Everything the intent evaluation produces
#[derive(Debug, Clone)]
pub struct IntentMetrics {
    pub examples: usize,
    pub accuracy: f64,
    pub log_loss: f64,
    pub roc_auc: Option<f64>,
    pub per_class: Vec<ClassReport>,
    pub confusion: ConfusionMatrix,
    pub mispredictions: Vec<Misprediction>,
}

/// Classify every example and compute the metric suite.
///
/// A model failure on a row does not abort the run; the row is scored
/// against the [`MODEL_ERROR_LABEL`] sentinel with zero confidence.
pub async fn run(model: &dyn NluModel, examples: &[IntentExample]) -> IntentMetrics {
    let mut truth = Vec::with_capacity(examples.len());
    let mut predicted = Vec::with_capacity(examples.len());
    let mut confidences = Vec::with_capacity(examples.len());
    let mut rankings: Vec<Vec<(String, f64)>> = Vec::with_capacity(examples.len());

    for (i, example) in examples.iter().enumerate() {
        truth.push(example.expected_intent.clone());
        match model.parse(&example.input).await {
            Ok(parsed) => {
                let (name, confidence) = parsed
                    .top_intent()
                    .map(|intent| (intent.name.clone(), intent.confidence))
                    .unwrap_or_else(|| (MODEL_ERROR_LABEL.to_string(), 0.0));
                predicted.push(name);
                confidences.push(confidence);
                rankings.push(
                    parsed
                        .ranking
                        .iter()
                        .map(|intent| (intent.name.clone(), intent.confidence))
                        .collect(),
                );
            }
            Err(err) => {
                tracing::warn!(row = i + 1, error = %err, "Model failed on corpus row");
                predicted.push(MODEL_ERROR_LABEL.to_string());
                confidences.push(0.0);
                rankings.push(Vec::new());
            }
        }
    }

    let classes = metrics::label_set(&truth, &predicted);
    let probabilities = metrics::probability_matrix(&rankings, &classes);
    let confusion = metrics::confusion_matrix(&truth, &predicted);

    let mispredictions = examples
        .iter()
        .enumerate()
        .filter(|(i, example)| predicted[*i] != example.expected_intent)
        .map(|(i, example)| Misprediction {
            row: i + 1,
            input: example.input.clone(),
            expected: example.expected_intent.clone(),
            predicted: predicted[i].clone(),
            confidence: confidences[i],
        })
        .collect();

    IntentMetrics {
        examples: examples.len(),
        accuracy: metrics::accuracy(&truth, &predicted),
        log_loss: metrics::log_loss(&probabilities, &truth, &classes),
        roc_auc: metrics::roc_auc_macro(&probabilities, &truth, &classes),
        per_class: metrics::per_class_report(&confusion),
        confusion,
        mispredictions,
    }
}

/// Write the CSV artifacts and log the summary.
pub fn write_reports(metrics: &IntentMetrics, report_dir: &Path) -> Result<(), EvalError> {
    std::fs::create_dir_all(report_dir)?;
    report::write_confusion_matrix(&report_dir.join("confusion_matrix.csv"), &metrics.confusion)?;
    report::write_mispredictions(
        &report_dir.join("incorrect_predictions.csv"),
        &metrics.mispredictions,
    )?;
    report::log_intent_summary(metrics);
    Ok(())
}
