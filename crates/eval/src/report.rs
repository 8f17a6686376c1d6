//! Report writing
//!
//! CSV artifacts land in the configured report directory; summaries go
//! to the log so a terminal run reads top to bottom.

use crate::error::EvalError;
use crate::intent_eval::{IntentMetrics, Misprediction};
use crate::metrics::ConfusionMatrix;
use crate::response_eval::ScoredResponse;
use std::path::Path;

/// Confusion matrix as CSV: first column is the true label, remaining
/// columns are predicted-label counts.
pub fn write_confusion_matrix(path: &Path, matrix: &ConfusionMatrix) -> Result<(), EvalError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["true \\ predicted".to_string()];
    header.extend(matrix.labels.iter().cloned());
    writer.write_record(&header)?;

    for (label, row) in matrix.labels.iter().zip(&matrix.counts) {
        let mut record = vec![label.clone()];
        record.extend(row.iter().map(|c| c.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Incorrectly classified examples, one row each.
pub fn write_mispredictions(path: &Path, rows: &[Misprediction]) -> Result<(), EvalError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Row", "UserInput", "ExpectedIntent", "PredictedIntent", "Confidence"])?;
    for row in rows {
        writer.write_record([
            row.row.to_string(),
            row.input.clone(),
            row.expected.clone(),
            row.predicted.clone(),
            format!("{:.4}", row.confidence),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Per-example response scores.
pub fn write_scored_responses(path: &Path, rows: &[ScoredResponse]) -> Result<(), EvalError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "UserInput",
        "Reference",
        "Generated",
        "ROUGE-1",
        "ROUGE-2",
        "ROUGE-L",
        "SemanticF1",
    ])?;
    for row in rows {
        writer.write_record([
            row.input.clone(),
            row.reference.clone(),
            row.generated.clone(),
            format!("{:.4}", row.rouge.rouge1),
            format!("{:.4}", row.rouge.rouge2),
            format!("{:.4}", row.rouge.rouge_l),
            format!("{:.4}", row.semantic_f1),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Log the intent evaluation summary.
pub fn log_intent_summary(metrics: &IntentMetrics) {
    tracing::info!(
        examples = metrics.examples,
        accuracy = format!("{:.4}", metrics.accuracy),
        log_loss = format!("{:.4}", metrics.log_loss),
        "Intent evaluation"
    );
    match metrics.roc_auc {
        Some(auc) => tracing::info!(roc_auc_macro = format!("{:.4}", auc), "ROC-AUC"),
        None => tracing::warn!("ROC-AUC undefined: every class is degenerate"),
    }
    for class in &metrics.per_class {
        tracing::info!(
            label = %class.label,
            precision = format!("{:.4}", class.precision),
            recall = format!("{:.4}", class.recall),
            f1 = format!("{:.4}", class.f1),
            support = class.support,
            "Per-class report"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rouge::RougeScores;

    #[test]
    fn confusion_matrix_round_trips_through_csv() {
        let matrix = ConfusionMatrix {
            labels: vec!["cancel".to_string(), "greet".to_string()],
            counts: vec![vec![3, 1], vec![0, 5]],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confusion.csv");
        write_confusion_matrix(&path, &matrix).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "true \\ predicted,cancel,greet");
        assert_eq!(lines.next().unwrap(), "cancel,3,1");
        assert_eq!(lines.next().unwrap(), "greet,0,5");
    }

    #[test]
    fn scored_responses_csv_has_one_row_per_example() {
        let rows = vec![ScoredResponse {
            input: "cancel my ticket".to_string(),
            reference: "your ticket is cancelled".to_string(),
            generated: "ticket cancelled".to_string(),
            rouge: RougeScores {
                rouge1: 0.5,
                rouge2: 0.25,
                rouge_l: 0.5,
            },
            semantic_f1: 0.9,
        }];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scored.csv");
        write_scored_responses(&path, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("0.9000"));
    }
}
