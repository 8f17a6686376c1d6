//! Intent classification metrics
//!
//! All metrics work over plain label/score slices so they are
//! independent of how predictions were obtained. Probabilities come
//! from the model's intent ranking, row-normalized per example.

/// Clipping bound for log-loss probabilities.
const EPS: f64 = 1e-15;

/// Confusion counts over a fixed label order; `counts[t][p]` is the
/// number of examples with true label `t` predicted as `p`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<u32>>,
}

/// Precision/recall/F1 for one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassReport {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u32,
}

/// Sorted union of true and predicted labels.
pub fn label_set(truth: &[String], predicted: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = truth.iter().chain(predicted.iter()).cloned().collect();
    labels.sort();
    labels.dedup();
    labels
}

pub fn accuracy(truth: &[String], predicted: &[String]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / truth.len() as f64
}

pub fn confusion_matrix(truth: &[String], predicted: &[String]) -> ConfusionMatrix {
    let labels = label_set(truth, predicted);
    let index = |label: &String| labels.iter().position(|l| l == label).unwrap();
    let mut counts = vec![vec![0u32; labels.len()]; labels.len()];
    for (t, p) in truth.iter().zip(predicted) {
        counts[index(t)][index(p)] += 1;
    }
    ConfusionMatrix { labels, counts }
}

pub fn per_class_report(matrix: &ConfusionMatrix) -> Vec<ClassReport> {
    let n = matrix.labels.len();
    (0..n)
        .map(|i| {
            let tp = matrix.counts[i][i] as f64;
            let support: u32 = matrix.counts[i].iter().sum();
            let predicted: u32 = (0..n).map(|t| matrix.counts[t][i]).sum();
            let precision = if predicted > 0 { tp / predicted as f64 } else { 0.0 };
            let recall = if support > 0 { tp / support as f64 } else { 0.0 };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassReport {
                label: matrix.labels[i].clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect()
}

/// Row-normalized probability matrix from per-example intent rankings.
///
/// Each row has one column per class; mass comes from the ranking's
/// confidences, renormalized to sum to one. A ranking with no mass over
/// the class set becomes a uniform row.
pub fn probability_matrix(
    rankings: &[Vec<(String, f64)>],
    classes: &[String],
) -> Vec<Vec<f64>> {
    rankings
        .iter()
        .map(|ranking| {
            let mut row: Vec<f64> = classes
                .iter()
                .map(|class| {
                    ranking
                        .iter()
                        .find(|(name, _)| name == class)
                        .map(|(_, score)| score.max(0.0))
                        .unwrap_or(0.0)
                })
                .collect();
            let sum: f64 = row.iter().sum();
            if sum > 0.0 {
                for p in &mut row {
                    *p /= sum;
                }
            } else if !row.is_empty() {
                let uniform = 1.0 / row.len() as f64;
                row.fill(uniform);
            }
            row
        })
        .collect()
}

/// Multiclass log-loss with probabilities clipped to `[EPS, 1 - EPS]`.
pub fn log_loss(probabilities: &[Vec<f64>], truth: &[String], classes: &[String]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let total: f64 = truth
        .iter()
        .zip(probabilities)
        .map(|(label, row)| {
            let p = classes
                .iter()
                .position(|c| c == label)
                .map(|i| row[i])
                .unwrap_or(0.0)
                .clamp(EPS, 1.0 - EPS);
            -p.ln()
        })
        .sum();
    total / truth.len() as f64
}

/// Average ranks (1-based) with ties sharing their mean rank.
fn average_ranks(scores: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // Positions i..=j share the same score.
        let mean_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = mean_rank;
        }
        i = j + 1;
    }
    ranks
}

/// One-vs-rest ROC-AUC for a single class via the Mann-Whitney statistic.
fn binary_auc(scores: &[f64], positives: &[bool]) -> Option<f64> {
    let n_pos = positives.iter().filter(|&&p| p).count();
    let n_neg = positives.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }
    let ranks = average_ranks(scores);
    let rank_sum: f64 = ranks
        .iter()
        .zip(positives)
        .filter(|(_, &p)| p)
        .map(|(r, _)| r)
        .sum();
    let u = rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

/// Macro-averaged one-vs-rest ROC-AUC.
///
/// Classes that appear in none or all of the examples carry no ranking
/// information and are left out of the average. `None` when every class
/// is degenerate.
pub fn roc_auc_macro(
    probabilities: &[Vec<f64>],
    truth: &[String],
    classes: &[String],
) -> Option<f64> {
    let mut aucs = Vec::new();
    for (i, class) in classes.iter().enumerate() {
        let scores: Vec<f64> = probabilities.iter().map(|row| row[i]).collect();
        let positives: Vec<bool> = truth.iter().map(|t| t == class).collect();
        if let Some(auc) = binary_auc(&scores, &positives) {
            aucs.push(auc);
        }
    }
    if aucs.is_empty() {
        None
    } else {
        Some(aucs.iter().sum::<f64>() / aucs.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(items: &[&str]) -> Vec<String> {
        items.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn accuracy_counts_exact_matches() {
        let truth = s(&["a", "b", "a", "c"]);
        let predicted = s(&["a", "b", "c", "c"]);
        assert_eq!(accuracy(&truth, &predicted), 0.75);
    }

    #[test]
    fn confusion_matrix_covers_union_of_labels() {
        let truth = s(&["greet", "cancel"]);
        let predicted = s(&["greet", "fare"]);
        let matrix = confusion_matrix(&truth, &predicted);
        assert_eq!(matrix.labels, s(&["cancel", "fare", "greet"]));
        // cancel predicted as fare
        assert_eq!(matrix.counts[0][1], 1);
        // greet predicted as greet
        assert_eq!(matrix.counts[2][2], 1);
    }

    #[test]
    fn per_class_report_computes_prf() {
        let truth = s(&["a", "a", "b", "b"]);
        let predicted = s(&["a", "b", "b", "b"]);
        let report = per_class_report(&confusion_matrix(&truth, &predicted));

        let a = report.iter().find(|r| r.label == "a").unwrap();
        assert_eq!(a.precision, 1.0);
        assert_eq!(a.recall, 0.5);
        assert_eq!(a.support, 2);

        let b = report.iter().find(|r| r.label == "b").unwrap();
        assert!((b.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(b.recall, 1.0);
    }

    #[test]
    fn probability_rows_normalize_to_one() {
        let classes = s(&["a", "b"]);
        let rankings = vec![
            vec![("a".to_string(), 0.6), ("b".to_string(), 0.2)],
            vec![],
        ];
        let matrix = probability_matrix(&rankings, &classes);
        assert!((matrix[0][0] - 0.75).abs() < 1e-12);
        assert!((matrix[0][1] - 0.25).abs() < 1e-12);
        // No mass at all falls back to uniform.
        assert_eq!(matrix[1], vec![0.5, 0.5]);
    }

    #[test]
    fn log_loss_of_confident_correct_predictions_is_near_zero() {
        let classes = s(&["a", "b"]);
        let truth = s(&["a", "b"]);
        let probabilities = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(log_loss(&probabilities, &truth, &classes) < 1e-10);
    }

    #[test]
    fn log_loss_of_uniform_predictions_is_ln_two() {
        let classes = s(&["a", "b"]);
        let truth = s(&["a", "b"]);
        let probabilities = vec![vec![0.5, 0.5], vec![0.5, 0.5]];
        let loss = log_loss(&probabilities, &truth, &classes);
        assert!((loss - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn perfect_separation_scores_auc_one() {
        let classes = s(&["a", "b"]);
        let truth = s(&["a", "a", "b", "b"]);
        let probabilities = vec![
            vec![0.9, 0.1],
            vec![0.8, 0.2],
            vec![0.2, 0.8],
            vec![0.1, 0.9],
        ];
        assert_eq!(roc_auc_macro(&probabilities, &truth, &classes), Some(1.0));
    }

    #[test]
    fn single_class_truth_has_no_auc() {
        let classes = s(&["a"]);
        let truth = s(&["a", "a"]);
        let probabilities = vec![vec![1.0], vec![1.0]];
        assert_eq!(roc_auc_macro(&probabilities, &truth, &classes), None);
    }

    #[test]
    fn tied_scores_share_their_mean_rank() {
        assert_eq!(average_ranks(&[0.5, 0.5, 0.9]), vec![1.5, 1.5, 3.0]);
    }
}
