//! ROUGE scoring for generated responses
//!
//! F-measures for unigram overlap (ROUGE-1), bigram overlap (ROUGE-2),
//! and longest common subsequence (ROUGE-L). Tokenization lowercases
//! and keeps alphanumeric runs, so punctuation never scores.

use std::collections::HashMap;

/// ROUGE-1/2/L F-measures for one hypothesis/reference pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RougeScores {
    pub rouge1: f64,
    pub rouge2: f64,
    pub rouge_l: f64,
}

pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn ngrams(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

fn f_measure(matches: usize, hyp_total: usize, ref_total: usize) -> f64 {
    if hyp_total == 0 || ref_total == 0 || matches == 0 {
        return 0.0;
    }
    let precision = matches as f64 / hyp_total as f64;
    let recall = matches as f64 / ref_total as f64;
    2.0 * precision * recall / (precision + recall)
}

fn rouge_n(hypothesis: &[String], reference: &[String], n: usize) -> f64 {
    let hyp = ngrams(hypothesis, n);
    let reference = ngrams(reference, n);
    let matches: usize = hyp
        .iter()
        .map(|(gram, count)| count.min(reference.get(gram).unwrap_or(&0)))
        .sum();
    let hyp_total = hypothesis.len().saturating_sub(n - 1);
    let ref_total = reference.values().sum();
    f_measure(matches, hyp_total, ref_total)
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    // Two rolling rows keep this O(min) in memory.
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for token_a in a {
        for (j, token_b) in b.iter().enumerate() {
            curr[j + 1] = if token_a == token_b {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn rouge_l(hypothesis: &[String], reference: &[String]) -> f64 {
    f_measure(
        lcs_length(hypothesis, reference),
        hypothesis.len(),
        reference.len(),
    )
}

/// Score one generated response against its reference.
///
/// Either side empty after tokenization scores zero across the board.
pub fn score(hypothesis: &str, reference: &str) -> RougeScores {
    let hyp = tokenize(hypothesis);
    let reference = tokenize(reference);
    if hyp.is_empty() || reference.is_empty() {
        return RougeScores::default();
    }
    RougeScores {
        rouge1: rouge_n(&hyp, &reference, 1),
        rouge2: rouge_n(&hyp, &reference, 2),
        rouge_l: rouge_l(&hyp, &reference),
    }
}
