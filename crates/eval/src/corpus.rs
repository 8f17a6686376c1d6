//! CSV corpus loading
//!
//! Corpora are hand-labeled spreadsheets, so blank rows and stray
//! whitespace are expected. Blank rows are skipped with a warning, not
//! treated as errors.

use crate::error::EvalError;
use std::path::Path;

/// One labeled intent example
#[derive(Debug, Clone, PartialEq)]
pub struct IntentExample {
    pub input: String,
    pub expected_intent: String,
}

/// One input/reference pair for response scoring
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseExample {
    pub input: String,
    pub reference: String,
}

const INTENT_INPUT_COLUMN: &str = "UserInput";
const INTENT_LABEL_COLUMN: &str = "ExpectedIntent";
const RESPONSE_INPUT_COLUMN: &str = "UserInput (Clean)";
const RESPONSE_REFERENCE_COLUMN: &str = "Predicted Bot Response";

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, EvalError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| EvalError::MissingColumn(name.to_string()))
}

fn load_pairs(
    path: &Path,
    first_column: &str,
    second_column: &str,
) -> Result<Vec<(String, String)>, EvalError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let first = column_index(&headers, first_column)?;
    let second = column_index(&headers, second_column)?;

    let mut pairs = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let a = record.get(first).unwrap_or("").trim();
        let b = record.get(second).unwrap_or("").trim();
        if a.is_empty() || b.is_empty() {
            // Row 1 is the header line.
            tracing::warn!(row = row + 2, "Skipping blank corpus row");
            continue;
        }
        pairs.push((a.to_string(), b.to_string()));
    }

    if pairs.is_empty() {
        return Err(EvalError::EmptyCorpus);
    }
    Ok(pairs)
}

/// Load the intent corpus (`UserInput` / `ExpectedIntent` columns).
pub fn load_intent_corpus(path: &Path) -> Result<Vec<IntentExample>, EvalError> {
    let pairs = load_pairs(path, INTENT_INPUT_COLUMN, INTENT_LABEL_COLUMN)?;
    tracing::info!(examples = pairs.len(), path = %path.display(), "Loaded intent corpus");
    Ok(pairs
        .into_iter()
        .map(|(input, expected_intent)| IntentExample {
            input,
            expected_intent,
        })
        .collect())
}

/// Load the response corpus (`UserInput (Clean)` / `Predicted Bot Response`).
pub fn load_response_corpus(path: &Path) -> Result<Vec<ResponseExample>, EvalError> {
    let pairs = load_pairs(path, RESPONSE_INPUT_COLUMN, RESPONSE_REFERENCE_COLUMN)?;
    tracing::info!(examples = pairs.len(), path = %path.display(), "Loaded response corpus");
    Ok(pairs
        .into_iter()
        .map(|(input, reference)| ResponseExample { input, reference })
        .collect())
}
