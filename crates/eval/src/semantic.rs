//! Embedding-based response scoring
//!
//! A BERTScore-style F1: embed every token of the hypothesis and the
//! reference, greedily match each token to its most similar counterpart
//! by cosine similarity, and combine the two directions into an F1.

use crate::model::ModelError;
use crate::rouge::tokenize;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text to vector embedding
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One embedding per input text, in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError>;
}

#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

/// [`Embedder`] backed by an embedding server's HTTP API
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl HttpEmbedder {
    pub fn new(config: EmbedderConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        let url = format!("{}/api/embed", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?
            .error_for_status()?;

        let payload: EmbedResponse = response
            .json()
            .await
            .map_err(|e| ModelError::BadPayload(e.to_string()))?;

        if payload.embeddings.len() != texts.len() {
            return Err(ModelError::BadPayload(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                payload.embeddings.len()
            )));
        }
        Ok(payload.embeddings)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Mean over `from` of the best cosine match in `to`.
fn greedy_direction(from: &[Vec<f32>], to: &[Vec<f32>]) -> f64 {
    let total: f64 = from
        .iter()
        .map(|v| {
            to.iter()
                .map(|w| cosine(v, w))
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .sum();
    total / from.len() as f64
}

/// Token-level semantic F1 between a generated response and a reference.
///
/// Either side tokenizing to nothing scores zero, matching the ROUGE
/// convention for empty pairs.
pub async fn semantic_f1(
    embedder: &dyn Embedder,
    hypothesis: &str,
    reference: &str,
) -> Result<f64, ModelError> {
    let hyp_tokens = tokenize(hypothesis);
    let ref_tokens = tokenize(reference);
    if hyp_tokens.is_empty() || ref_tokens.is_empty() {
        return Ok(0.0);
    }

    let hyp_vectors = embedder.embed(&hyp_tokens).await?;
    let ref_vectors = embedder.embed(&ref_tokens).await?;

    let precision = greedy_direction(&hyp_vectors, &ref_vectors);
    let recall = greedy_direction(&ref_vectors, &hyp_vectors);
    if precision + recall <= 0.0 {
        return Ok(0.0);
    }
    Ok(2.0 * precision * recall / (precision + recall))
}
