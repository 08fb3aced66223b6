//! Embedder backed by an OpenAI-compatible `/v1/embeddings` endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::Embedder;
use crate::config::EmbeddingConfig;
use crate::{Result, TripPlannerError, cache};

/// Cached query vectors live a week unless configured otherwise
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub struct HttpEmbedder {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
    cache_ttl: Duration,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    /// Shortened output size, honoured by the v3 embedding models
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Create from configuration
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TripPlanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TripPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            dimensions: config.dimensions as usize,
            cache_ttl: DEFAULT_CACHE_TTL,
        })
    }

    /// How long query vectors stay in the persistent cache
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    fn cache_key(&self, text: &str) -> String {
        format!("embedding:{}:{}", self.model, text)
    }

    fn request_body<'a>(&'a self, texts: &'a [String]) -> EmbedRequest<'a> {
        EmbedRequest {
            model: &self.model,
            input: texts,
            dimensions: (self.dimensions > 0).then_some(self.dimensions),
        }
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let url = format!("{}/v1/embeddings", self.base_url);

        let mut req = self.http_client.post(&url).json(&self.request_body(texts));
        if let Some(ref api_key) = self.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TripPlannerError::api(format!(
                "Embedding service error (HTTP {status}): {body}"
            )));
        }

        let mut parsed: EmbedResponse = response.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(TripPlannerError::api(format!(
                "Embedding service returned {} vectors for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }
        parsed.data.sort_by_key(|d| d.index.unwrap_or(0));
        if let Some(bad) = parsed.data.iter().find(|d| d.embedding.len() != self.dimensions) {
            return Err(TripPlannerError::api(format!(
                "Embedding model '{}' returned {} dimensions, expected {}",
                self.model,
                bad.embedding.len(),
                self.dimensions
            )));
        }

        debug!(
            "Embedded {} texts in {:.3}s",
            texts.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let key = self.cache_key(text);
        match cache::get::<Vec<f32>>(&key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => warn!("Embedding cache lookup failed: {}", e),
        }

        let embedding = self
            .request(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TripPlannerError::api("No embedding returned"))?;

        if let Err(e) = cache::put(&key, embedding.clone(), self.cache_ttl).await {
            warn!("Embedding cache store failed: {}", e);
        }
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        const BATCH_SIZE: usize = 64;

        let mut all = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            all.extend(self.request(chunk).await?);
        }
        Ok(all)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
