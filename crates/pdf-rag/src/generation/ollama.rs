//! Ollama HTTP client shared by the embedding and generation providers

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Ollama API client
///
/// Every request is bounded by the client timeout. Failures are returned as-is;
/// there is no retry.
#[derive(Clone)]
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Server base URL without trailing slash
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
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

/// Which service a failed request belonged to
#[derive(Debug, Clone, Copy)]
enum Service {
    Embedding,
    Generation,
}

impl Service {
    fn unavailable(self, message: String) -> Error {
        match self {
            Service::Embedding => Error::EmbeddingUnavailable(message),
            Service::Generation => Error::GenerationUnavailable(message),
        }
    }

    fn failed(self, message: String) -> Error {
        match self {
            Service::Embedding => Error::Embedding(message),
            Service::Generation => Error::Generation(message),
        }
    }

    /// Connection and timeout failures mean the server is not there
    fn map_send_error(self, base_url: &str, e: reqwest::Error) -> Error {
        if e.is_connect() || e.is_timeout() {
            self.unavailable(format!(
                "cannot reach Ollama at {} ({}); is `ollama serve` running?",
                base_url, e
            ))
        } else {
            self.failed(format!("request failed: {}", e))
        }
    }
}

impl OllamaClient {
    /// Create a client whose requests time out after `timeout_secs`
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe against `/api/tags`
    pub async fn health_check(&self, timeout: Duration) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).timeout(timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Ollama probe failed: {}", e);
                false
            }
        }
    }

    /// Embed a batch of texts through `/api/embed`
    pub async fn embed(&self, model: &str, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let service = Service::Embedding;

        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { model, input })
            .send()
            .await
            .map_err(|e| service.map_send_error(&self.base_url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(service.failed(format!(
                "HTTP {} from model '{}': {}",
                status, model, body
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| service.failed(format!("Failed to parse embedding response: {}", e)))?;

        if parsed.embeddings.len() != input.len() {
            return Err(service.failed(format!(
                "expected {} embeddings, got {}",
                input.len(),
                parsed.embeddings.len()
            )));
        }

        Ok(parsed.embeddings)
    }

    /// Complete a prompt through `/api/generate` (non-streaming)
    pub async fn generate(&self, model: &str, prompt: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let service = Service::Generation;

        tracing::info!("Generating answer with model: {}", model);

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| service.map_send_error(&self.base_url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(service.failed(format!(
                "HTTP {} from model '{}': {}",
                status, model, body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| service.failed(format!("Failed to parse generation response: {}", e)))?;

        Ok(parsed.response)
    }
}
