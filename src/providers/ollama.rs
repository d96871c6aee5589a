//! Ollama provider implementation.
//!
//! Talks to a locally running Ollama instance over its HTTP API. The chat
//! call is made with `stream: false` and `format: "json"`, Ollama's
//! structured-output switch, so the model's reply arrives as a single JSON
//! object ready for [`crate::providers::parse_structured_reply`].
//!
//! # Configuration
//!
//! Constructed from [`OllamaSettings`]: base URL (e.g.
//! `http://localhost:11434`), model name, and request timeout.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OllamaSettings;
use crate::error::{RecommendError, Result};
use crate::factory::ProviderType;
use crate::normalize::normalize;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::providers::parse_structured_reply;
use crate::traits::{Availability, LLMProvider, RecommendationRequest, RecommendationResult};

/// Timeout for the availability probe; unrelated to the generation timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Ollama-backed recommendation provider.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Build a provider from settings.
    pub fn new(settings: &OllamaSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .no_proxy() // proxies break localhost connections
            .build()
            .map_err(|e| RecommendError::Configuration {
                provider: ProviderType::Ollama,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    /// Override the model, e.g. from a per-request selector.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Base URL this provider talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Ollama API request/response structures

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    /// `"json"` constrains the model to emit a single JSON object.
    format: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_recommendation(
        &self,
        request: &RecommendationRequest<'_>,
    ) -> Result<RecommendationResult> {
        request.validate()?;

        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(request),
                },
            ],
            stream: false,
            format: "json",
        };

        debug!(
            url = %url,
            model = %self.model,
            pool = request.remaining_words.len(),
            "Ollama chat request"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecommendError::from_transport(ProviderType::Ollama, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RecommendError::from_status(
                ProviderType::Ollama,
                status.as_u16(),
                &text,
            ));
        }

        let response: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| RecommendError::MalformedResponse {
                    provider: ProviderType::Ollama,
                    message: format!("failed to decode chat envelope: {}", e),
                })?;
        let elapsed = started.elapsed();

        let reply = parse_structured_reply(&response.message.content).map_err(|message| {
            RecommendError::MalformedResponse {
                provider: ProviderType::Ollama,
                message,
            }
        })?;

        Ok(normalize(
            reply,
            request.remaining_words,
            Some(elapsed),
            self.identity(),
        ))
    }

    async fn validate_availability(&self) -> Availability {
        if self.base_url.is_empty() {
            return Availability::not_configured("OLLAMA_BASE_URL is not set");
        }

        let url = format!("{}/api/tags", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                Availability::available(format!("Ollama reachable at {}", self.base_url))
            }
            Ok(response) => Availability::error(format!(
                "Ollama at {} answered HTTP {}",
                self.base_url,
                response.status().as_u16()
            )),
            Err(e) => Availability::error(format!("Ollama at {} unreachable: {}", self.base_url, e)),
        }
    }
}
