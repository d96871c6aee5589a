//! OpenAI provider implementation.
//!
//! Talks to the OpenAI chat completions API (or any endpoint that speaks it)
//! with `response_format: {"type": "json_object"}` so the model is
//! constrained to a single JSON object. The reply content then goes through
//! the same structured-reply validation as every other LLM backend.
//!
//! # Configuration
//!
//! Constructed from [`OpenAiSettings`]: API key, model name (default
//! `gpt-4o-mini`), and request timeout. The base URL defaults to the public
//! API and is overridable for compatible endpoints and tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::OpenAiSettings;
use crate::error::{RecommendError, Result};
use crate::factory::ProviderType;
use crate::normalize::normalize;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::providers::parse_structured_reply;
use crate::traits::{Availability, LLMProvider, RecommendationRequest, RecommendationResult};

/// Public OpenAI API base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Timeout for the availability probe; unrelated to the generation timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenAI-backed recommendation provider.
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIProvider {
    /// Build a provider from settings.
    pub fn new(settings: &OpenAiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| RecommendError::Configuration {
                provider: ProviderType::OpenAI,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: settings.model.clone(),
        })
    }

    /// Override the model, e.g. from a per-request selector.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at an OpenAI-compatible endpoint instead of the public API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

// Chat completions API response shape (request is assembled as JSON directly).

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_recommendation(
        &self,
        request: &RecommendationRequest<'_>,
    ) -> Result<RecommendationResult> {
        request.validate()?;

        let url = format!("{}/chat/completions", self.base_url);
        let messages = vec![
            RequestMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            RequestMessage {
                role: "user",
                content: user_prompt(request),
            },
        ];
        let body = json!({
            "model": self.model,
            "messages": messages,
            "response_format": {"type": "json_object"},
        });

        debug!(
            url = %url,
            model = %self.model,
            pool = request.remaining_words.len(),
            "OpenAI chat request"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecommendError::from_transport(ProviderType::OpenAI, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "OpenAI API error");
            return Err(RecommendError::from_status(
                ProviderType::OpenAI,
                status.as_u16(),
                &text,
            ));
        }

        let completion: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| RecommendError::MalformedResponse {
                    provider: ProviderType::OpenAI,
                    message: format!("failed to decode completion envelope: {}", e),
                })?;
        let elapsed = started.elapsed();

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| RecommendError::MalformedResponse {
                provider: ProviderType::OpenAI,
                message: "completion carried no message content".to_string(),
            })?;

        let reply = parse_structured_reply(content).map_err(|message| {
            RecommendError::MalformedResponse {
                provider: ProviderType::OpenAI,
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
        if self.api_key.is_empty() {
            return Availability::not_configured("OPENAI_API_KEY is not set");
        }

        let url = format!("{}/models", self.base_url);
        match self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                Availability::available("OpenAI API key accepted")
            }
            Ok(response) if response.status().as_u16() == 401 => {
                Availability::error("OpenAI rejected the configured API key")
            }
            Ok(response) => Availability::error(format!(
                "OpenAI API answered HTTP {}",
                response.status().as_u16()
            )),
            Err(e) => Availability::error(format!("OpenAI API unreachable: {}", e)),
        }
    }
}
