//! Provider trait and the request/result records it exchanges.
//!
//! # Trait-Based Provider Abstraction
//!
//! Using a trait instead of concrete types enables:
//! - **Testing**: the simple provider needs no network and anchors fixtures
//! - **Flexibility**: callers pick a backend per request without code changes
//! - **Resilience**: availability is a first-class, non-throwing query
//!
//! The variant set is closed (`simple`, `ollama`, `openai`) and behavior is
//! selected through [`LLMProvider`] vtable dispatch, never by probing an
//! object for capabilities at runtime.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{RecommendError, Result};
use crate::factory::ProviderType;
use crate::puzzle::GuessAttempt;

/// Minimum pool size for a provider call to be meaningful.
pub const MIN_REMAINING_WORDS: usize = 4;

/// Words in one recommendation.
pub const RECOMMENDATION_SIZE: usize = 4;

// ============================================================================
// Request
// ============================================================================

/// One recommendation request.
///
/// Borrows the caller's pool and history for the duration of the call; the
/// pipeline never copies or retains them.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationRequest<'a> {
    /// Words not yet placed into a correct group.
    pub remaining_words: &'a [String],
    /// Prior four-word submissions, correct or not.
    pub previous_guesses: &'a [GuessAttempt],
    /// Optional free-text context about the puzzle.
    pub puzzle_context: Option<&'a str>,
}

impl<'a> RecommendationRequest<'a> {
    /// Build a request from the caller's pool and history.
    pub fn new(remaining_words: &'a [String], previous_guesses: &'a [GuessAttempt]) -> Self {
        Self {
            remaining_words,
            previous_guesses,
            puzzle_context: None,
        }
    }

    /// Attach free-text puzzle context.
    pub fn with_context(mut self, context: &'a str) -> Self {
        self.puzzle_context = Some(context);
        self
    }

    /// Check the request shape before any provider work happens.
    ///
    /// A short pool is [`RecommendError::InsufficientWords`]; blank words are
    /// a caller-input [`RecommendError::Validation`]. Runs before any network
    /// call is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.remaining_words.len() < MIN_REMAINING_WORDS {
            return Err(RecommendError::InsufficientWords {
                available: self.remaining_words.len(),
            });
        }
        if self.remaining_words.iter().any(|w| w.trim().is_empty()) {
            return Err(RecommendError::Validation {
                message: "remaining words must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Result
// ============================================================================

/// Which backend produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderIdentity {
    /// Provider variant.
    pub provider: ProviderType,
    /// Model name, absent for the rule-based provider.
    pub model: Option<String>,
}

impl ProviderIdentity {
    /// Identity for an LLM-backed provider.
    pub fn with_model(provider: ProviderType, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: Some(model.into()),
        }
    }

    /// Identity for a model-less provider.
    pub fn bare(provider: ProviderType) -> Self {
        Self {
            provider,
            model: None,
        }
    }
}

impl std::fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.model {
            Some(model) => write!(f, "{} ({})", self.provider, model),
            None => write!(f, "{}", self.provider),
        }
    }
}

/// A normalized recommendation.
#[derive(Debug, Clone)]
pub struct RecommendationResult {
    /// At most four words, remapped to the pool's original casing wherever a
    /// case-insensitive match exists.
    pub recommended_words: Vec<String>,
    /// Canonical natural-language explanation of the connection. The wire
    /// layer duplicates this into the legacy field for older consumers.
    pub connection_explanation: Option<String>,
    /// Provider-reported certainty in `[0, 1]`, when available.
    pub confidence_score: Option<f32>,
    /// Backend that produced this result.
    pub provider_used: ProviderIdentity,
    /// Wall-clock generation time in milliseconds; absent for the simple
    /// provider.
    pub generation_time_ms: Option<u64>,
    /// Recommended words with no case-insensitive match in the pool. Passed
    /// through verbatim in `recommended_words` and reported here so callers
    /// can detect hallucinated words instead of silently losing them.
    pub unmatched_words: Vec<String>,
}

// ============================================================================
// Availability
// ============================================================================

/// Tri-state availability of a provider backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Configured and reachable.
    Available,
    /// Required key or URL is missing.
    NotConfigured,
    /// Configured but the probe failed.
    Error,
}

/// Result of a lightweight reachability/credential check.
///
/// An unreachable backend is a value here, never an `Err`; only malformed
/// configuration raises.
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub is_valid: bool,
    pub status: AvailabilityStatus,
    pub message: String,
}

impl Availability {
    pub fn available(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            status: AvailabilityStatus::Available,
            message: message.into(),
        }
    }

    pub fn not_configured(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            status: AvailabilityStatus::NotConfigured,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            status: AvailabilityStatus::Error,
            message: message.into(),
        }
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// One backend capable of producing a recommendation.
///
/// Implementations are `Send + Sync` and shared as `Arc<dyn LLMProvider>`;
/// any number of calls may run concurrently, each bound to its own backend
/// exchange. Dropping the returned future cancels the in-flight request.
#[async_trait]
pub trait LLMProvider: Send + Sync + std::fmt::Debug {
    /// Short provider tag (`simple`, `ollama`, `openai`).
    fn name(&self) -> &str {
        self.provider_type().as_str()
    }

    /// The provider variant.
    fn provider_type(&self) -> ProviderType;

    /// Model in use; empty for model-less providers.
    fn model(&self) -> &str;

    /// Identity attached to produced results.
    fn identity(&self) -> ProviderIdentity {
        let model = self.model();
        if model.is_empty() {
            ProviderIdentity::bare(self.provider_type())
        } else {
            ProviderIdentity::with_model(self.provider_type(), model)
        }
    }

    /// Produce a group recommendation for the request.
    ///
    /// One synchronous request/response exchange against the backend, bounded
    /// by the configured timeout; failures surface as typed errors tagged
    /// with this provider. No retries at this layer.
    async fn generate_recommendation(
        &self,
        request: &RecommendationRequest<'_>,
    ) -> Result<RecommendationResult>;

    /// Lightweight reachability/credential check.
    async fn validate_availability(&self) -> Availability;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_rejects_short_pool() {
        let pool = words(&["BASS", "PIKE", "SOLE"]);
        let request = RecommendationRequest::new(&pool, &[]);
        let err = request.validate().unwrap_err();
        assert!(matches!(
            err,
            RecommendError::InsufficientWords { available: 3 }
        ));
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_validate_rejects_blank_words() {
        let pool = words(&["BASS", "PIKE", "", "CARP"]);
        let request = RecommendationRequest::new(&pool, &[]);
        let err = request.validate().unwrap_err();
        assert_eq!(err.http_status(), 422);
    }

    #[test]
    fn test_validate_accepts_minimum_pool() {
        let pool = words(&["BASS", "PIKE", "SOLE", "CARP"]);
        assert!(RecommendationRequest::new(&pool, &[]).validate().is_ok());
    }

    #[test]
    fn test_identity_display() {
        let simple = ProviderIdentity::bare(ProviderType::Simple);
        assert_eq!(simple.to_string(), "simple");

        let ollama = ProviderIdentity::with_model(ProviderType::Ollama, "qwen2.5:32b");
        assert_eq!(ollama.to_string(), "ollama (qwen2.5:32b)");
    }

    #[test]
    fn test_availability_constructors() {
        let ok = Availability::available("reachable");
        assert!(ok.is_valid);
        assert_eq!(ok.status, AvailabilityStatus::Available);

        let missing = Availability::not_configured("no key");
        assert!(!missing.is_valid);
        assert_eq!(missing.status, AvailabilityStatus::NotConfigured);

        let broken = Availability::error("refused");
        assert!(!broken.is_valid);
        assert_eq!(broken.status, AvailabilityStatus::Error);
    }
}
