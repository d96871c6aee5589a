//! Rule-based provider: deterministic, no network.
//!
//! Recommends the first four remaining words in their original order. Useful
//! as an always-available fallback and as the deterministic anchor for tests
//! and fixtures.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::factory::ProviderType;
use crate::traits::{
    Availability, LLMProvider, RecommendationRequest, RecommendationResult, RECOMMENDATION_SIZE,
};

/// Fixed confidence the rule-based strategy reports.
const SIMPLE_CONFIDENCE: f32 = 0.5;

/// Deterministic provider with no external dependency.
#[derive(Debug, Clone, Default)]
pub struct SimpleProvider;

impl SimpleProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LLMProvider for SimpleProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Simple
    }

    fn model(&self) -> &str {
        ""
    }

    async fn generate_recommendation(
        &self,
        request: &RecommendationRequest<'_>,
    ) -> Result<RecommendationResult> {
        request.validate()?;

        let recommended: Vec<String> = request
            .remaining_words
            .iter()
            .take(RECOMMENDATION_SIZE)
            .cloned()
            .collect();

        debug!(words = ?recommended, "Simple provider recommendation");

        Ok(RecommendationResult {
            recommended_words: recommended,
            connection_explanation: None,
            confidence_score: Some(SIMPLE_CONFIDENCE),
            provider_used: self.identity(),
            generation_time_ms: None,
            unmatched_words: Vec::new(),
        })
    }

    async fn validate_availability(&self) -> Availability {
        Availability::available("simple provider has no external dependency")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_returns_first_four_words_in_order() {
        let remaining = pool(&["BASS", "PIKE", "SOLE", "CARP", "APPLE"]);
        let request = RecommendationRequest::new(&remaining, &[]);
        let provider = SimpleProvider::new();

        let result = provider.generate_recommendation(&request).await.unwrap();

        assert_eq!(result.recommended_words, pool(&["BASS", "PIKE", "SOLE", "CARP"]));
        assert!(result.connection_explanation.is_none());
        assert_eq!(result.confidence_score, Some(SIMPLE_CONFIDENCE));
        assert!(result.generation_time_ms.is_none());
        assert_eq!(result.provider_used.to_string(), "simple");
    }

    #[tokio::test]
    async fn test_idempotent_across_calls() {
        let remaining = pool(&["A", "B", "C", "D", "E", "F"]);
        let request = RecommendationRequest::new(&remaining, &[]);
        let provider = SimpleProvider::new();

        let first = provider.generate_recommendation(&request).await.unwrap();
        let second = provider.generate_recommendation(&request).await.unwrap();

        assert_eq!(first.recommended_words, second.recommended_words);
        assert_eq!(first.confidence_score, second.confidence_score);
    }

    #[tokio::test]
    async fn test_rejects_short_pool() {
        let remaining = pool(&["A", "B", "C"]);
        let request = RecommendationRequest::new(&remaining, &[]);
        let err = SimpleProvider::new()
            .generate_recommendation(&request)
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn test_always_available() {
        let availability = SimpleProvider::new().validate_availability().await;
        assert!(availability.is_valid);
    }
}
