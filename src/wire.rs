//! Serialization-boundary views served by the surrounding HTTP layer.
//!
//! The core keeps one canonical explanation field; this module is the
//! compatibility adapter that fans it out to older consumers, and the one
//! place error values become response bodies. The transport itself lives
//! outside this crate; these types only fix the JSON shapes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RecommendError;
use crate::puzzle::GuessAttempt;
use crate::traits::{RecommendationRequest, RecommendationResult};

/// Wire form of the single exposed operation: a POSTed recommendation
/// request with its provider selector.
///
/// Guess arity is enforced during deserialization; pool size and word shape
/// are checked by [`RecommendationRequest::validate`] once dispatched.
#[derive(Debug, Clone, Deserialize)]
pub struct WireRecommendationRequest {
    pub remaining_words: Vec<String>,
    #[serde(default)]
    pub previous_guesses: Vec<GuessAttempt>,
    #[serde(default)]
    pub puzzle_context: Option<String>,
    pub provider_type: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl WireRecommendationRequest {
    /// Borrow this body as the core request record.
    pub fn as_request(&self) -> RecommendationRequest<'_> {
        let request = RecommendationRequest::new(&self.remaining_words, &self.previous_guesses);
        match self.puzzle_context.as_deref() {
            Some(context) => request.with_context(context),
            None => request,
        }
    }
}

/// Wire form of a successful recommendation.
///
/// `connection` duplicates `connection_explanation` for consumers that
/// predate the rename; both always carry the same value.
#[derive(Debug, Clone, Serialize)]
pub struct WireRecommendation {
    pub recommended_words: Vec<String>,
    pub connection: Option<String>,
    pub connection_explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
    pub provider_used: String,
    pub generation_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched_words: Vec<String>,
}

impl From<&RecommendationResult> for WireRecommendation {
    fn from(result: &RecommendationResult) -> Self {
        Self {
            recommended_words: result.recommended_words.clone(),
            connection: result.connection_explanation.clone(),
            connection_explanation: result.connection_explanation.clone(),
            confidence_score: result.confidence_score,
            provider_used: result.provider_used.to_string(),
            generation_time_ms: result.generation_time_ms,
            unmatched_words: result.unmatched_words.clone(),
        }
    }
}

/// Wire form of a failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Human-readable title of the failure kind.
    pub error: String,
    /// Full message for this specific failure.
    pub detail: String,
    /// Stable machine-readable code; callers branch on this, not on prose.
    pub error_code: &'static str,
    /// Request path the failure was served for.
    pub path: String,
    /// Structured context, when the kind carries any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Originating provider, for provider-sourced failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
}

impl ErrorBody {
    /// Build the response body for an error at the given request path.
    ///
    /// The matching HTTP status comes from
    /// [`RecommendError::http_status`]; this only shapes the payload.
    pub fn new(error: &RecommendError, path: impl Into<String>) -> Self {
        Self {
            error: error.kind().title().to_string(),
            detail: error.to_string(),
            error_code: error.error_code(),
            path: path.into(),
            details: structured_details(error),
            provider_type: error.provider().map(|p| p.to_string()),
        }
    }
}

fn structured_details(error: &RecommendError) -> Option<Value> {
    match error {
        RecommendError::InsufficientWords { available } => Some(json!({
            "available": available,
            "required": crate::traits::MIN_REMAINING_WORDS,
        })),
        RecommendError::InvalidProvider { requested } => Some(json!({
            "requested": requested,
            "supported": crate::factory::ProviderType::all()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>(),
        })),
        RecommendError::Unavailable { timed_out, .. } => Some(json!({
            "timed_out": timed_out,
        })),
        _ => None,
    }
}
