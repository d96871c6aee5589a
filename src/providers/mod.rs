//! Provider implementations.
//!
//! The closed variant set behind [`crate::traits::LLMProvider`]:
//! - [`simple::SimpleProvider`]: deterministic, no network
//! - [`ollama::OllamaProvider`]: local models over the Ollama HTTP API
//! - [`openai::OpenAIProvider`]: hosted models over the OpenAI API
//!
//! Both LLM-backed variants share the structured-reply contract below.

pub mod ollama;
pub mod openai;
pub mod simple;

pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use simple::SimpleProvider;

use serde::Deserialize;

/// Required keys in every structured backend reply.
pub const REQUIRED_REPLY_KEYS: [&str; 3] = ["recommended_words", "connection", "explanation"];

/// The structured object an LLM backend must return.
#[derive(Debug, Clone, Deserialize)]
pub struct StructuredReply {
    /// Candidate group; truncated to four during normalization.
    pub recommended_words: Vec<String>,
    /// Short label for the connection.
    pub connection: String,
    /// Fuller explanation of the connection.
    pub explanation: String,
    /// Self-reported certainty, if the model volunteers one.
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Parse a backend reply into a [`StructuredReply`].
///
/// The reply must be a JSON object carrying all of [`REQUIRED_REPLY_KEYS`].
/// Anything else (free text, a JSON array, a partial object) is rejected
/// with a description of what was wrong; there is deliberately no fallback
/// to heuristic text parsing. Callers wrap the message into
/// [`crate::error::RecommendError::MalformedResponse`] with their own
/// provider tag.
pub(crate) fn parse_structured_reply(raw: &str) -> Result<StructuredReply, String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("reply is not valid JSON: {}", e))?;

    let object = value
        .as_object()
        .ok_or_else(|| "reply is not a JSON object".to_string())?;

    for key in REQUIRED_REPLY_KEYS {
        if !object.contains_key(key) {
            return Err(format!("reply is missing required key '{}'", key));
        }
    }

    serde_json::from_value(value).map_err(|e| format!("reply fields have the wrong shape: {}", e))
}
