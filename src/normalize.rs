//! Validation and normalization of structured backend replies.
//!
//! A backend reply that survived parsing still needs normalization before it
//! becomes a [`RecommendationResult`]: word casing is remapped onto the pool,
//! the list is truncated to four, the two explanation fields collapse into
//! the one canonical field, and timing is attached.

use std::time::Duration;

use tracing::warn;

use crate::providers::StructuredReply;
use crate::traits::{ProviderIdentity, RecommendationResult, RECOMMENDATION_SIZE};

/// Normalize a parsed backend reply against the request's pool.
///
/// Casing: for each recommended word the first remaining word whose
/// case-folded form matches wins, and its original casing is emitted. A word
/// with no match is emitted verbatim and recorded in `unmatched_words`. The
/// membership invariant is then violated, but visibly, so callers can detect
/// hallucinated words rather than having them silently dropped.
pub fn normalize(
    reply: StructuredReply,
    remaining_words: &[String],
    elapsed: Option<Duration>,
    identity: ProviderIdentity,
) -> RecommendationResult {
    let mut recommended = Vec::with_capacity(RECOMMENDATION_SIZE);
    let mut unmatched = Vec::new();

    for word in reply.recommended_words.into_iter().take(RECOMMENDATION_SIZE) {
        let folded = word.to_lowercase();
        match remaining_words
            .iter()
            .find(|candidate| candidate.to_lowercase() == folded)
        {
            Some(original) => recommended.push(original.clone()),
            None => {
                warn!(
                    provider = %identity,
                    word = %word,
                    "Recommended word has no match in the remaining pool"
                );
                unmatched.push(word.clone());
                recommended.push(word);
            }
        }
    }

    RecommendationResult {
        recommended_words: recommended,
        connection_explanation: canonical_explanation(&reply.connection, &reply.explanation),
        confidence_score: reply.confidence.map(|c| c.clamp(0.0, 1.0)),
        provider_used: identity,
        generation_time_ms: elapsed.map(|d| d.as_millis() as u64),
        unmatched_words: unmatched,
    }
}

/// Collapse the backend's `connection`/`explanation` pair into one canonical
/// field: the fuller `explanation` wins, the short label is the fallback.
fn canonical_explanation(connection: &str, explanation: &str) -> Option<String> {
    let explanation = explanation.trim();
    if !explanation.is_empty() {
        return Some(explanation.to_string());
    }
    let connection = connection.trim();
    if !connection.is_empty() {
        return Some(connection.to_string());
    }
    None
}
