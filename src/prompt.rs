//! Prompt construction shared by the LLM-backed providers.
//!
//! Both backends receive the same two messages: a fixed system prompt pinning
//! the output contract, and a user prompt enumerating the pool, the guess
//! history, and any caller-supplied context. The reply must be a single JSON
//! object; the structured-output switch on each backend enforces the shape,
//! and the parser rejects anything else.

use crate::traits::RecommendationRequest;

/// System prompt fixing the role and the reply contract.
pub const SYSTEM_PROMPT: &str = "You are an expert at Connections-style word puzzles. \
Given a pool of words, you identify a group of exactly four words that share a connection. \
Respond with a single JSON object containing exactly these keys: \
\"recommended_words\" (an array of exactly four words chosen from the pool), \
\"connection\" (a short label for what links them), and \
\"explanation\" (one or two sentences explaining the connection). \
Do not include any text outside the JSON object.";

/// Render the user prompt for a request.
pub fn user_prompt(request: &RecommendationRequest<'_>) -> String {
    let mut prompt = String::with_capacity(512);

    prompt.push_str(&format!(
        "Find a group of exactly four related words from this pool of {}:\n",
        request.remaining_words.len()
    ));
    prompt.push_str(&request.remaining_words.join(", "));
    prompt.push('\n');

    if !request.previous_guesses.is_empty() {
        prompt.push_str("\nPrevious guesses:\n");
        for guess in request.previous_guesses {
            let outcome = if guess.is_correct() {
                "correct"
            } else {
                "incorrect, avoid repeating this exact group"
            };
            prompt.push_str(&format!("- {} ({})\n", guess.words().join(", "), outcome));
        }
    }

    if let Some(context) = request.puzzle_context {
        if !context.trim().is_empty() {
            prompt.push_str(&format!("\nPuzzle context: {}\n", context.trim()));
        }
    }

    prompt.push_str("\nReply with the JSON object only.");
    prompt
}
