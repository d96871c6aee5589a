//! Connections LLM - provider abstraction and recommendation pipeline for
//! Connections-style word puzzles.
//!
//! Given a shrinking pool of puzzle words and the history of prior guesses,
//! the crate asks one of several interchangeable backends to suggest a group
//! of four related words. All backends sit behind one trait, return the same
//! normalized result record, and fail through one closed error taxonomy with
//! a deterministic HTTP status mapping.
//!
//! # Providers
//!
//! | Provider | Backend | Availability requirement |
//! |----------|---------|--------------------------|
//! | simple | Rule-based, no network | None (always available) |
//! | ollama | Local models via the Ollama API | `OLLAMA_BASE_URL` |
//! | openai | Hosted models via the OpenAI API | `OPENAI_API_KEY` |
//!
//! # Architecture
//!
//! - [`traits::LLMProvider`] is the polymorphic contract; the variant set is
//!   closed and selected by tag, never by runtime capability probing.
//! - [`factory::ProviderFactory`] resolves tags to providers and reports
//!   which ones the current configuration supports.
//! - [`service::RecommendationService`] orchestrates one call: resolve,
//!   validate, invoke, and guarantee typed failures.
//! - LLM backends must reply with a single JSON object carrying
//!   `recommended_words`, `connection`, and `explanation`; anything else is a
//!   [`error::RecommendError::MalformedResponse`]. There is no free-text
//!   fallback.
//! - [`config::SettingsCache`] is an explicitly passed configuration handle
//!   with one documented invalidation operation; no hidden global.
//!
//! # Example
//!
//! ```ignore
//! use connections_llm::{RecommendationRequest, RecommendationService};
//!
//! let service = RecommendationService::from_env();
//! let request = RecommendationRequest::new(&remaining_words, &previous_guesses);
//! let result = service.recommend(&request, "ollama", None).await?;
//! println!("try: {:?}", result.recommended_words);
//! ```
//!
//! # See Also
//!
//! - [`crate::traits`] for the provider contract and data records
//! - [`crate::providers`] for concrete implementations
//! - [`crate::error`] for the failure taxonomy and status mapping
//! - [`crate::wire`] for the JSON shapes the HTTP boundary serves

pub mod config;
pub mod error;
pub mod factory;
pub mod normalize;
pub mod prompt;
pub mod providers;
pub mod puzzle;
pub mod service;
pub mod traits;
pub mod wire;

pub use config::{OllamaSettings, OpenAiSettings, ProviderSettings, SettingsCache};
pub use error::{ErrorKind, RecommendError, Result};
pub use factory::{ProviderFactory, ProviderType};
pub use normalize::normalize;
pub use providers::{OllamaProvider, OpenAIProvider, SimpleProvider, StructuredReply};
pub use puzzle::{CompletedGroup, GameStatus, GuessAttempt, PuzzleState};
pub use service::RecommendationService;
pub use traits::{
    Availability, AvailabilityStatus, LLMProvider, ProviderIdentity, RecommendationRequest,
    RecommendationResult,
};
pub use wire::{ErrorBody, WireRecommendation, WireRecommendationRequest};
