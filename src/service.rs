//! Recommendation orchestration.
//!
//! [`RecommendationService`] is the crate's front door: it resolves the
//! requested provider, validates the request shape before any network work,
//! invokes the provider, and guarantees that every failure leaving it is one
//! of the typed kinds in [`crate::error`]. It never suppresses an error,
//! only translates it.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{RecommendError, Result};
use crate::factory::{ProviderFactory, ProviderType};
use crate::traits::{Availability, RecommendationRequest, RecommendationResult};

/// Orchestrates provider selection, validation, and invocation.
#[derive(Debug, Clone)]
pub struct RecommendationService {
    factory: ProviderFactory,
}

impl RecommendationService {
    /// Build a service over an explicit factory.
    pub fn new(factory: ProviderFactory) -> Self {
        Self { factory }
    }

    /// Build a service whose configuration loads from the environment.
    pub fn from_env() -> Self {
        Self::new(ProviderFactory::from_env())
    }

    /// The factory this service resolves providers through.
    pub fn factory(&self) -> &ProviderFactory {
        &self.factory
    }

    /// Produce a recommendation with the requested provider.
    ///
    /// Failure order: unknown tag ([`RecommendError::InvalidProvider`]),
    /// unconfigured provider ([`RecommendError::Configuration`]), request
    /// shape ([`RecommendError::InsufficientWords`] /
    /// [`RecommendError::Validation`]), all before any network call, then
    /// whatever typed error the provider itself surfaces.
    pub async fn recommend(
        &self,
        request: &RecommendationRequest<'_>,
        provider_tag: &str,
        model_override: Option<&str>,
    ) -> Result<RecommendationResult> {
        let provider_type =
            ProviderType::parse(provider_tag).ok_or_else(|| RecommendError::InvalidProvider {
                requested: provider_tag.to_string(),
            })?;

        let provider = self.factory.create(provider_type, model_override)?;
        request.validate()?;

        debug!(
            provider = %provider.identity(),
            pool = request.remaining_words.len(),
            guesses = request.previous_guesses.len(),
            "Dispatching recommendation request"
        );

        provider.generate_recommendation(request).await
    }

    /// Availability of one provider, by tag.
    pub async fn check_provider(&self, provider_tag: &str) -> Result<Availability> {
        let provider_type =
            ProviderType::parse(provider_tag).ok_or_else(|| RecommendError::InvalidProvider {
                requested: provider_tag.to_string(),
            })?;

        match self.factory.create(provider_type, None) {
            Ok(provider) => Ok(provider.validate_availability().await),
            // An unconfigured provider is a reportable state, not a failure.
            Err(RecommendError::Configuration { message, .. }) => {
                Ok(Availability::not_configured(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Which provider types are currently usable (configuration-level check,
    /// no network traffic).
    pub fn available_providers(&self) -> BTreeMap<ProviderType, bool> {
        self.factory.available_providers()
    }
}
