//! Provider factory: tag parsing, construction, and availability reporting.
//!
//! The factory owns a [`SettingsCache`] handle and is the only place
//! providers are constructed. Availability is computed fresh on every call
//! from the current settings snapshot (there is no availability cache), so
//! an explicit settings invalidation is observed by the very next query.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::SettingsCache;
use crate::error::{RecommendError, Result};
use crate::providers::{OllamaProvider, OpenAIProvider, SimpleProvider};
use crate::traits::LLMProvider;

/// Supported provider types. Closed set: unknown tags fail with
/// [`RecommendError::InvalidProvider`], never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Rule-based provider, no external dependency.
    Simple,
    /// Local models via the Ollama HTTP API.
    Ollama,
    /// Hosted models via the OpenAI API.
    OpenAI,
}

impl ProviderType {
    /// Parse a provider tag, case-insensitively.
    ///
    /// ```
    /// use connections_llm::ProviderType;
    ///
    /// assert_eq!(ProviderType::parse("simple"), Some(ProviderType::Simple));
    /// assert_eq!(ProviderType::parse("OLLAMA"), Some(ProviderType::Ollama));
    /// assert_eq!(ProviderType::parse("gemini"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "ollama" => Some(Self::Ollama),
            "openai" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// The canonical tag for this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
        }
    }

    /// Every supported provider, in tag order.
    pub fn all() -> [Self; 3] {
        [Self::Simple, Self::Ollama, Self::OpenAI]
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constructs providers against the current configuration.
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    settings: Arc<SettingsCache>,
}

impl ProviderFactory {
    /// Build a factory over an explicit settings cache.
    pub fn new(settings: Arc<SettingsCache>) -> Self {
        Self { settings }
    }

    /// Build a factory whose settings load lazily from the environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(SettingsCache::new()))
    }

    /// The settings cache this factory reads.
    pub fn settings(&self) -> &SettingsCache {
        &self.settings
    }

    /// Construct a provider of the given type, optionally overriding the
    /// configured model.
    ///
    /// A known-but-unconfigured provider fails with
    /// [`RecommendError::Configuration`]. No network traffic happens here.
    pub fn create(
        &self,
        provider_type: ProviderType,
        model_override: Option<&str>,
    ) -> Result<Arc<dyn LLMProvider>> {
        let settings = self.settings.current();

        match provider_type {
            ProviderType::Simple => Ok(Arc::new(SimpleProvider::new())),
            ProviderType::Ollama => {
                let ollama =
                    settings
                        .ollama
                        .as_ref()
                        .ok_or_else(|| RecommendError::Configuration {
                            provider: ProviderType::Ollama,
                            message: "OLLAMA_BASE_URL is not set".to_string(),
                        })?;
                let mut provider = OllamaProvider::new(ollama)?;
                if let Some(model) = model_override {
                    provider = provider.with_model(model);
                }
                Ok(Arc::new(provider))
            }
            ProviderType::OpenAI => {
                let openai =
                    settings
                        .openai
                        .as_ref()
                        .ok_or_else(|| RecommendError::Configuration {
                            provider: ProviderType::OpenAI,
                            message: "OPENAI_API_KEY is not set".to_string(),
                        })?;
                let mut provider = OpenAIProvider::new(openai)?;
                if let Some(model) = model_override {
                    provider = provider.with_model(model);
                }
                Ok(Arc::new(provider))
            }
        }
    }

    /// Which provider types are currently usable.
    ///
    /// Computed fresh from the settings snapshot on every call: `simple` is
    /// always usable, `ollama` needs a base URL, `openai` needs an API key.
    pub fn available_providers(&self) -> BTreeMap<ProviderType, bool> {
        let settings = self.settings.current();
        let mut map = BTreeMap::new();
        map.insert(ProviderType::Simple, true);
        map.insert(ProviderType::Ollama, settings.ollama.is_some());
        map.insert(ProviderType::OpenAI, settings.openai.is_some());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OllamaSettings, OpenAiSettings, ProviderSettings};
    use std::time::Duration;

    fn ollama_settings() -> OllamaSettings {
        OllamaSettings {
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:32b".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    fn openai_settings() -> OpenAiSettings {
        OpenAiSettings {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    fn factory(openai: bool, ollama: bool) -> ProviderFactory {
        ProviderFactory::new(Arc::new(SettingsCache::with_settings(ProviderSettings {
            openai: openai.then(openai_settings),
            ollama: ollama.then(ollama_settings),
        })))
    }

    #[test]
    fn test_parse_is_case_insensitive_and_closed() {
        assert_eq!(ProviderType::parse("simple"), Some(ProviderType::Simple));
        assert_eq!(ProviderType::parse("OLLAMA"), Some(ProviderType::Ollama));
        assert_eq!(ProviderType::parse(" OpenAI "), Some(ProviderType::OpenAI));
        assert_eq!(ProviderType::parse("gemini"), None);
        assert_eq!(ProviderType::parse(""), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for provider in ProviderType::all() {
            assert_eq!(ProviderType::parse(provider.as_str()), Some(provider));
        }
    }

    #[test]
    fn test_availability_matrix() {
        // All four combinations of key presence.
        for (openai, ollama) in [(false, false), (false, true), (true, false), (true, true)] {
            let available = factory(openai, ollama).available_providers();
            assert_eq!(available[&ProviderType::Simple], true);
            assert_eq!(available[&ProviderType::Ollama], ollama);
            assert_eq!(available[&ProviderType::OpenAI], openai);
        }
    }

    #[test]
    fn test_create_simple_always_works() {
        let provider = factory(false, false)
            .create(ProviderType::Simple, None)
            .unwrap();
        assert_eq!(provider.name(), "simple");
    }

    #[test]
    fn test_create_unconfigured_provider_is_configuration_error() {
        let err = factory(false, false)
            .create(ProviderType::Ollama, None)
            .unwrap_err();
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.provider(), Some(ProviderType::Ollama));

        let err = factory(false, false)
            .create(ProviderType::OpenAI, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "configuration_error");
    }

    #[test]
    fn test_create_with_model_override() {
        let provider = factory(false, true)
            .create(ProviderType::Ollama, Some("llama2"))
            .unwrap();
        assert_eq!(provider.model(), "llama2");

        let provider = factory(true, false)
            .create(ProviderType::OpenAI, Some("gpt-4o"))
            .unwrap();
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn test_configured_model_used_without_override() {
        let provider = factory(false, true).create(ProviderType::Ollama, None).unwrap();
        assert_eq!(provider.model(), "qwen2.5:32b");
    }

    #[test]
    fn test_serde_tags_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProviderType::OpenAI).unwrap(),
            "\"openai\""
        );
        let parsed: ProviderType = serde_json::from_str("\"ollama\"").unwrap();
        assert_eq!(parsed, ProviderType::Ollama);
    }
}
