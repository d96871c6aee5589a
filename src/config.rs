//! Provider configuration, loaded once and explicitly cached.
//!
//! Configuration is an explicitly constructed, explicitly passed object;
//! there is no process-wide singleton. [`SettingsCache`] loads the settings
//! from the environment on first use, serves cheap `Arc` snapshots to
//! concurrent readers, and exposes [`SettingsCache::invalidate`] as the one
//! documented way to pick up environment changes. Callers that invalidate
//! while calls are in flight accept that those calls observe either the old
//! or the new generation.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY`: enables the openai provider
//! - `OPENAI_MODEL_NAME`: chat model (default: `gpt-4o-mini`)
//! - `OPENAI_TIMEOUT`: request timeout in seconds (default: 300)
//! - `OLLAMA_BASE_URL`: enables the ollama provider (e.g. `http://localhost:11434`)
//! - `OLLAMA_MODEL_NAME`: chat model (default: `qwen2.5:32b`)
//! - `OLLAMA_TIMEOUT`: request timeout in seconds (default: 300)
//!
//! A provider whose required variable is absent simply loads as `None`;
//! absence is reported through availability, never as a load-time error.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::debug;

/// Default OpenAI chat model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Ollama chat model.
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:32b";

/// Default request timeout in seconds. Local models can be slow to first
/// token, so this is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Connection parameters for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Chat model name.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Connection parameters for the Ollama provider.
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    /// Server base URL, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Chat model name.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Immutable per-provider configuration snapshot.
///
/// `None` for a provider means it is not configured; the factory reports it
/// unavailable and refuses to construct it.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub openai: Option<OpenAiSettings>,
    pub ollama: Option<OllamaSettings>,
}

impl ProviderSettings {
    /// Load settings from the environment.
    ///
    /// Blank values are treated as absent, so `OPENAI_API_KEY=""` disables
    /// the provider rather than producing a key that fails downstream.
    pub fn from_env() -> Self {
        let openai = non_blank_env("OPENAI_API_KEY").map(|api_key| OpenAiSettings {
            api_key,
            model: non_blank_env("OPENAI_MODEL_NAME")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            timeout: timeout_env("OPENAI_TIMEOUT"),
        });

        let ollama = non_blank_env("OLLAMA_BASE_URL").map(|base_url| OllamaSettings {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: non_blank_env("OLLAMA_MODEL_NAME")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            timeout: timeout_env("OLLAMA_TIMEOUT"),
        });

        debug!(
            openai_configured = openai.is_some(),
            ollama_configured = ollama.is_some(),
            "Loaded provider settings from environment"
        );

        Self { openai, ollama }
    }
}

fn non_blank_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn timeout_env(var: &str) -> Duration {
    let secs = std::env::var(var)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

// ============================================================================
// Settings Cache
// ============================================================================

/// Load-once cache over [`ProviderSettings`].
///
/// Safe for concurrent reads; [`SettingsCache::invalidate`] is the explicit
/// cache-clear operation and the only way a new environment generation
/// becomes visible.
#[derive(Debug, Default)]
pub struct SettingsCache {
    inner: RwLock<Option<Arc<ProviderSettings>>>,
}

impl SettingsCache {
    /// Create an empty cache; the first [`SettingsCache::current`] call loads
    /// from the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache preloaded with explicit settings. Nothing is read from
    /// the environment until the cache is invalidated.
    pub fn with_settings(settings: ProviderSettings) -> Self {
        Self {
            inner: RwLock::new(Some(Arc::new(settings))),
        }
    }

    /// Current settings snapshot, loading from the environment on first use.
    pub fn current(&self) -> Arc<ProviderSettings> {
        if let Some(settings) = self.inner.read().expect("settings lock poisoned").as_ref() {
            return Arc::clone(settings);
        }

        let mut slot = self.inner.write().expect("settings lock poisoned");
        // A racing loader may have filled the slot between the locks.
        if let Some(settings) = slot.as_ref() {
            return Arc::clone(settings);
        }
        let loaded = Arc::new(ProviderSettings::from_env());
        *slot = Some(Arc::clone(&loaded));
        loaded
    }

    /// Drop the cached snapshot so the next read reloads from the environment.
    pub fn invalidate(&self) {
        debug!("Provider settings cache invalidated");
        *self.inner.write().expect("settings lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "OPENAI_API_KEY",
            "OPENAI_MODEL_NAME",
            "OPENAI_TIMEOUT",
            "OLLAMA_BASE_URL",
            "OLLAMA_MODEL_NAME",
            "OLLAMA_TIMEOUT",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_absent_keys_load_as_unconfigured() {
        clear_env();

        let settings = ProviderSettings::from_env();
        assert!(settings.openai.is_none());
        assert!(settings.ollama.is_none());
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("OLLAMA_BASE_URL", "http://localhost:11434/");

        let settings = ProviderSettings::from_env();

        let openai = settings.openai.expect("openai should be configured");
        assert_eq!(openai.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(openai.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let ollama = settings.ollama.expect("ollama should be configured");
        // Trailing slash is stripped so URL joining stays predictable.
        assert_eq!(ollama.base_url, "http://localhost:11434");
        assert_eq!(ollama.model, DEFAULT_OLLAMA_MODEL);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_applied() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("OPENAI_MODEL_NAME", "gpt-4o");
        std::env::set_var("OPENAI_TIMEOUT", "30");

        let settings = ProviderSettings::from_env();
        let openai = settings.openai.expect("openai should be configured");
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.timeout, Duration::from_secs(30));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_key_treated_as_absent() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "   ");

        let settings = ProviderSettings::from_env();
        assert!(settings.openai.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparseable_timeout_falls_back_to_default() {
        clear_env();
        std::env::set_var("OLLAMA_BASE_URL", "http://localhost:11434");
        std::env::set_var("OLLAMA_TIMEOUT", "five minutes");

        let settings = ProviderSettings::from_env();
        let ollama = settings.ollama.expect("ollama should be configured");
        assert_eq!(ollama.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_cache_serves_same_snapshot_until_invalidated() {
        clear_env();
        let cache = SettingsCache::new();

        let first = cache.current();
        assert!(first.ollama.is_none());

        // A change without invalidation is not observed.
        std::env::set_var("OLLAMA_BASE_URL", "http://localhost:11434");
        let second = cache.current();
        assert!(second.ollama.is_none());
        assert!(Arc::ptr_eq(&first, &second));

        // Invalidation makes the next read reload.
        cache.invalidate();
        let third = cache.current();
        assert!(third.ollama.is_some());

        clear_env();
    }

    #[test]
    fn test_preloaded_cache_skips_environment() {
        let cache = SettingsCache::with_settings(ProviderSettings {
            openai: None,
            ollama: Some(OllamaSettings {
                base_url: "http://ollama.internal:11434".to_string(),
                model: "llama2".to_string(),
                timeout: Duration::from_secs(10),
            }),
        });

        let settings = cache.current();
        assert!(settings.openai.is_none());
        assert_eq!(
            settings.ollama.as_ref().map(|o| o.base_url.as_str()),
            Some("http://ollama.internal:11434")
        );
    }
}
