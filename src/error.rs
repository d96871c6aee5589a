//! Recommendation error types with HTTP status classification.
//!
//! # Error Handling Philosophy
//!
//! Errors should be:
//! 1. **Actionable**: Tell the caller what to do, not just what went wrong
//! 2. **Specific**: Include relevant context (provider, word counts, etc.)
//! 3. **Machine-readable**: Every failure carries a stable `error_code` so
//!    callers branch on kind, never on prose
//!
//! # Common Errors and Solutions
//!
//! | Error | Cause | Solution |
//! |-------|-------|----------|
//! | `InvalidProvider` | Unknown provider tag | Use `simple`, `ollama`, or `openai` |
//! | `Configuration` | Provider known but not configured | Set `OPENAI_API_KEY` / `OLLAMA_BASE_URL` |
//! | `Authentication` | Backend rejected credentials | Check the API key is valid and not expired |
//! | `Unavailable` | Backend unreachable or timed out | Check the server is running / raise the timeout |
//! | `MalformedResponse` | Backend reply was not the expected JSON object | Use a model that honors JSON output mode |
//!
//! Provider-sourced failures are never surfaced raw: providers catch their
//! transport errors at the boundary and re-raise one of these variants tagged
//! with the originating provider type. Nothing in this crate retries: a
//! failed call returns immediately and retry policy belongs to the caller.

use thiserror::Error;

use crate::factory::ProviderType;

/// Result type for recommendation operations.
pub type Result<T> = std::result::Result<T, RecommendError>;

// ============================================================================
// Error Kind
// ============================================================================

/// Closed set of failure kinds, independent of the message payload.
///
/// `code()` is the stable machine-readable identifier surfaced to callers;
/// `http_status()` is the status the excluded HTTP layer serves for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown provider tag in the request.
    InvalidProvider,
    /// Fewer than four remaining words.
    InsufficientWords,
    /// Provider recognized but missing its key or URL.
    Configuration,
    /// Backend rejected the configured credentials.
    Authentication,
    /// Backend unreachable or network failure.
    Unavailable,
    /// Backend did not answer within the configured timeout.
    Timeout,
    /// Backend reply was not the required structured object.
    MalformedResponse,
    /// Malformed caller input (bad guess arity, blank words).
    Validation,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidProvider => "invalid_provider",
            Self::InsufficientWords => "insufficient_words",
            Self::Configuration => "configuration_error",
            Self::Authentication => "authentication_error",
            Self::Unavailable => "provider_unavailable",
            Self::Timeout => "provider_timeout",
            Self::MalformedResponse => "malformed_response",
            Self::Validation => "validation_error",
            Self::Internal => "internal_error",
        }
    }

    /// Human-readable title for error payloads.
    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidProvider => "Invalid Provider",
            Self::InsufficientWords => "Insufficient Words",
            Self::Configuration => "Configuration Error",
            Self::Authentication => "Authentication Error",
            Self::Unavailable => "Provider Unavailable",
            Self::Timeout => "Provider Timeout",
            Self::MalformedResponse => "Malformed Response",
            Self::Validation => "Validation Error",
            Self::Internal => "Internal Error",
        }
    }

    /// HTTP status the boundary serves for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidProvider | Self::InsufficientWords => 400,
            Self::Validation => 422,
            Self::Configuration | Self::Internal => 500,
            Self::Authentication | Self::Unavailable | Self::MalformedResponse => 503,
            Self::Timeout => 504,
        }
    }
}

// ============================================================================
// Recommendation Error Types
// ============================================================================

/// Errors that can occur while producing a recommendation.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Unknown provider tag requested by the caller.
    #[error("unknown provider type: '{requested}' (expected simple, ollama, or openai)")]
    InvalidProvider {
        /// The tag the caller sent.
        requested: String,
    },

    /// The candidate pool is too small for a meaningful recommendation.
    #[error("at least 4 remaining words are required, got {available}")]
    InsufficientWords {
        /// How many words the request actually carried.
        available: usize,
    },

    /// Provider recognized but its required configuration is missing.
    #[error("{provider} provider is not configured: {message}")]
    Configuration {
        /// Provider the caller asked for.
        provider: ProviderType,
        message: String,
    },

    /// Backend rejected the configured credentials.
    #[error("{provider} rejected the configured credentials: {message}")]
    Authentication {
        /// Provider that produced the rejection.
        provider: ProviderType,
        message: String,
    },

    /// Backend unreachable, network failure, or timeout.
    #[error("{provider} backend is unavailable: {message}")]
    Unavailable {
        /// Provider that was being called.
        provider: ProviderType,
        message: String,
        /// True when the configured timeout elapsed, false for other
        /// transport failures. Timeouts classify to 504, the rest to 503.
        timed_out: bool,
    },

    /// Backend reply was not a JSON object with the required keys.
    ///
    /// There is deliberately no fallback to free-text parsing: a model that
    /// cannot produce the structured shape is a failed call.
    #[error("{provider} returned a malformed reply: {message}")]
    MalformedResponse {
        /// Provider whose reply failed validation.
        provider: ProviderType,
        message: String,
    },

    /// Malformed caller input.
    #[error("invalid request: {message}")]
    Validation { message: String },

    /// Unclassified internal failure.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl RecommendError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidProvider { .. } => ErrorKind::InvalidProvider,
            Self::InsufficientWords { .. } => ErrorKind::InsufficientWords,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Unavailable { timed_out, .. } => {
                if *timed_out {
                    ErrorKind::Timeout
                } else {
                    ErrorKind::Unavailable
                }
            }
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code (`invalid_provider`, `provider_timeout`, ...).
    pub fn error_code(&self) -> &'static str {
        self.kind().code()
    }

    /// HTTP status for this error. Pure mapping, no side effects.
    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    /// The provider this failure originated from, for provider-sourced kinds.
    pub fn provider(&self) -> Option<ProviderType> {
        match self {
            Self::Configuration { provider, .. }
            | Self::Authentication { provider, .. }
            | Self::Unavailable { provider, .. }
            | Self::MalformedResponse { provider, .. } => Some(*provider),
            _ => None,
        }
    }

    /// Classify a transport error from the given provider.
    ///
    /// Timeouts map to the 504 variant, connection failures and everything
    /// else reqwest reports to the 503 variant.
    pub fn from_transport(provider: ProviderType, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Unavailable {
                provider,
                message: "request timed out".to_string(),
                timed_out: true,
            }
        } else if err.is_connect() {
            Self::Unavailable {
                provider,
                message: format!("connection failed: {}", err),
                timed_out: false,
            }
        } else {
            Self::Unavailable {
                provider,
                message: err.to_string(),
                timed_out: false,
            }
        }
    }

    /// Classify a non-success HTTP status from the given provider.
    ///
    /// Credential rejections become [`RecommendError::Authentication`];
    /// every other status is an unavailable backend.
    pub fn from_status(provider: ProviderType, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                provider,
                message: format!("HTTP {}: {}", status, truncated(body)),
            },
            _ => Self::Unavailable {
                provider,
                message: format!("HTTP {}: {}", status, truncated(body)),
                timed_out: false,
            },
        }
    }
}

/// Cap error bodies so huge backend payloads never flood logs or responses.
fn truncated(body: &str) -> &str {
    let cut = body
        .char_indices()
        .nth(500)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    body[..cut].trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_provider_display() {
        let error = RecommendError::InvalidProvider {
            requested: "gemini".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "unknown provider type: 'gemini' (expected simple, ollama, or openai)"
        );
    }

    #[test]
    fn test_insufficient_words_display() {
        let error = RecommendError::InsufficientWords { available: 3 };
        assert_eq!(
            error.to_string(),
            "at least 4 remaining words are required, got 3"
        );
    }

    #[test]
    fn test_unavailable_display() {
        let error = RecommendError::Unavailable {
            provider: ProviderType::Ollama,
            message: "connection refused".to_string(),
            timed_out: false,
        };
        assert_eq!(
            error.to_string(),
            "ollama backend is unavailable: connection refused"
        );
    }

    #[test]
    fn test_status_mapping_table() {
        let cases: Vec<(RecommendError, u16)> = vec![
            (
                RecommendError::InvalidProvider {
                    requested: "x".to_string(),
                },
                400,
            ),
            (RecommendError::InsufficientWords { available: 2 }, 400),
            (
                RecommendError::Configuration {
                    provider: ProviderType::OpenAI,
                    message: "missing key".to_string(),
                },
                500,
            ),
            (
                RecommendError::Authentication {
                    provider: ProviderType::OpenAI,
                    message: "bad key".to_string(),
                },
                503,
            ),
            (
                RecommendError::Unavailable {
                    provider: ProviderType::Ollama,
                    message: "down".to_string(),
                    timed_out: false,
                },
                503,
            ),
            (
                RecommendError::Unavailable {
                    provider: ProviderType::Ollama,
                    message: "slow".to_string(),
                    timed_out: true,
                },
                504,
            ),
            (
                RecommendError::MalformedResponse {
                    provider: ProviderType::Ollama,
                    message: "not json".to_string(),
                },
                503,
            ),
            (
                RecommendError::Validation {
                    message: "blank word".to_string(),
                },
                422,
            ),
            (
                RecommendError::Internal {
                    message: "boom".to_string(),
                },
                500,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.http_status(), status, "wrong status for {:?}", error);
        }
    }

    #[test]
    fn test_timeout_distinct_from_network_failure() {
        let timeout = RecommendError::Unavailable {
            provider: ProviderType::Ollama,
            message: "request timed out".to_string(),
            timed_out: true,
        };
        let network = RecommendError::Unavailable {
            provider: ProviderType::Ollama,
            message: "connection refused".to_string(),
            timed_out: false,
        };

        assert_eq!(timeout.kind(), ErrorKind::Timeout);
        assert_eq!(network.kind(), ErrorKind::Unavailable);
        assert_eq!(timeout.error_code(), "provider_timeout");
        assert_eq!(network.error_code(), "provider_unavailable");
        assert_ne!(timeout.http_status(), network.http_status());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorKind::InvalidProvider.code(), "invalid_provider");
        assert_eq!(ErrorKind::InsufficientWords.code(), "insufficient_words");
        assert_eq!(ErrorKind::Configuration.code(), "configuration_error");
        assert_eq!(ErrorKind::Authentication.code(), "authentication_error");
        assert_eq!(ErrorKind::Unavailable.code(), "provider_unavailable");
        assert_eq!(ErrorKind::Timeout.code(), "provider_timeout");
        assert_eq!(ErrorKind::MalformedResponse.code(), "malformed_response");
        assert_eq!(ErrorKind::Validation.code(), "validation_error");
        assert_eq!(ErrorKind::Internal.code(), "internal_error");
    }

    #[test]
    fn test_provider_tag_on_provider_errors() {
        let error = RecommendError::MalformedResponse {
            provider: ProviderType::OpenAI,
            message: "missing key 'connection'".to_string(),
        };
        assert_eq!(error.provider(), Some(ProviderType::OpenAI));

        let error = RecommendError::InsufficientWords { available: 3 };
        assert_eq!(error.provider(), None);
    }

    #[test]
    fn test_from_status_auth() {
        let error = RecommendError::from_status(ProviderType::OpenAI, 401, "invalid api key");
        assert_eq!(error.kind(), ErrorKind::Authentication);
        assert_eq!(error.provider(), Some(ProviderType::OpenAI));
        assert!(error.to_string().contains("401"));
    }

    #[test]
    fn test_from_status_server_error() {
        let error = RecommendError::from_status(ProviderType::Ollama, 500, "model crashed");
        assert_eq!(error.kind(), ErrorKind::Unavailable);
        assert_eq!(error.http_status(), 503);
    }

    #[test]
    fn test_from_status_truncates_body() {
        let huge = "x".repeat(10_000);
        let error = RecommendError::from_status(ProviderType::Ollama, 502, &huge);
        assert!(error.to_string().len() < 700);
    }

    #[test]
    fn test_kind_titles() {
        assert_eq!(ErrorKind::Unavailable.title(), "Provider Unavailable");
        assert_eq!(ErrorKind::Timeout.title(), "Provider Timeout");
    }
}
