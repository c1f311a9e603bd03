use super::providers::ProviderClient;
use super::{ChatError, CompletionBackend, CompletionLimits};
use crate::config::CompanionConfig;
use crate::types::ChatMessage;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Returned as a successful reply when the service answered without text.
pub const EMPTY_REPLY_PLACEHOLDER: &str =
    "I'm here for you, but I'm having trouble responding right now. How are you feeling?";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================
// Outcome Types
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    RateLimited,
    Unauthorized,
    Unknown,
}

const RATE_LIMIT_WORDING: &[&str] = &[
    "rate_limit",
    "rate limit",
    "status=429",
    "too many requests",
    "overloaded_error",
];

const CREDENTIAL_WORDING: &[&str] = &[
    "invalid_api_key",
    "invalid x-api-key",
    "authentication_error",
    "permission_error",
    "status=401",
    "status=403",
    "unauthorized",
    "missing credential",
];

impl FailureKind {
    /// Best-effort mapping from provider error wording. HTTP statuses only
    /// count in their `status=NNN` form. Anything not recognised lands in
    /// `Unknown`.
    pub fn classify(message: &str) -> Self {
        let text = message.to_ascii_lowercase();
        let mentions = |wording: &[&str]| wording.iter().any(|needle| text.contains(needle));

        if mentions(RATE_LIMIT_WORDING) {
            FailureKind::RateLimited
        } else if mentions(CREDENTIAL_WORDING) {
            FailureKind::Unauthorized
        } else {
            FailureKind::Unknown
        }
    }
}

impl From<&ChatError> for FailureKind {
    fn from(err: &ChatError) -> Self {
        FailureKind::classify(err.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Success(String),
    Failure(FailureKind),
}

// ============================================
// Gateway
// ============================================

/// Sends prompt-augmented message lists to a completion backend and folds
/// every result into a [`CompletionOutcome`].
#[derive(Clone)]
pub struct CompletionGateway {
    backend: Arc<dyn CompletionBackend>,
    timeout: Duration,
}

impl CompletionGateway {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the configured provider and apply the configured wait bound.
    pub fn from_config(config: &CompanionConfig) -> Self {
        let client = ProviderClient::from_config(config);
        Self::new(Arc::new(client)).with_timeout(config.timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One backend call, no retries.
    pub async fn send(&self, messages: &[ChatMessage], limits: CompletionLimits) -> CompletionOutcome {
        debug!(
            provider = self.backend.name(),
            messages = messages.len(),
            max_tokens = limits.max_tokens,
            temperature = limits.temperature,
            "sending completion request"
        );

        let result = tokio::time::timeout(self.timeout, self.backend.complete(messages, limits)).await;

        match result {
            Ok(Ok(text)) if text.trim().is_empty() => {
                debug!(provider = self.backend.name(), "completion carried no text");
                CompletionOutcome::Success(EMPTY_REPLY_PLACEHOLDER.to_string())
            }
            Ok(Ok(text)) => CompletionOutcome::Success(text),
            Ok(Err(err)) => {
                let kind = FailureKind::from(&err);
                warn!(provider = self.backend.name(), ?kind, error = %err, "completion failed");
                CompletionOutcome::Failure(kind)
            }
            Err(_) => {
                warn!(
                    provider = self.backend.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "completion timed out"
                );
                CompletionOutcome::Failure(FailureKind::Unknown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::providers::ScriptedBackend;

    #[test]
    fn classifies_rate_limit_wording() {
        assert_eq!(
            FailureKind::classify("Error code: rate_limit_exceeded"),
            FailureKind::RateLimited
        );
        assert_eq!(
            FailureKind::classify("completion endpoint error status=429 (requests): slow down"),
            FailureKind::RateLimited
        );
    }

    #[test]
    fn classifies_anthropic_error_bodies() {
        let prefix = "CompletionError: ProviderError: ";
        assert_eq!(
            FailureKind::classify(&format!(
                r#"{prefix}{{"type":"error","error":{{"type":"authentication_error","message":"invalid x-api-key"}}}}"#
            )),
            FailureKind::Unauthorized
        );
        assert_eq!(
            FailureKind::classify(&format!(
                r#"{prefix}{{"type":"error","error":{{"type":"permission_error","message":"not allowed"}}}}"#
            )),
            FailureKind::Unauthorized
        );
        assert_eq!(
            FailureKind::classify(&format!(
                r#"{prefix}{{"type":"error","error":{{"type":"rate_limit_error","message":"slow down"}}}}"#
            )),
            FailureKind::RateLimited
        );
        assert_eq!(
            FailureKind::classify(&format!(
                r#"{prefix}{{"type":"error","error":{{"type":"overloaded_error","message":"Overloaded"}}}}"#
            )),
            FailureKind::RateLimited
        );
    }

    #[test]
    fn bare_digits_in_urls_are_not_statuses() {
        assert_eq!(
            FailureKind::classify(
                "error sending request for url (http://localhost:4011/v1/chat/completions): connection refused"
            ),
            FailureKind::Unknown
        );
        assert_eq!(
            FailureKind::classify("request id req_4291 failed: connection reset"),
            FailureKind::Unknown
        );
        assert_eq!(
            FailureKind::classify("completion endpoint error status=401 (invalid_request): bad key"),
            FailureKind::Unauthorized
        );
    }

    #[test]
    fn classifies_credential_wording() {
        assert_eq!(
            FailureKind::classify("Incorrect API key provided (invalid_api_key)"),
            FailureKind::Unauthorized
        );
        assert_eq!(
            FailureKind::classify("missing credential for provider openai"),
            FailureKind::Unauthorized
        );
    }

    #[test]
    fn unrecognised_errors_are_unknown() {
        assert_eq!(
            FailureKind::classify("connection reset by peer"),
            FailureKind::Unknown
        );
        assert_eq!(FailureKind::classify(""), FailureKind::Unknown);
    }

    #[tokio::test]
    async fn success_passes_text_through() {
        let backend = Arc::new(ScriptedBackend::new().with_reply("Hello there"));
        let gateway = CompletionGateway::new(backend.clone());

        let outcome = gateway
            .send(&[ChatMessage::user("hi")], CompletionLimits::CHAT)
            .await;

        assert_eq!(outcome, CompletionOutcome::Success("Hello there".into()));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn blank_reply_becomes_placeholder() {
        let backend = Arc::new(ScriptedBackend::new().with_reply("   "));
        let gateway = CompletionGateway::new(backend);

        let outcome = gateway
            .send(&[ChatMessage::user("hi")], CompletionLimits::CHAT)
            .await;

        assert_eq!(
            outcome,
            CompletionOutcome::Success(EMPTY_REPLY_PLACEHOLDER.to_string())
        );
    }

    #[tokio::test]
    async fn errors_never_retry() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_error("rate_limit_exceeded")
                .with_reply("should not be used"),
        );
        let gateway = CompletionGateway::new(backend.clone());

        let outcome = gateway
            .send(&[ChatMessage::user("hi")], CompletionLimits::CHAT)
            .await;

        assert_eq!(outcome, CompletionOutcome::Failure(FailureKind::RateLimited));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn expired_wait_is_unknown_failure() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_reply("too late")
                .with_delay(Duration::from_millis(200)),
        );
        let gateway = CompletionGateway::new(backend).with_timeout(Duration::from_millis(20));

        let outcome = gateway
            .send(&[ChatMessage::user("hi")], CompletionLimits::CHAT)
            .await;

        assert_eq!(outcome, CompletionOutcome::Failure(FailureKind::Unknown));
    }

    #[tokio::test]
    async fn limits_reach_the_backend() {
        let backend = Arc::new(ScriptedBackend::new().with_reply("ok"));
        let gateway = CompletionGateway::new(backend.clone());

        gateway
            .send(&[ChatMessage::user("tip please")], CompletionLimits::TIP)
            .await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].limits, CompletionLimits::TIP);
        assert_eq!(calls[0].messages, vec![ChatMessage::user("tip please")]);
    }
}
