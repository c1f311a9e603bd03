/// AI module for Monica
///
/// This module owns everything that talks to a completion service. Callers
/// hand the gateway an ordered message list and get back a
/// [`CompletionOutcome`]; transport and provider errors never leave it.
///
/// # Architecture
///
/// - `client` - [`CompletionGateway`], the outcome type and error-kind mapping
/// - `providers` - Backend implementations (OpenAI-compatible HTTP, Rig-based
///   Anthropic/Ollama, scripted test backend)
///
/// # Usage
///
/// ```rust,no_run
/// use monica::ai::{CompletionGateway, CompletionLimits, CompletionOutcome};
/// use monica::config::CompanionConfig;
/// use monica::types::ChatMessage;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = CompanionConfig::from_env()?;
/// let gateway = CompletionGateway::from_config(&config);
/// let outcome = gateway
///     .send(&[ChatMessage::user("Hello!")], CompletionLimits::CHAT)
///     .await;
/// if let CompletionOutcome::Success(text) = outcome {
///     println!("{text}");
/// }
/// # Ok(())
/// # }
/// ```
mod client;
pub mod providers;

use crate::types::ChatMessage;
use async_trait::async_trait;

pub use client::{CompletionGateway, CompletionOutcome, EMPTY_REPLY_PLACEHOLDER, FailureKind};

/// Error raised by a backend. Carries the provider's own wording so the
/// gateway can infer a [`FailureKind`] from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ChatError(String);

impl ChatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::new(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::new(err.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;

/// Per-call generation knobs. Only these two are negotiable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionLimits {
    pub max_tokens: u64,
    pub temperature: f64,
}

impl CompletionLimits {
    /// Conversation turns: short replies, slightly creative.
    pub const CHAT: Self = Self {
        max_tokens: 300,
        temperature: 0.8,
    };

    /// Daily wellness tip.
    pub const TIP: Self = Self {
        max_tokens: 100,
        temperature: 0.9,
    };
}

/// A completion service the gateway can call. One invocation must map to at
/// most one request against the service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    async fn complete(
        &self,
        messages: &[ChatMessage],
        limits: CompletionLimits,
    ) -> ChatResult<String>;
}
