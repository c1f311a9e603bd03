pub mod openai;
pub mod scripted;

use crate::ai::{ChatError, ChatResult, CompletionBackend, CompletionLimits};
use crate::config::{CompanionConfig, ProviderKind};
use crate::types::{ChatMessage, Role};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Chat;
use rig::providers;

pub use openai::OpenAiBackend;
pub use scripted::{ScriptedBackend, ScriptedCall};

/// Enum to hold the configured provider client
pub enum ProviderClient {
    OpenAI(OpenAiBackend),
    Anthropic {
        client: Option<providers::anthropic::Client>,
        model: String,
    },
    Ollama {
        client: providers::ollama::Client,
        model: String,
    },
}

impl ProviderClient {
    /// Build the provider named by the configuration. A missing credential
    /// is not an error here; it surfaces on the first request instead.
    pub fn from_config(config: &CompanionConfig) -> Self {
        match config.provider {
            ProviderKind::OpenAI => Self::OpenAI(OpenAiBackend::new(
                config.base_url.clone(),
                config.model.clone(),
                config.api_key.clone(),
            )),
            ProviderKind::Anthropic => Self::Anthropic {
                client: config
                    .api_key
                    .as_deref()
                    .filter(|key| !key.trim().is_empty())
                    .map(|key| providers::anthropic::Client::new(key)),
                model: config.model.clone(),
            },
            // Ollama endpoint is configured via OLLAMA_HOST environment variable
            // The Rig client reads this automatically (defaults to http://localhost:11434)
            ProviderKind::Ollama => Self::Ollama {
                client: providers::ollama::Client::new(),
                model: config.model.clone(),
            },
        }
    }
}

/// Rig agents take the persona as a preamble and the newest user line as
/// the prompt, with everything in between as history.
pub(crate) struct AgentRequest {
    pub preamble: String,
    pub history: Vec<rig::message::Message>,
    pub prompt: String,
}

pub(crate) fn split_for_agent(messages: &[ChatMessage]) -> ChatResult<AgentRequest> {
    let (prompt, earlier) = match messages.split_last() {
        Some((last, earlier)) if last.role() == Role::User => (last.content().to_string(), earlier),
        _ => return Err(ChatError::new("request must end with a user message")),
    };

    let mut preamble = String::new();
    let mut history = Vec::with_capacity(earlier.len());
    for msg in earlier {
        match msg.role() {
            Role::System => {
                if !preamble.is_empty() {
                    preamble.push_str("\n\n");
                }
                preamble.push_str(msg.content());
            }
            Role::User => history.push(rig::message::Message::user(msg.content())),
            Role::Assistant => history.push(rig::message::Message::assistant(msg.content())),
        }
    }

    Ok(AgentRequest {
        preamble,
        history,
        prompt,
    })
}

#[async_trait]
impl CompletionBackend for ProviderClient {
    fn name(&self) -> &str {
        match self {
            ProviderClient::OpenAI(backend) => backend.name(),
            ProviderClient::Anthropic { .. } => "anthropic",
            ProviderClient::Ollama { .. } => "ollama",
        }
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        limits: CompletionLimits,
    ) -> ChatResult<String> {
        match self {
            ProviderClient::OpenAI(backend) => backend.complete(messages, limits).await,
            ProviderClient::Anthropic { client, model } => {
                let Some(client) = client else {
                    return Err(ChatError::new(
                        "missing credential: ANTHROPIC_API_KEY is not set",
                    ));
                };
                let request = split_for_agent(messages)?;

                let agent = client
                    .agent(model)
                    .preamble(&request.preamble)
                    .max_tokens(limits.max_tokens)
                    .temperature(limits.temperature)
                    .build();

                agent
                    .chat(request.prompt.as_str(), request.history)
                    .await
                    .map_err(|err| ChatError::new(err.to_string()))
            }
            ProviderClient::Ollama { client, model } => {
                let request = split_for_agent(messages)?;

                let agent = client
                    .agent(model)
                    .preamble(&request.preamble)
                    .max_tokens(limits.max_tokens)
                    .temperature(limits.temperature)
                    .build();

                agent
                    .chat(request.prompt.as_str(), request.history)
                    .await
                    .map_err(|err| ChatError::new(err.to_string()))
            }
        }
    }
}
