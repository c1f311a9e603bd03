use crate::ai::{ChatError, ChatResult, CompletionBackend, CompletionLimits};
use crate::types::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Client for any endpoint speaking the OpenAI chat-completions shape.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

// OpenAI API response types
#[derive(Deserialize)]
struct OAIMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OAIChoice {
    message: Option<OAIMessage>,
}

#[derive(Deserialize)]
struct OAIResponse {
    #[serde(default)]
    choices: Vec<OAIChoice>,
}

#[derive(Deserialize)]
struct OAIErrorBody {
    error: OAIErrorDetail,
}

#[derive(Deserialize)]
struct OAIErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
}

#[derive(Serialize)]
struct OAIRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u64,
    temperature: f64,
}

impl OpenAiBackend {
    pub fn new(base_url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            api_key,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// First choice's text, or an empty string when the body has none.
pub(crate) fn parse_completion_body(body: &str) -> ChatResult<String> {
    let parsed: OAIResponse = serde_json::from_str(body)?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|msg| msg.content)
        .unwrap_or_default())
}

/// Fold the status and the provider's error code/type into one message so
/// the gateway can recognise rate limits and credential faults.
pub(crate) fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<OAIErrorBody>(body) {
        Ok(parsed) => {
            let detail = parsed.error;
            let tag = detail.code.or(detail.kind).unwrap_or_default();
            let message = detail.message.unwrap_or_default();
            format!(
                "completion endpoint error status={} ({tag}): {message}",
                status.as_u16()
            )
        }
        Err(_) => format!(
            "completion endpoint error status={}: {body}",
            status.as_u16()
        ),
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        limits: CompletionLimits,
    ) -> ChatResult<String> {
        let Some(key) = self.api_key.as_deref().filter(|key| !key.trim().is_empty()) else {
            return Err(ChatError::new(
                "missing credential: OPENAI_API_KEY is not set (invalid_api_key)",
            ));
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(key)
            .json(&OAIRequest {
                model: &self.model,
                messages,
                max_tokens: limits.max_tokens,
                temperature: limits.temperature,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::new(describe_error(status, &body)));
        }

        parse_completion_body(&body)
    }
}
