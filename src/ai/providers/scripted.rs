//! In-process backend that replays canned replies.
//!
//! Lets the gateway and orchestrator be exercised without a network:
//! queue replies or errors, optionally add latency, then inspect what the
//! backend was asked.

use crate::ai::{ChatError, ChatResult, CompletionBackend, CompletionLimits};
use crate::types::ChatMessage;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedCall {
    pub messages: Vec<ChatMessage>,
    pub limits: CompletionLimits,
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ChatResult<String>>>,
    calls: Mutex<Vec<ScriptedCall>>,
    delay: Duration,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure carrying the given provider wording.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(Err(ChatError::new(message)));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push(&self, reply: ChatResult<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        limits: CompletionLimits,
    ) -> ChatResult<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ScriptedCall {
                messages: messages.to_vec(),
                limits,
            });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::new("scripted backend has no reply queued")))
    }
}
