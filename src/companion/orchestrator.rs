use super::{fallback, persona};
use crate::ai::{CompletionGateway, CompletionLimits, CompletionOutcome, EMPTY_REPLY_PLACEHOLDER};
use crate::types::{ChatMessage, Conversation};

/// Result of one conversational turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub conversation: Conversation,
    /// Assistant text for display; also the last entry of `conversation`.
    pub reply: String,
}

/// Coordinates prompt building, the completion call and failure recovery.
#[derive(Clone)]
pub struct ConversationOrchestrator {
    gateway: CompletionGateway,
}

impl ConversationOrchestrator {
    pub fn new(gateway: CompletionGateway) -> Self {
        Self { gateway }
    }

    /// Run one exchange. The user message is committed before the network
    /// call, and exactly one assistant message follows it whatever the
    /// gateway returns.
    pub async fn turn(
        &self,
        mut conversation: Conversation,
        user_text: &str,
        mood: Option<&str>,
    ) -> TurnOutcome {
        conversation.push(ChatMessage::user(user_text));

        let reply = self.reply_for(conversation.messages(), mood).await;
        conversation.push(ChatMessage::assistant(reply.clone()));

        TurnOutcome {
            conversation,
            reply,
        }
    }

    /// Prompt, send and recover for a history that already ends with the
    /// user's message. Does not touch the history itself.
    pub async fn reply_for(&self, history: &[ChatMessage], mood: Option<&str>) -> String {
        let prompt = persona::build_prompt(history, mood);

        match self.gateway.send(&prompt, CompletionLimits::CHAT).await {
            CompletionOutcome::Success(text) => text,
            CompletionOutcome::Failure(kind) => fallback::respond(kind).to_string(),
        }
    }

    /// One-off wellness tip, outside any conversation.
    pub async fn wellness_tip(&self) -> String {
        match self
            .gateway
            .send(&persona::build_tip_prompt(), CompletionLimits::TIP)
            .await
        {
            // The gateway substitutes a chat placeholder for empty text; a tip wants its own.
            CompletionOutcome::Success(text) if text != EMPTY_REPLY_PLACEHOLDER => text,
            _ => fallback::FALLBACK_TIP.to_string(),
        }
    }
}
