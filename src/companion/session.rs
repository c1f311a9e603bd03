use super::ConversationOrchestrator;
use crate::types::{ChatMessage, Conversation};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Session identifiers are never reused, so a reply bound to an id can only
/// ever land in the conversation it was produced for.
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("session {0} does not exist or has ended")]
    SessionEnded(SessionId),

    #[error("session {0} already has a turn in flight")]
    TurnInFlight(SessionId),
}

// ============================================
// Session State
// ============================================

#[derive(Default)]
struct SessionEntry {
    conversation: Conversation,
    pending: bool,
}

struct SessionTable {
    counter: AtomicU64,
    entries: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl Default for SessionTable {
    fn default() -> Self {
        Self {
            counter: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl SessionTable {
    fn entries(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag even when the turn future is dropped mid-call.
struct PendingGuard<'a> {
    table: &'a SessionTable,
    id: SessionId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(entry) = self.table.entries().get_mut(&self.id) {
            entry.pending = false;
        }
    }
}

// ============================================
// Store
// ============================================

/// Owns the live conversations, one per session. Create it at start-up and
/// hand clones to whoever drives the sessions; nothing is kept after
/// [`SessionStore::end`].
#[derive(Clone)]
pub struct SessionStore {
    orchestrator: ConversationOrchestrator,
    table: Arc<SessionTable>,
}

impl SessionStore {
    pub fn new(orchestrator: ConversationOrchestrator) -> Self {
        Self {
            orchestrator,
            table: Arc::new(SessionTable::default()),
        }
    }

    pub fn orchestrator(&self) -> &ConversationOrchestrator {
        &self.orchestrator
    }

    pub fn start(&self) -> SessionId {
        let id = self.table.counter.fetch_add(1, Ordering::Relaxed);
        self.table.entries().insert(id, SessionEntry::default());
        info!(session = id, "session started");
        id
    }

    /// Tear the session down and hand back its final history.
    pub fn end(&self, id: SessionId) -> Option<Conversation> {
        let entry = self.table.entries().remove(&id)?;
        info!(
            session = id,
            messages = entry.conversation.len(),
            "session ended"
        );
        Some(entry.conversation)
    }

    pub fn is_active(&self, id: SessionId) -> bool {
        self.table.entries().contains_key(&id)
    }

    pub fn active_sessions(&self) -> usize {
        self.table.entries().len()
    }

    /// Snapshot of the session's history.
    pub fn conversation(&self, id: SessionId) -> Option<Conversation> {
        self.table
            .entries()
            .get(&id)
            .map(|entry| entry.conversation.clone())
    }

    /// Run one turn against a live session and return the assistant text.
    ///
    /// The user message is committed before the completion call. The lock is
    /// not held across the call; if the session ends meanwhile, the reply is
    /// dropped and [`TurnError::SessionEnded`] is returned.
    pub async fn turn(
        &self,
        id: SessionId,
        user_text: &str,
        mood: Option<&str>,
    ) -> Result<String, TurnError> {
        let history = {
            let mut entries = self.table.entries();
            let entry = entries.get_mut(&id).ok_or(TurnError::SessionEnded(id))?;
            if entry.pending {
                return Err(TurnError::TurnInFlight(id));
            }
            entry.pending = true;
            entry.conversation.push(ChatMessage::user(user_text));
            entry.conversation.messages().to_vec()
        };
        let _pending = PendingGuard {
            table: &self.table,
            id,
        };

        let reply = self.orchestrator.reply_for(&history, mood).await;

        let committed = match self.table.entries().get_mut(&id) {
            Some(entry) => {
                entry.conversation.push(ChatMessage::assistant(reply.clone()));
                true
            }
            None => false,
        };

        if committed {
            Ok(reply)
        } else {
            debug!(session = id, "discarding reply for ended session");
            Err(TurnError::SessionEnded(id))
        }
    }
}
