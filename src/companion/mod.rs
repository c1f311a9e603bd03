/// Conversation side of the companion.
///
/// - `persona` - Persona system prompt, mood clause and prompt assembly
/// - `fallback` - In-persona replies for failed completions
/// - `orchestrator` - One user/assistant exchange over a [`Conversation`](crate::types::Conversation)
/// - `session` - Live sessions with explicit start/end and late-reply discarding
pub mod fallback;
mod orchestrator;
pub mod persona;
mod session;

pub use orchestrator::{ConversationOrchestrator, TurnOutcome};
pub use session::{SessionId, SessionStore, TurnError};
