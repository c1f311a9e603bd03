use crate::ai::FailureKind;

pub const RATE_LIMITED_REPLY: &str = "I'm getting a lot of conversations right now! Give me just a moment, and I'll be right back with you. You're important to me. 💜";

pub const UNAUTHORIZED_REPLY: &str = "I'm having some technical difficulties connecting right now. But I want you to know - whatever you're going through, you're not alone. 🤗";

pub const UNKNOWN_REPLY: &str = "I'm having a moment of technical difficulty, but I'm still here with you in spirit. Sometimes we all need a pause - how are you taking care of yourself today? 💙";

/// Used whenever the daily tip cannot be generated.
pub const FALLBACK_TIP: &str = "Take three deep breaths right now. You're doing better than you think, and tomorrow is full of possibilities. 🌸";

/// In-persona reply shown in place of a failed completion. Never mentions
/// credentials or provider details.
pub fn respond(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::RateLimited => RATE_LIMITED_REPLY,
        FailureKind::Unauthorized => UNAUTHORIZED_REPLY,
        FailureKind::Unknown => UNKNOWN_REPLY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_kind_has_a_distinct_reply() {
        let kinds = [
            FailureKind::RateLimited,
            FailureKind::Unauthorized,
            FailureKind::Unknown,
        ];
        let replies: HashSet<_> = kinds.iter().map(|kind| respond(*kind)).collect();

        assert_eq!(replies.len(), kinds.len());
        assert!(replies.iter().all(|reply| !reply.trim().is_empty()));
    }

    #[test]
    fn unauthorized_reply_does_not_leak_credentials() {
        let reply = respond(FailureKind::Unauthorized).to_lowercase();
        assert!(!reply.contains("key"));
        assert!(!reply.contains("token"));
    }
}
