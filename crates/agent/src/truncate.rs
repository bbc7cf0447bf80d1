//! Conversation-history truncation.
//!
//! Bounds the context sent upstream: the system message at index 0 always
//! survives, the rest of the budget goes to the most recent messages.

use interdesk_core::message::Message;

/// Truncate `history` to at most `max_messages` entries.
///
/// Identity when the history already fits. Otherwise returns exactly
/// `max_messages` messages: the system message plus the last
/// `max_messages - 1` of the remainder. Idempotent for a fixed bound.
pub fn truncate_history(history: &[Message], max_messages: usize) -> Vec<Message> {
    if history.len() <= max_messages {
        return history.to_vec();
    }
    if max_messages == 0 {
        return Vec::new();
    }

    let mut truncated = Vec::with_capacity(max_messages);
    truncated.push(history[0].clone());
    truncated.extend_from_slice(&history[history.len() - (max_messages - 1)..]);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(len: usize) -> Vec<Message> {
        let mut history = vec![Message::system("system prompt")];
        for i in 1..len {
            if i % 2 == 1 {
                history.push(Message::user(format!("user {i}")));
            } else {
                history.push(Message::assistant(format!("assistant {i}")));
            }
        }
        history
    }

    #[test]
    fn short_history_is_identity() {
        let history = history_of(5);
        assert_eq!(truncate_history(&history, 20), history);
        assert_eq!(truncate_history(&history, 5), history);
    }

    #[test]
    fn long_history_is_bounded_exactly() {
        let history = history_of(50);
        let truncated = truncate_history(&history, 20);
        assert_eq!(truncated.len(), 20);
    }

    #[test]
    fn system_message_always_survives() {
        let history = history_of(50);
        let truncated = truncate_history(&history, 20);
        assert_eq!(truncated[0], history[0]);
        assert_eq!(truncated[0].content, "system prompt");
    }

    #[test]
    fn tail_is_the_most_recent_messages() {
        let history = history_of(50);
        let truncated = truncate_history(&history, 20);
        assert_eq!(&truncated[1..], &history[50 - 19..]);
        assert_eq!(truncated.last(), history.last());
    }

    #[test]
    fn truncation_is_idempotent() {
        let history = history_of(50);
        let once = truncate_history(&history, 20);
        let twice = truncate_history(&once, 20);
        assert_eq!(once, twice);
    }
}
