//! Conversation history for the inference chain.

use advisor_types::chat::ChatMessage;
use advisor_types::llm::Message;

/// Build chronological, role-tagged history from a newest-first message list.
///
/// The store returns the most recent messages newest first; the chain needs
/// them oldest first. Messages with an unrecognized role are dropped.
pub fn build_history(newest_first: Vec<ChatMessage>) -> Vec<Message> {
    newest_first
        .into_iter()
        .rev()
        .filter_map(|m| m.role.to_turn(&m.content))
        .collect()
}
