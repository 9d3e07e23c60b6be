//! Chat service: the Session/Message Store.
//!
//! ChatService wraps a `ChatRepository` and owns the rules that sit above raw
//! storage: fresh session ids and timestamps, the referential check before a
//! message is appended, and encoding/decoding of the structured list fields.

use advisor_types::chat::{ChatMessage, ChatRole, ChatSession, HistoryEntry, NewChatMessage};
use advisor_types::error::ChatError;
use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::chat::structured::{decode_list, encode_list};

/// Session and message persistence.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (advisor-core never depends on advisor-infra).
pub struct ChatService<C: ChatRepository> {
    chat_repo: C,
}

impl<C: ChatRepository> ChatService<C> {
    pub fn new(chat_repo: C) -> Self {
        Self { chat_repo }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    // --- Sessions ---

    /// Create a session with a fresh random id, the given owner and title.
    #[tracing::instrument(skip(self, title))]
    pub async fn create_session(
        &self,
        user_id: i64,
        title: String,
    ) -> Result<ChatSession, ChatError> {
        let session = ChatSession {
            id: Uuid::new_v4(),
            user_id,
            title,
            created_at: Utc::now(),
        };

        let created = self.chat_repo.create_session(&session).await?;
        info!(session_id = %created.id, "Chat session created");
        Ok(created)
    }

    pub async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, ChatError> {
        Ok(self.chat_repo.get_session(session_id).await?)
    }

    /// All sessions, newest first. No pagination.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self.chat_repo.list_sessions().await?)
    }

    // --- Messages ---

    /// Append a message to an existing session.
    ///
    /// Fails with `SessionNotFound` when the session does not exist. The
    /// structured lists are stored only when non-empty.
    pub async fn append_message(
        &self,
        session_id: Uuid,
        role: ChatRole,
        content: String,
        advice_points: Option<&[Value]>,
        followup_questions: Option<&[Value]>,
    ) -> Result<ChatMessage, ChatError> {
        if self.chat_repo.get_session(&session_id).await?.is_none() {
            return Err(ChatError::SessionNotFound(session_id));
        }

        let message = NewChatMessage {
            session_id,
            role,
            content,
            advice_points: encode_list(advice_points),
            followup_questions: encode_list(followup_questions),
            created_at: Utc::now(),
        };

        Ok(self.chat_repo.save_message(&message).await?)
    }

    /// Up to `limit` most recent messages, newest first.
    pub async fn recent_messages(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.chat_repo.recent_messages(session_id, limit).await?)
    }

    /// Full chronological history for display, structured fields decoded.
    ///
    /// Unknown sessions yield an empty list.
    pub async fn all_messages(&self, session_id: &Uuid) -> Result<Vec<HistoryEntry>, ChatError> {
        let messages = self.chat_repo.get_messages(session_id).await?;
        Ok(messages.into_iter().map(into_history_entry).collect())
    }

    pub async fn message_count(&self, session_id: &Uuid) -> Result<u64, ChatError> {
        Ok(self.chat_repo.get_message_count(session_id).await?)
    }
}

fn into_history_entry(message: ChatMessage) -> HistoryEntry {
    HistoryEntry {
        id: message.id,
        advice_points: decode_list(message.advice_points.as_deref()),
        followup_questions: decode_list(message.followup_questions.as_deref()),
        role: message.role,
        content: message.content,
        timestamp: message.created_at,
    }
}
