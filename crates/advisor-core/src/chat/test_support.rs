//! In-memory `ChatRepository` used by unit tests in this crate.

use std::sync::Mutex;

use advisor_types::chat::{ChatMessage, ChatSession, NewChatMessage};
use advisor_types::error::RepositoryError;
use uuid::Uuid;

use super::repository::ChatRepository;

#[derive(Default)]
pub(crate) struct InMemoryChatRepository {
    sessions: Mutex<Vec<ChatSession>>,
    messages: Mutex<Vec<ChatMessage>>,
    /// When set, every write fails with this query error.
    pub(crate) fail_writes: Option<String>,
}

impl InMemoryChatRepository {
    pub(crate) fn failing_writes(reason: &str) -> Self {
        Self {
            fail_writes: Some(reason.to_string()),
            ..Default::default()
        }
    }

    /// Insert a raw row, bypassing validation (simulates rows written by other tools).
    pub(crate) fn insert_raw(&self, message: ChatMessage) {
        self.messages.lock().unwrap().push(message);
    }

    pub(crate) fn next_id(&self) -> i64 {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn check_writes(&self) -> Result<(), RepositoryError> {
        match &self.fail_writes {
            Some(reason) => Err(RepositoryError::Query(reason.clone())),
            None => Ok(()),
        }
    }
}

impl ChatRepository for InMemoryChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        self.check_writes()?;
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session.clone())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| &s.id == session_id)
            .cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap().clone();
        sessions.reverse();
        Ok(sessions)
    }

    async fn save_message(&self, message: &NewChatMessage) -> Result<ChatMessage, RepositoryError> {
        self.check_writes()?;
        let stored = ChatMessage {
            id: self.next_id(),
            session_id: message.session_id,
            role: message.role.clone(),
            content: message.content.clone(),
            advice_points: message.advice_points.clone(),
            followup_questions: message.followup_questions.clone(),
            created_at: message.created_at,
        };
        self.messages.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn recent_messages(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut messages = self.get_messages(session_id).await?;
        messages.reverse();
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut messages: Vec<ChatMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.session_id == session_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.id);
        Ok(messages)
    }

    async fn get_message_count(&self, session_id: &Uuid) -> Result<u64, RepositoryError> {
        Ok(self.get_messages(session_id).await?.len() as u64)
    }
}
