//! Chat session and message types for Advisor.
//!
//! A session is one conversation; messages are appended to it in order and
//! never mutated. Assistant messages may carry two structured lists
//! (advice points and follow-up questions) stored as JSON text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use std::fmt;

use crate::llm::Message;

/// Who authored a stored message.
///
/// Only `user` and `assistant` are ever written by this service, but rows
/// written by other tools may carry any string. Those are kept verbatim as
/// `Other` so reads never fail on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChatRole {
    User,
    Assistant,
    Other(String),
}

impl ChatRole {
    pub fn as_str(&self) -> &str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Other(s) => s,
        }
    }

    /// Convert a stored message into a role-tagged conversation turn.
    ///
    /// Returns `None` for unrecognized roles; those are skipped when
    /// building inference history.
    pub fn to_turn(&self, content: &str) -> Option<Message> {
        match self {
            ChatRole::User => Some(Message::user(content)),
            ChatRole::Assistant => Some(Message::assistant(content)),
            ChatRole::Other(_) => None,
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ChatRole {
    fn from(s: &str) -> Self {
        match s {
            "user" => ChatRole::User,
            "assistant" => ChatRole::Assistant,
            other => ChatRole::Other(other.to_string()),
        }
    }
}

impl From<String> for ChatRole {
    fn from(s: String) -> Self {
        ChatRole::from(s.as_str())
    }
}

impl From<ChatRole> for String {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// A conversation container.
///
/// The title is taken from the question that opened the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A stored message, exactly as persisted.
///
/// `id` is assigned by the store and strictly increases in append order
/// within the database. The structured fields hold serialized JSON text,
/// or `None` when the list was absent or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub session_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub advice_points: Option<String>,
    pub followup_questions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A message about to be appended. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub session_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub advice_points: Option<String>,
    pub followup_questions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A message shaped for the history view, with structured fields decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub role: ChatRole,
    pub content: String,
    pub advice_points: Option<Vec<Value>>,
    pub followup_questions: Option<Vec<Value>>,
    pub timestamp: DateTime<Utc>,
}
