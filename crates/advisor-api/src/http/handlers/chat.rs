//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST /chat/new                  - Start a session titled by the question
//! - GET  /chats                     - List all sessions
//! - POST /chat/{session_id}/ask     - Process one turn
//! - GET  /chat/{session_id}/history - Full chronological history

use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use advisor_types::chat::{ChatSession, HistoryEntry};
use advisor_types::error::ChatError;
use advisor_types::qa::TurnOutcome;

use crate::http::error::AppError;
use crate::state::AppState;

/// Form body shared by `/chat/new` and `/chat/{id}/ask`.
///
/// A missing field reads as empty so it is reported as a validation error
/// rather than a form rejection.
#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct NewChatResponse {
    pub session_id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<ChatSession>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryEntry>,
}

/// Parse a session id from a path parameter, returning a 400 error on invalid format.
fn parse_session_id(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| ChatError::InvalidSessionId(s.to_string()).into())
}

/// POST /chat/new - Create a session whose title is the opening question.
pub async fn new_chat(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> Result<Json<NewChatResponse>, AppError> {
    if form.question.trim().is_empty() {
        return Err(ChatError::EmptyQuestion.into());
    }

    let session = state
        .chat_service
        .create_session(state.config.chat.default_user_id, form.question)
        .await?;

    Ok(Json(NewChatResponse {
        session_id: session.id,
        title: session.title,
    }))
}

/// GET /chats - All sessions, newest first.
pub async fn list_chats(
    State(state): State<AppState>,
) -> Result<Json<SessionListResponse>, AppError> {
    let sessions = state.chat_service.list_sessions().await?;
    Ok(Json(SessionListResponse { sessions }))
}

/// POST /chat/{session_id}/ask - Run one turn.
///
/// An inference failure is still a 200 with `{error, raw_output}`.
pub async fn ask(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Form(form): Form<QuestionForm>,
) -> Result<Json<TurnOutcome>, AppError> {
    let outcome = state
        .turn_processor
        .process(&session_id, &form.question)
        .await?;
    Ok(Json(outcome))
}

/// GET /chat/{session_id}/history - Messages in append order.
pub async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let messages = state.chat_service.all_messages(&session_id).await?;
    Ok(Json(HistoryResponse { messages }))
}
