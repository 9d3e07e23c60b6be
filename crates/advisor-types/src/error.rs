use thiserror::Error;
use uuid::Uuid;

/// Errors from repository operations (used by trait definitions in advisor-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the chat store and the turn processor.
///
/// `InvalidSessionId` and `EmptyQuestion` are client errors and never
/// touch the store. `SessionNotFound` means the id was well-formed but
/// unknown. `Storage` wraps any persistence failure.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid session id format: '{0}'")]
    InvalidSessionId(String),

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("chat session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
