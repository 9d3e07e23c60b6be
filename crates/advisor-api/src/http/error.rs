//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use advisor_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Session store and turn errors.
    Chat(ChatError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    /// Status code, machine-readable code and message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::InvalidSessionId(id)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Invalid session id: {id}"),
            ),
            AppError::Chat(ChatError::EmptyQuestion) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Question must not be empty".to_string(),
            ),
            AppError::Chat(ChatError::SessionNotFound(id)) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session {id} not found"),
            ),
            AppError::Chat(ChatError::Storage(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_types::error::RepositoryError;
    use uuid::Uuid;

    #[test]
    fn test_chat_error_status_codes() {
        let cases = [
            (ChatError::InvalidSessionId("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ChatError::EmptyQuestion, StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ChatError::SessionNotFound(Uuid::nil()), StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            (
                ChatError::Storage(RepositoryError::Connection),
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let (got_status, got_code, _) = AppError::from(err).parts();
            assert_eq!(got_status, status);
            assert_eq!(got_code, code);
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::from(ChatError::EmptyQuestion).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
