//! Question-answering types: chain input, structured answer, turn outcome.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::llm::{LlmError, Message};

/// Message returned to clients when the inference step fails.
pub const INVALID_RESPONSE_ERROR: &str = "Invalid response format from AI";

/// Input to the inference chain: the new question plus chronological history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaInput {
    pub question: String,
    pub history: Vec<Message>,
}

/// Structured answer produced by the inference chain.
///
/// Holds the JSON object the model returned, exactly as parsed, so it is
/// echoed back to the client unchanged (including unknown keys and `null`
/// values). The accessors read the three known keys leniently for
/// persistence: a non-string summary reads as `""` and a non-array list
/// reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QaAnswer(pub Map<String, Value>);

impl QaAnswer {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Summary text, or the empty string when missing or not a string.
    pub fn summary_text(&self) -> &str {
        self.0
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn advice_points(&self) -> Option<&[Value]> {
        self.list("advice_points")
    }

    pub fn followup_questions(&self) -> Option<&[Value]> {
        self.list("followup_questions")
    }

    fn list(&self, key: &str) -> Option<&[Value]> {
        self.0.get(key).and_then(Value::as_array).map(Vec::as_slice)
    }
}

impl From<Map<String, Value>> for QaAnswer {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Result of processing one chat turn.
///
/// Serialized untagged: a successful turn is `{session_id, question, answer}`,
/// a failed inference is `{error, raw_output}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnOutcome {
    Answered {
        session_id: Uuid,
        question: String,
        answer: QaAnswer,
    },
    Failed {
        error: String,
        raw_output: String,
    },
}

/// Errors from the inference chain.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("invalid json output ({reason}): {raw}")]
    MalformedOutput { reason: String, raw: String },
}
