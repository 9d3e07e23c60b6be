//! The QA inference chain.
//!
//! `QaChain` is the port the turn processor calls. `LlmQaChain` implements it
//! on top of a `BoxLlmProvider`: it sends a JSON-only system prompt, the
//! conversation history and the question, then parses the reply into a
//! `QaAnswer`.

use advisor_types::config::LlmConfig;
use advisor_types::llm::{CompletionRequest, Message};
use advisor_types::qa::{InferenceError, QaAnswer, QaInput};
use serde_json::Value;
use tracing::{Instrument, debug, info_span};

use crate::llm::box_provider::BoxLlmProvider;

/// Inference port: question plus history in, structured answer out.
pub trait QaChain: Send + Sync {
    fn ask(
        &self,
        input: &QaInput,
    ) -> impl std::future::Future<Output = Result<QaAnswer, InferenceError>> + Send;
}

/// System prompt for the QA call.
const QA_SYSTEM_PROMPT: &str = r#"You are a helpful advisor. Answer the user's question using the conversation so far as context.

Respond with ONLY a JSON object, no prose and no markdown, with exactly these keys:
- "summary": a concise answer in plain text
- "advice_points": a list of short, actionable advice strings (may be empty)
- "followup_questions": a list of questions the user might ask next (may be empty)"#;

/// LLM-backed `QaChain`.
pub struct LlmQaChain {
    provider: BoxLlmProvider,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl LlmQaChain {
    /// Build a chain from an explicit provider and its settings.
    pub fn new(provider: BoxLlmProvider, config: &LlmConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn build_request(&self, input: &QaInput) -> CompletionRequest {
        let mut messages = Vec::with_capacity(input.history.len() + 1);
        messages.extend(input.history.iter().cloned());
        messages.push(Message::user(input.question.clone()));

        CompletionRequest {
            model: self.model.clone(),
            messages,
            system: Some(QA_SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            json_mode: self.provider.capabilities().json_mode,
        }
    }
}

impl QaChain for LlmQaChain {
    async fn ask(&self, input: &QaInput) -> Result<QaAnswer, InferenceError> {
        let request = self.build_request(input);

        let span = info_span!(
            "gen_ai.qa",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            history_len = input.history.len(),
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            "QA completion received"
        );

        parse_answer(&response.content)
    }
}

/// Parse model output into a `QaAnswer`.
///
/// Markdown code fences around the JSON are tolerated. Only text that is not
/// JSON, or JSON that is not an object, is `MalformedOutput`; field types
/// are not checked here.
pub fn parse_answer(raw: &str) -> Result<QaAnswer, InferenceError> {
    let body = strip_code_fences(raw);

    let value: Value = serde_json::from_str(body).map_err(|e| InferenceError::MalformedOutput {
        reason: e.to_string(),
        raw: raw.to_string(),
    })?;

    match value {
        Value::Object(fields) => Ok(QaAnswer::new(fields)),
        _ => Err(InferenceError::MalformedOutput {
            reason: "expected a JSON object".to_string(),
            raw: raw.to_string(),
        }),
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
