//! The chat-turn pipeline.
//!
//! One turn: validate the session id, load recent history, persist the
//! question, call the inference chain, persist the structured answer.
//!
//! The user message is written before inference and is not rolled back when
//! inference fails. An inference failure is reported as
//! `TurnOutcome::Failed` rather than as an error, and no assistant message
//! is stored for it.

use std::sync::Arc;

use advisor_types::chat::ChatRole;
use advisor_types::error::ChatError;
use advisor_types::qa::{INVALID_RESPONSE_ERROR, QaInput, TurnOutcome};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::chat::service::ChatService;
use crate::qa::chain::QaChain;
use crate::qa::history::build_history;

/// Default number of recent messages sent to the chain.
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Processes chat turns against a shared store and an inference chain.
pub struct TurnProcessor<C: ChatRepository, Q: QaChain> {
    chat: Arc<ChatService<C>>,
    chain: Q,
    history_limit: u32,
}

impl<C: ChatRepository, Q: QaChain> TurnProcessor<C, Q> {
    pub fn new(chat: Arc<ChatService<C>>, chain: Q) -> Self {
        Self {
            chat,
            chain,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, history_limit: u32) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// Run one turn for `session_id` (raw, unparsed) and `question`.
    ///
    /// # Errors
    ///
    /// - `InvalidSessionId` / `EmptyQuestion`: nothing was read or written.
    /// - `SessionNotFound`: the id is well-formed but unknown; nothing written.
    /// - `Storage`: a read or write failed. If the failure happened after the
    ///   user message was stored, that message stays.
    #[tracing::instrument(skip(self, question), fields(history_limit = self.history_limit))]
    pub async fn process(&self, session_id: &str, question: &str) -> Result<TurnOutcome, ChatError> {
        let session_id = Uuid::parse_str(session_id)
            .map_err(|_| ChatError::InvalidSessionId(session_id.to_string()))?;

        if question.trim().is_empty() {
            return Err(ChatError::EmptyQuestion);
        }

        if self.chat.get_session(&session_id).await?.is_none() {
            return Err(ChatError::SessionNotFound(session_id));
        }

        let recent = self
            .chat
            .recent_messages(&session_id, self.history_limit)
            .await?;
        let history = build_history(recent);

        self.chat
            .append_message(session_id, ChatRole::User, question.to_string(), None, None)
            .await?;

        let input = QaInput {
            question: question.to_string(),
            history,
        };

        let answer = match self.chain.ask(&input).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Inference failed; no answer stored");
                return Ok(TurnOutcome::Failed {
                    error: INVALID_RESPONSE_ERROR.to_string(),
                    raw_output: e.to_string(),
                });
            }
        };

        self.chat
            .append_message(
                session_id,
                ChatRole::Assistant,
                answer.summary_text().to_string(),
                answer.advice_points(),
                answer.followup_questions(),
            )
            .await?;

        info!(session_id = %session_id, history_len = input.history.len(), "Turn answered");

        Ok(TurnOutcome::Answered {
            session_id,
            question: input.question,
            answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::InMemoryChatRepository;
    use advisor_types::chat::ChatMessage;
    use advisor_types::llm::{LlmError, Message, MessageRole};
    use advisor_types::qa::{InferenceError, QaAnswer};
    use chrono::Utc;
    use serde_json::json;
    use std::future::Future;
    use std::sync::Mutex;

    /// Chain double that records its inputs and returns a canned result.
    struct MockChain {
        reply: Result<QaAnswer, String>,
        seen: Mutex<Vec<QaInput>>,
    }

    impl MockChain {
        fn answering(answer: QaAnswer) -> Self {
            Self {
                reply: Ok(answer),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn inputs(&self) -> Vec<QaInput> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl QaChain for MockChain {
        fn ask(
            &self,
            input: &QaInput,
        ) -> impl Future<Output = Result<QaAnswer, InferenceError>> + Send {
            self.seen.lock().unwrap().push(input.clone());
            let reply = self.reply.clone();
            async move {
                reply.map_err(|message| InferenceError::Provider(LlmError::Provider { message }))
            }
        }
    }

    fn answer_from(json: serde_json::Value) -> QaAnswer {
        serde_json::from_value(json).unwrap()
    }

    fn full_answer() -> QaAnswer {
        answer_from(json!({"summary": "X", "advice_points": ["a"], "followup_questions": ["b?"]}))
    }

    async fn setup(
        chain: MockChain,
    ) -> (
        Arc<ChatService<InMemoryChatRepository>>,
        TurnProcessor<InMemoryChatRepository, MockChain>,
        Uuid,
    ) {
        let chat = Arc::new(ChatService::new(InMemoryChatRepository::default()));
        let session = chat.create_session(1, "Q".to_string()).await.unwrap();
        let processor = TurnProcessor::new(chat.clone(), chain);
        (chat, processor, session.id)
    }

    #[tokio::test]
    async fn test_successful_turn_stores_two_messages() {
        let (chat, processor, id) = setup(MockChain::answering(full_answer())).await;

        let outcome = processor.process(&id.to_string(), "Q").await.unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "session_id": id.to_string(),
                "question": "Q",
                "answer": {"summary": "X", "advice_points": ["a"], "followup_questions": ["b?"]}
            })
        );

        let history = chat.all_messages(&id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "Q");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].content, "X");
        assert_eq!(history[1].advice_points, Some(vec![json!("a")]));
        assert_eq!(history[1].followup_questions, Some(vec![json!("b?")]));
    }

    #[tokio::test]
    async fn test_non_string_items_are_stored_and_echoed() {
        let raw = json!({
            "summary": "X",
            "advice_points": [{"title": "Rest", "detail": "8h"}],
            "followup_questions": null,
            "confidence": "high"
        });
        let (chat, processor, id) = setup(MockChain::answering(answer_from(raw.clone()))).await;

        let outcome = processor.process(&id.to_string(), "Q").await.unwrap();
        assert_eq!(serde_json::to_value(&outcome).unwrap()["answer"], raw);

        let stored = chat.recent_messages(&id, 1).await.unwrap();
        assert_eq!(stored[0].role, ChatRole::Assistant);
        let stored_advice: serde_json::Value =
            serde_json::from_str(stored[0].advice_points.as_deref().unwrap()).unwrap();
        assert_eq!(stored_advice, json!([{"title": "Rest", "detail": "8h"}]));
        assert_eq!(stored[0].followup_questions, None);

        let history = chat.all_messages(&id).await.unwrap();
        assert_eq!(
            history[1].advice_points,
            Some(vec![json!({"title": "Rest", "detail": "8h"})])
        );
    }

    #[tokio::test]
    async fn test_wrongly_typed_fields_store_defaults() {
        let raw = json!({"summary": 7, "advice_points": "rest more", "followup_questions": []});
        let (chat, processor, id) = setup(MockChain::answering(answer_from(raw))).await;

        processor.process(&id.to_string(), "Q").await.unwrap();

        let stored = chat.recent_messages(&id, 1).await.unwrap();
        assert_eq!(stored[0].content, "");
        assert_eq!(stored[0].advice_points, None);
        assert_eq!(stored[0].followup_questions, None);
    }

    #[tokio::test]
    async fn test_failed_inference_keeps_only_user_message() {
        let (chat, processor, id) = setup(MockChain::failing("upstream timeout")).await;

        let outcome = processor.process(&id.to_string(), "Q").await.unwrap();
        match outcome {
            TurnOutcome::Failed { error, raw_output } => {
                assert_eq!(error, "Invalid response format from AI");
                assert!(raw_output.contains("upstream timeout"));
            }
            other => panic!("expected failure outcome, got {other:?}"),
        }

        let history = chat.all_messages(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, ChatRole::User);
    }

    #[tokio::test]
    async fn test_missing_fields_store_empty_summary_and_nulls() {
        let (chat, processor, id) = setup(MockChain::answering(QaAnswer::default())).await;

        processor.process(&id.to_string(), "Q").await.unwrap();

        let stored = chat.recent_messages(&id, 1).await.unwrap();
        assert_eq!(stored[0].role, ChatRole::Assistant);
        assert_eq!(stored[0].content, "");
        assert_eq!(stored[0].advice_points, None);
        assert_eq!(stored[0].followup_questions, None);
    }

    #[tokio::test]
    async fn test_malformed_session_id_touches_nothing() {
        let (chat, processor, id) = setup(MockChain::answering(full_answer())).await;

        let err = processor.process("not-a-uuid", "Q").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidSessionId(_)));
        assert_eq!(chat.message_count(&id).await.unwrap(), 0);
        assert!(processor.chain.inputs().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (chat, processor, _) = setup(MockChain::answering(full_answer())).await;
        let missing = Uuid::new_v4();

        let err = processor.process(&missing.to_string(), "Q").await.unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound(id) if id == missing));
        assert_eq!(chat.message_count(&missing).await.unwrap(), 0);
        assert!(processor.chain.inputs().is_empty());
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let (chat, processor, id) = setup(MockChain::answering(full_answer())).await;

        let err = processor.process(&id.to_string(), "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyQuestion));
        assert_eq!(chat.message_count(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_history_is_chronological_and_capped() {
        let (chat, processor, id) = setup(MockChain::answering(full_answer())).await;

        for i in 0..12 {
            let role = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
            chat.append_message(id, role, format!("m{i}"), None, None)
                .await
                .unwrap();
        }

        processor.process(&id.to_string(), "latest").await.unwrap();

        let inputs = processor.chain.inputs();
        let history = &inputs[0].history;
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], Message::user("m2"));
        assert_eq!(history[9], Message::assistant("m11"));
        assert_eq!(inputs[0].question, "latest");
        // The question itself is not part of its own history.
        assert!(history.iter().all(|m| m.content != "latest"));
    }

    #[tokio::test]
    async fn test_history_skips_unknown_roles() {
        let (chat, processor, id) = setup(MockChain::answering(full_answer())).await;

        chat.append_message(id, ChatRole::User, "q1".to_string(), None, None)
            .await
            .unwrap();
        let next = chat.chat_repo().next_id();
        chat.chat_repo().insert_raw(ChatMessage {
            id: next,
            session_id: id,
            role: ChatRole::Other("system".to_string()),
            content: "hidden".to_string(),
            advice_points: None,
            followup_questions: None,
            created_at: Utc::now(),
        });

        processor.process(&id.to_string(), "q2").await.unwrap();

        let history = &processor.chain.inputs()[0].history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "q1");
    }

    #[tokio::test]
    async fn test_custom_history_limit() {
        let chat = Arc::new(ChatService::new(InMemoryChatRepository::default()));
        let session = chat.create_session(1, "Q".to_string()).await.unwrap();
        for i in 0..4 {
            chat.append_message(session.id, ChatRole::User, format!("m{i}"), None, None)
                .await
                .unwrap();
        }
        let processor =
            TurnProcessor::new(chat.clone(), MockChain::answering(full_answer())).with_history_limit(2);

        processor.process(&session.id.to_string(), "Q").await.unwrap();

        let history = &processor.chain.inputs()[0].history;
        assert_eq!(history, &vec![Message::user("m2"), Message::user("m3")]);
    }
}
