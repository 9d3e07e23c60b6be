//! Question answering over a chat session.
//!
//! - `chain`: the inference port (`QaChain`) and its LLM-backed implementation
//! - `history`: turns stored messages into role-tagged conversation history
//! - `turn`: the chat-turn pipeline (`TurnProcessor`)

pub mod chain;
pub mod history;
pub mod turn;
