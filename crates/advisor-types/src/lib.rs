//! Shared domain types for Advisor.
//!
//! This crate contains the domain types used across the Advisor backend:
//! chat sessions and messages, structured QA answers, LLM request/response
//! shapes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod qa;
