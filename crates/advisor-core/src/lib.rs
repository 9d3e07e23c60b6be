//! Business logic and repository trait definitions for Advisor.
//!
//! This crate defines the "ports" (repository, provider, chain and embedder
//! traits) that the infrastructure layer implements, plus the chat-turn
//! pipeline built on top of them. It depends only on `advisor-types` --
//! never on `advisor-infra` or any database/IO crate.

pub mod chat;
pub mod embedding;
pub mod llm;
pub mod qa;
