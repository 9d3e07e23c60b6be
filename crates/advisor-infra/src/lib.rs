//! Infrastructure layer for Advisor.
//!
//! Contains implementations of the ports defined in `advisor-core`:
//! SQLite storage, OpenAI-compatible chat and embeddings clients, and the
//! configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
