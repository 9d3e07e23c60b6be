//! HTTP layer for Advisor.
//!
//! Four chat routes plus a health check. Success bodies are the bare JSON
//! objects the web client expects; failures use the error envelope.

pub mod error;
pub mod handlers;
pub mod router;
