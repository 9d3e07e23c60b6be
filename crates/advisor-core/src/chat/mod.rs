//! Chat session and message persistence for Advisor.
//!
//! `ChatRepository` is the storage port the infrastructure layer implements.
//! `ChatService` is the Session/Message Store used by the HTTP layer and the
//! turn processor. `structured` holds the JSON codec for advice points and
//! follow-up questions.

pub mod repository;
pub mod service;
pub mod structured;

#[cfg(test)]
pub(crate) mod test_support;
