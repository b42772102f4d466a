//! Application layer for NoPickles.
//!
//! Owns the conversation orchestration use case: one inbound operation,
//! `Orchestrator::handle(session_id, utterance)`, plus the read-only
//! session queries an HTTP layer wraps.

pub mod orchestrator;
pub mod registry;
mod reply;

pub use orchestrator::{HandleOutcome, Orchestrator, SessionSummary};
pub use registry::SessionRegistry;
