//! Utterance interpretation for NoPickles.
//!
//! Converts raw customer text plus conversation context into a structured
//! [`nopickles_core::Intent`]. A language-model backend may do the
//! interpretation; a deterministic catalog-driven fallback parser is always
//! available so the system works fully offline.

pub mod backend;
pub mod fallback;
pub mod interpreter;
pub mod openai_api_agent;
pub mod secret;

pub use backend::{BackendError, IntentBackend, InterpretRequest};
pub use fallback::FallbackParser;
pub use interpreter::Interpreter;
pub use openai_api_agent::OpenAiApiAgent;
