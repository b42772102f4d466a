//! The interpretation backend boundary.

use async_trait::async_trait;
use nopickles_core::Intent;
use nopickles_core::order::{ConversationTurn, Stage};
use thiserror::Error;

/// Errors a backend can report. These never escape the interpreter: every
/// variant degrades to the fallback parser.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be invoked at all (missing credentials, etc.)
    #[error("Backend execution failed: {0}")]
    ExecutionFailed(String),

    /// The remote call failed at the HTTP level
    #[error("Backend process error (status: {status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
    },

    /// The backend answered, but not with anything shaped like an intent
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// Anything else
    #[error("Backend error: {0}")]
    Other(String),
}

/// Everything a backend gets to see for one interpretation: the utterance,
/// the recent conversation, the current stage, and a menu summary.
#[derive(Debug, Clone)]
pub struct InterpretRequest {
    pub utterance: String,
    pub recent_turns: Vec<ConversationTurn>,
    pub stage: Stage,
    pub menu_summary: String,
}

impl InterpretRequest {
    pub fn new(utterance: impl Into<String>, stage: Stage, menu_summary: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            recent_turns: Vec::new(),
            stage,
            menu_summary: menu_summary.into(),
        }
    }

    pub fn with_recent_turns(mut self, turns: Vec<ConversationTurn>) -> Self {
        self.recent_turns = turns;
        self
    }
}

/// An external utterance-interpretation backend, typically a language model
/// reached over the network.
#[async_trait]
pub trait IntentBackend: Send + Sync {
    /// Short human-readable description of what this backend is good at.
    fn expertise(&self) -> &str;

    /// Interprets one utterance in context into a structured intent.
    async fn interpret(&self, request: &InterpretRequest) -> Result<Intent, BackendError>;
}
