//! Interpreter facade: backend first, deterministic fallback always.

use crate::backend::{IntentBackend, InterpretRequest};
use crate::fallback::FallbackParser;
use crate::openai_api_agent::OpenAiApiAgent;
use nopickles_core::Intent;
use nopickles_core::menu::MenuCatalog;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Converts utterances into intents, never failing outward.
///
/// If a language-model backend is configured it is tried first, under a
/// timeout. Backend absence, timeout, transport errors and malformed output
/// all degrade to the [`FallbackParser`]; the caller always gets an
/// [`Intent`].
pub struct Interpreter {
    backend: Option<Arc<dyn IntentBackend>>,
    fallback: FallbackParser,
    backend_timeout: Duration,
}

impl Interpreter {
    /// Creates an interpreter that only uses the deterministic parser.
    pub fn fallback_only(catalog: Arc<MenuCatalog>) -> Self {
        Self {
            backend: None,
            fallback: FallbackParser::new(catalog),
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }

    /// Creates an interpreter backed by an external model.
    pub fn with_backend(catalog: Arc<MenuCatalog>, backend: Arc<dyn IntentBackend>) -> Self {
        Self {
            backend: Some(backend),
            fallback: FallbackParser::new(catalog),
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }

    /// Builds from the environment: uses the OpenAI backend when credentials
    /// are available, otherwise runs fallback-only. Missing credentials are
    /// normal operation, not an error.
    pub fn from_env(catalog: Arc<MenuCatalog>) -> Self {
        match OpenAiApiAgent::try_from_env() {
            Ok(agent) => {
                info!("language-model backend configured: {}", agent.expertise());
                Self::with_backend(catalog, Arc::new(agent))
            }
            Err(err) => {
                info!("no language-model backend, running fallback-only: {err}");
                Self::fallback_only(catalog)
            }
        }
    }

    /// Overrides the backend call timeout.
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    /// Whether a model backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Interprets one utterance in context. Never returns an error: any
    /// backend problem is recovered locally via the fallback parser.
    pub async fn interpret(&self, request: &InterpretRequest) -> Intent {
        if let Some(backend) = &self.backend {
            match tokio::time::timeout(self.backend_timeout, backend.interpret(request)).await {
                Ok(Ok(intent)) => {
                    debug!(?intent, "backend interpreted utterance");
                    return intent;
                }
                Ok(Err(err)) => {
                    warn!("backend failed, degrading to fallback parser: {err}");
                }
                Err(_) => {
                    warn!(
                        timeout = ?self.backend_timeout,
                        "backend timed out, degrading to fallback parser"
                    );
                }
            }
        }
        self.fallback.parse(&request.utterance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use async_trait::async_trait;
    use nopickles_core::order::Stage;

    struct ErroringBackend;

    #[async_trait]
    impl IntentBackend for ErroringBackend {
        fn expertise(&self) -> &str {
            "always fails"
        }

        async fn interpret(&self, _request: &InterpretRequest) -> Result<Intent, BackendError> {
            Err(BackendError::ExecutionFailed("boom".into()))
        }
    }

    struct HangingBackend;

    #[async_trait]
    impl IntentBackend for HangingBackend {
        fn expertise(&self) -> &str {
            "never answers"
        }

        async fn interpret(&self, _request: &InterpretRequest) -> Result<Intent, BackendError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Intent::Greet)
        }
    }

    struct FixedBackend(Intent);

    #[async_trait]
    impl IntentBackend for FixedBackend {
        fn expertise(&self) -> &str {
            "canned answer"
        }

        async fn interpret(&self, _request: &InterpretRequest) -> Result<Intent, BackendError> {
            Ok(self.0.clone())
        }
    }

    fn request(utterance: &str) -> InterpretRequest {
        InterpretRequest::new(utterance, Stage::Ordering, "menu")
    }

    #[tokio::test]
    async fn test_backend_result_wins_when_available() {
        let catalog = Arc::new(MenuCatalog::preset());
        let interpreter =
            Interpreter::with_backend(catalog, Arc::new(FixedBackend(Intent::QueryTotal)));

        assert_eq!(interpreter.interpret(&request("hmm")).await, Intent::QueryTotal);
    }

    #[tokio::test]
    async fn test_backend_error_degrades_to_fallback() {
        let catalog = Arc::new(MenuCatalog::preset());
        let interpreter = Interpreter::with_backend(catalog, Arc::new(ErroringBackend));

        let intent = interpreter.interpret(&request("no, that's it")).await;
        assert_eq!(intent, Intent::Finish);
    }

    #[tokio::test]
    async fn test_backend_timeout_degrades_to_fallback() {
        let catalog = Arc::new(MenuCatalog::preset());
        let interpreter = Interpreter::with_backend(catalog, Arc::new(HangingBackend))
            .with_backend_timeout(Duration::from_millis(20));

        let intent = interpreter.interpret(&request("a cheeseburger")).await;
        assert_eq!(
            intent,
            Intent::AddItems(vec![nopickles_core::ItemRequest::new("cheeseburger", 1)])
        );
    }

    #[tokio::test]
    async fn test_fallback_only_interpreter() {
        let catalog = Arc::new(MenuCatalog::preset());
        let interpreter = Interpreter::fallback_only(catalog);
        assert!(!interpreter.has_backend());

        assert_eq!(interpreter.interpret(&request("hello")).await, Intent::Greet);
    }
}
