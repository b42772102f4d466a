//! OpenAiApiAgent - Direct REST API implementation for OpenAI chat models.
//!
//! This agent calls the OpenAI chat completions API directly.
//! Configuration priority: ~/.config/nopickles/secret.json > environment variables

use crate::backend::{BackendError, IntentBackend, InterpretRequest};
use crate::secret::load_secret_config;
use async_trait::async_trait;
use nopickles_core::Intent;
use nopickles_core::order::Speaker;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// How many past turns are sent along as interpretation context.
const HISTORY_WINDOW: usize = 6;

/// Backend implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.0,
        }
    }

    /// Loads configuration from ~/.config/nopickles/secret.json or
    /// environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/nopickles/secret.json
    /// 2. Environment variables (OPENAI_API_KEY, NOPICKLES_MODEL_NAME)
    ///
    /// Model name defaults to `gpt-3.5-turbo` if not specified.
    pub fn try_from_env() -> Result<Self, BackendError> {
        if let Ok(secret_config) = load_secret_config() {
            if let Some(openai_config) = secret_config.openai {
                let model = openai_config
                    .model_name
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
                return Ok(Self::new(openai_config.api_key, model));
            }
        }

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            BackendError::ExecutionFailed(
                "OPENAI_API_KEY not found in ~/.config/nopickles/secret.json or environment variables"
                    .into(),
            )
        })?;

        let model =
            env::var("NOPICKLES_MODEL_NAME").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_messages(request: &InterpretRequest) -> Vec<Message> {
        let mut messages = vec![Message {
            role: "system".to_string(),
            content: build_system_prompt(&request.menu_summary),
        }];

        let start = request.recent_turns.len().saturating_sub(HISTORY_WINDOW);
        for turn in &request.recent_turns[start..] {
            let role = match turn.speaker {
                Speaker::Customer => "user",
                Speaker::Assistant => "assistant",
            };
            messages.push(Message {
                role: role.to_string(),
                content: turn.text.clone(),
            });
        }

        messages.push(Message {
            role: "user".to_string(),
            content: request.utterance.clone(),
        });

        messages
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, BackendError> {
        let response = self
            .client
            .post(BASE_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::ProcessError {
                status_code: None,
                message: format!("OpenAI API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            BackendError::Other(format!("Failed to parse OpenAI response: {err}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                BackendError::MalformedResponse(
                    "OpenAI API returned no choices in the response".into(),
                )
            })
    }
}

#[async_trait]
impl IntentBackend for OpenAiApiAgent {
    fn expertise(&self) -> &str {
        "OpenAI chat agent for interpreting food-order utterances"
    }

    async fn interpret(&self, request: &InterpretRequest) -> Result<Intent, BackendError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(request),
            temperature: self.temperature,
        };

        let content = self.send_request(&body).await?;
        parse_intent_json(&content).ok_or_else(|| {
            BackendError::MalformedResponse(format!(
                "Model output is not a valid intent: {content}"
            ))
        })
    }
}

fn build_system_prompt(menu_summary: &str) -> String {
    format!(
        "You take food orders for NoPickles, a fast food restaurant.\n\
         Interpret the customer's latest message as exactly one intent and \
         respond with ONLY a JSON object, no prose.\n\
         Shapes:\n\
         {{\"intent\": \"greet\"}}\n\
         {{\"intent\": \"add_items\", \"data\": [{{\"name\": \"large coke\", \"quantity\": 2}}]}}\n\
         {{\"intent\": \"remove_items\", \"data\": [{{\"name\": \"fries\", \"quantity\": 1}}]}}\n\
         {{\"intent\": \"query_total\"}}\n\
         {{\"intent\": \"finish\"}}\n\
         {{\"intent\": \"unrecognized\", \"data\": \"<original text>\"}}\n\
         Item names are the customer's wording; do not invent items.\n\
         {menu_summary}"
    )
}

/// Pulls an [`Intent`] out of model output. Tolerates surrounding prose and
/// markdown code fences; returns `None` when nothing parseable is found.
pub fn parse_intent_json(content: &str) -> Option<Intent> {
    let trimmed = content.trim();
    if let Ok(intent) = serde_json::from_str::<Intent>(trimmed) {
        return Some(intent);
    }

    // The model sometimes wraps the object in fences or explanation text.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Intent>(&trimmed[start..=end]).ok()
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Deserialize)]
struct MessageResponse {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_http_error(status: StatusCode, body: String) -> BackendError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    BackendError::ProcessError {
        status_code: Some(status.as_u16()),
        message,
        is_retryable,
    }
}
