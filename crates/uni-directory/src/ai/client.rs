use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;

/// Anything that can turn a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("text generation request failed: {0}")]
    Transport(String),
    #[error("text generation endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("unexpected text generation payload: {0}")]
    Decode(String),
    #[error("text generation returned no text")]
    Empty,
}

/// Client for OpenAI-compatible `/responses` endpoints (Groq by default).
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesPayload {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AiError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/responses", config.base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let mut request = self.http.post(&self.endpoint).json(&ResponsesRequest {
            model: &self.model,
            input: prompt,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting completion");
        let response = request
            .send()
            .await
            .map_err(|err| AiError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AiError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(AiError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        output_text(&body)
    }
}

/// Prefer the aggregated `output_text`; otherwise join every `output_text` content part.
pub(crate) fn output_text(body: &str) -> Result<String, AiError> {
    let payload: ResponsesPayload =
        serde_json::from_str(body).map_err(|err| AiError::Decode(err.to_string()))?;

    let text = match payload.output_text {
        Some(text) => text,
        None => payload
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join(""),
    };

    if text.trim().is_empty() {
        Err(AiError::Empty)
    } else {
        Ok(text)
    }
}
