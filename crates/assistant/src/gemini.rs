//! REST client for the Gemini generative language API.
//!
//! Streaming replies use `:streamGenerateContent?alt=sse`; one-shot
//! generation uses `:generateContent`. Both send the whole conversation on
//! every call, so the server keeps no chat state.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use huma_core::chat::{ChatRole, ChatTurn};

use crate::config::GeminiConfig;
use crate::error::AssistantError;
use crate::model::{ChatModel, ReplyStream};
use crate::sse::SseDecoder;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

fn chat_request(system_instruction: &str, history: &[ChatTurn], message: &str) -> GenerateRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| Content::text(Some(role_name(turn.role)), &turn.text))
        .collect();
    contents.push(Content::text(Some("user"), message));

    GenerateRequest {
        system_instruction: Some(Content::text(None, system_instruction)),
        contents,
    }
}

/// Text of one streamed chunk. Chunks without candidates yield `""`.
fn chunk_text(payload: &str) -> Result<String, AssistantError> {
    serde_json::from_str::<GenerateResponse>(payload)
        .map(|r| r.text())
        .map_err(|e| AssistantError::InvalidResponse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for one Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// `Ok(None)` when no API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, AssistantError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AssistantError::ClientBuild)?;
        Ok(Some(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/models/{}:{method}", self.base_url, self.model)
    }

    async fn post(
        &self,
        url: String,
        body: &GenerateRequest,
    ) -> Result<reqwest::Response, AssistantError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn stream_reply(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<ReplyStream, AssistantError> {
        let request = chat_request(system_instruction, history, message);
        let url = format!("{}?alt=sse", self.method_url("streamGenerateContent"));
        let response = self.post(url, &request).await?;
        tracing::debug!(model = %self.model, turns = request.contents.len(), "Chat stream opened");

        let mut body = Box::pin(response.bytes_stream());
        let stream = async_stream::try_stream! {
            let mut decoder = SseDecoder::new();
            while let Some(chunk) = body.next().await {
                for payload in decoder.push(&chunk?) {
                    let text = chunk_text(&payload)?;
                    if !text.is_empty() {
                        yield text;
                    }
                }
            }
            if let Some(payload) = decoder.finish() {
                let text = chunk_text(&payload)?;
                if !text.is_empty() {
                    yield text;
                }
            }
        };

        Ok(stream.boxed())
    }

    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::text(Some("user"), prompt)],
        };
        let response = self.post(self.method_url("generateContent"), &request).await?;
        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        let text = parsed.text().trim().to_string();
        if text.is_empty() {
            return Err(AssistantError::Empty);
        }
        Ok(text)
    }
}
