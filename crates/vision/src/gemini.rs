//! HTTP client for a Gemini-style `generateContent` endpoint.
//!
//! Sends the meter photo as an inline base64 part plus a text instruction
//! naming the meter kind, and returns the model's free-text answer.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use meterflow_core::measure::MeasureType;

use crate::provider::{ProviderError, RecognitionProvider};

/// HTTP client for the generative language API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

// Response shapes: only the fields the extractor needs.

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// * `api_url` - Base URL, e.g. `https://generativelanguage.googleapis.com`.
    /// * `model` - Model name, e.g. `gemini-1.5-pro`.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (carries the
    /// caller's timeout and connection pool).
    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[async_trait]
impl RecognitionProvider for GeminiClient {
    async fn describe_meter(
        &self,
        image: &[u8],
        mime_type: &str,
        meter: MeasureType,
    ) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": general_purpose::STANDARD.encode(image),
                        }
                    },
                    {
                        "text": format!(
                            "What is the {} consumption shown on the meter in this image? \
                             Answer with the numeric reading.",
                            meter.prompt_name()
                        )
                    },
                ]
            }]
        });

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "response contained no candidate text".into(),
            ));
        }

        Ok(text)
    }
}
